//! The tape machine: one operation per instruction, loops resolved by
//! scanning the program for the matching bracket every time a jump is taken.

use std::io::{self, Read, Write};

use tracing::{trace, warn};

use crate::config::{Config, EofPolicy};
use crate::error::{BfError, Result};
use crate::program::{Op, Program};
use crate::tape::Tape;

pub struct Machine<'p, R, W> {
    tape: Tape,
    program: &'p [u8],
    ip: usize,
    steps: u64,
    eof: EofPolicy,

    // I/O streams
    pub input: R,
    pub output: W,
}

impl<'p, R: Read, W: Write> Machine<'p, R, W> {
    pub fn new(program: &'p Program, config: &Config, input: R, output: W) -> Result<Self> {
        config.validate()?;
        Ok(Machine {
            tape: Tape::new(config.tape_size, config.bounds),
            program: program.as_bytes(),
            ip: 0,
            steps: 0,
            eof: config.eof,
            input,
            output,
        })
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn ip(&self) -> usize {
        self.ip
    }

    /// Number of instructions executed so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn is_finished(&self) -> bool {
        self.ip >= self.program.len()
    }

    /// Byte at the instruction pointer, `None` once finished.
    pub fn current(&self) -> Option<u8> {
        self.program.get(self.ip).copied()
    }

    /// Execute the instruction at the instruction pointer. Does nothing once
    /// the machine has finished.
    pub fn step(&mut self) -> Result<()> {
        let Some(symbol) = self.current() else {
            return Ok(());
        };
        let op = Op::from_byte(symbol).ok_or(BfError::UnrecognizedInstruction {
            symbol,
            position: self.ip,
        })?;
        self.steps += 1;
        match op {
            Op::MoveRight => self.move_right(),
            Op::MoveLeft => self.move_left(),
            Op::Increment => self.increment(),
            Op::Decrement => self.decrement(),
            Op::Output => self.output(),
            Op::Input => self.input(),
            Op::JumpForward => self.jump_forward(),
            Op::JumpBackward => self.jump_backward(),
        }
    }

    pub fn move_right(&mut self) -> Result<()> {
        self.tape.advance()?;
        self.ip += 1;
        Ok(())
    }

    pub fn move_left(&mut self) -> Result<()> {
        self.tape.retreat()?;
        self.ip += 1;
        Ok(())
    }

    pub fn increment(&mut self) -> Result<()> {
        self.tape.increment_cell();
        self.ip += 1;
        Ok(())
    }

    pub fn decrement(&mut self) -> Result<()> {
        self.tape.decrement_cell();
        self.ip += 1;
        Ok(())
    }

    pub fn output(&mut self) -> Result<()> {
        let c = self.tape.read_cell();
        self.output.write_all(&[c])?;
        self.output.flush()?;
        self.ip += 1;
        Ok(())
    }

    pub fn input(&mut self) -> Result<()> {
        let mut buf = [0u8; 1];
        loop {
            match self.input.read(&mut buf) {
                Ok(0) => {
                    warn!(position = self.ip, policy = ?self.eof, "input exhausted");
                    match self.eof {
                        EofPolicy::Unchanged => {}
                        EofPolicy::Zero => self.tape.write_cell(0),
                        EofPolicy::Fail => {
                            return Err(BfError::UnexpectedEof { position: self.ip })
                        }
                    }
                    break;
                }
                Ok(_) => {
                    self.tape.write_cell(buf[0]);
                    break;
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(BfError::IoError(e)),
            }
        }
        self.ip += 1;
        Ok(())
    }

    /// `[`: skip past the matching `]` when the current cell is zero.
    ///
    /// The instruction pointer must be on the `[`.
    pub fn jump_forward(&mut self) -> Result<()> {
        if self.tape.read_cell() != 0 {
            self.ip += 1;
            return Ok(());
        }

        let mut depth: isize = 0;
        let mut pos = self.ip;
        loop {
            let Some(&b) = self.program.get(pos) else {
                return Err(BfError::UnmatchedOpenBracket { position: self.ip });
            };
            match b {
                b'[' => depth += 1,
                b']' => {
                    depth -= 1;
                    if depth == 0 {
                        trace!(from = self.ip, to = pos + 1, "skip loop");
                        self.ip = pos + 1;
                        return Ok(());
                    }
                }
                _ => {}
            }
            pos += 1;
        }
    }

    /// `]`: return to just after the matching `[` when the current cell is
    /// non-zero.
    ///
    /// The instruction pointer must be on the `]`.
    pub fn jump_backward(&mut self) -> Result<()> {
        if self.tape.read_cell() == 0 {
            self.ip += 1;
            return Ok(());
        }

        let mut depth: isize = 0;
        let mut pos = self.ip;
        loop {
            match self.program.get(pos) {
                Some(&b']') => depth += 1,
                Some(&b'[') => {
                    depth -= 1;
                    if depth == 0 {
                        trace!(from = self.ip, to = pos + 1, "repeat loop");
                        self.ip = pos + 1;
                        return Ok(());
                    }
                }
                _ => {}
            }
            if pos == 0 {
                return Err(BfError::UnmatchedCloseBracket { position: self.ip });
            }
            pos -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BoundsPolicy;

    fn machine<'p>(program: &'p Program, input: &'p [u8]) -> Machine<'p, &'p [u8], Vec<u8>> {
        Machine::new(program, &Config::default().with_tape_size(64), input, Vec::new()).unwrap()
    }

    fn run_to_end<R: Read, W: Write>(m: &mut Machine<'_, R, W>) -> Result<()> {
        while !m.is_finished() {
            m.step()?;
        }
        Ok(())
    }

    #[test]
    fn test_data_ops_advance_ip_by_one() {
        let program = Program::from("><+-");
        let mut m = machine(&program, b"");
        for expected in 1..=4 {
            m.step().unwrap();
            assert_eq!(m.ip(), expected);
        }
        assert!(m.is_finished());
        assert_eq!(m.tape().cursor(), 0);
        assert_eq!(m.tape().read_cell(), 0);
    }

    #[test]
    fn test_output_and_input() {
        let program = Program::from(",+.");
        let mut m = machine(&program, b"A");
        run_to_end(&mut m).unwrap();
        assert_eq!(m.output, b"B");
    }

    #[test]
    fn test_eof_unchanged() {
        let program = Program::from("+++,.");
        let mut m = machine(&program, b"");
        run_to_end(&mut m).unwrap();
        assert_eq!(m.output, [3]);
    }

    #[test]
    fn test_eof_zero() {
        let program = Program::from("+++,.");
        let config = Config::default().with_eof(EofPolicy::Zero);
        let mut m = Machine::new(&program, &config, io::empty(), Vec::new()).unwrap();
        run_to_end(&mut m).unwrap();
        assert_eq!(m.output, [0]);
    }

    #[test]
    fn test_eof_fail() {
        let program = Program::from("+,");
        let config = Config::default().with_eof(EofPolicy::Fail);
        let mut m = Machine::new(&program, &config, io::empty(), Vec::new()).unwrap();
        let err = run_to_end(&mut m).unwrap_err();
        assert!(matches!(err, BfError::UnexpectedEof { position: 1 }));
        assert_eq!(m.tape().read_cell(), 1);
    }

    #[test]
    fn test_forward_jump_on_zero_skips_body() {
        let program = Program::from("[+.]+");
        let mut m = machine(&program, b"");
        m.step().unwrap();
        assert_eq!(m.ip(), 4);
        assert_eq!(m.tape().read_cell(), 0);
        assert!(m.output.is_empty());
    }

    #[test]
    fn test_forward_jump_skips_nested_loops() {
        let program = Program::from("[[-][[+]]>]+");
        let mut m = machine(&program, b"");
        m.step().unwrap();
        assert_eq!(m.ip(), 11);
        assert_eq!(m.current(), Some(b'+'));
    }

    #[test]
    fn test_forward_jump_on_nonzero_enters_body() {
        let program = Program::from("+[-]");
        let mut m = machine(&program, b"");
        m.step().unwrap();
        m.step().unwrap();
        assert_eq!(m.ip(), 2);
    }

    #[test]
    fn test_backward_jump_on_zero_falls_through() {
        let program = Program::from("+[-]");
        let mut m = machine(&program, b"");
        for _ in 0..3 {
            m.step().unwrap();
        }
        assert_eq!(m.ip(), 3);
        m.step().unwrap();
        assert_eq!(m.ip(), 4);
        assert_eq!(m.tape().read_cell(), 0);
    }

    #[test]
    fn test_backward_jump_on_nonzero_repeats() {
        let program = Program::from("+[[-]>]");
        let mut m = machine(&program, b"");
        m.ip = 6;
        m.tape.write_cell(1);
        m.step().unwrap();
        assert_eq!(m.ip(), 2);
        assert_eq!(m.tape().read_cell(), 1);
    }

    #[test]
    fn test_unmatched_open() {
        let program = Program::from("[+");
        let mut m = machine(&program, b"");
        let err = run_to_end(&mut m).unwrap_err();
        assert!(matches!(err, BfError::UnmatchedOpenBracket { position: 0 }));
    }

    #[test]
    fn test_unmatched_close() {
        let program = Program::from("+]");
        let mut m = machine(&program, b"");
        let err = run_to_end(&mut m).unwrap_err();
        assert!(matches!(err, BfError::UnmatchedCloseBracket { position: 1 }));
    }

    #[test]
    fn test_stray_close_on_zero_is_not_detected() {
        let program = Program::from("]");
        let mut m = machine(&program, b"");
        run_to_end(&mut m).unwrap();
        assert!(m.is_finished());
    }

    #[test]
    fn test_unrecognized_instruction() {
        let program = Program::from("+.#+");
        let mut m = machine(&program, b"");
        let err = run_to_end(&mut m).unwrap_err();
        assert!(matches!(
            err,
            BfError::UnrecognizedInstruction {
                symbol: b'#',
                position: 2
            }
        ));
        assert_eq!(m.output, [1]);
        assert_eq!(m.ip(), 2);
        assert_eq!(m.steps(), 2);
    }

    #[test]
    fn test_out_of_bounds_does_not_move_ip() {
        let program = Program::from("<");
        let mut m = machine(&program, b"");
        assert!(matches!(m.step(), Err(BfError::OutOfBounds { .. })));
        assert_eq!(m.ip(), 0);
    }

    #[test]
    fn test_wrap_bounds() {
        let program = Program::from("<+");
        let config = Config::default()
            .with_tape_size(5)
            .with_bounds(BoundsPolicy::Wrap);
        let mut m = Machine::new(&program, &config, io::empty(), Vec::new()).unwrap();
        run_to_end(&mut m).unwrap();
        assert_eq!(m.tape().cursor(), 4);
        assert_eq!(m.tape().cells()[4], 1);
    }

    #[test]
    fn test_step_after_finish_is_noop() {
        let program = Program::from("+");
        let mut m = machine(&program, b"");
        m.step().unwrap();
        m.step().unwrap();
        assert_eq!(m.steps(), 1);
        assert_eq!(m.ip(), 1);
    }

    #[test]
    fn test_invalid_config() {
        let program = Program::from("+");
        let config = Config::default().with_tape_size(0);
        let result = Machine::new(&program, &config, io::empty(), io::sink());
        assert!(matches!(result, Err(BfError::InvalidConfig(_))));
    }
}
