//! Program text and instruction decoding.
//!
//! ## Commands
//! - `>` : Move pointer right
//! - `<` : Move pointer left
//! - `+` : Increment current cell
//! - `-` : Decrement current cell
//! - `.` : Output current cell
//! - `,` : Input one byte to current cell
//! - `[` : Jump past matching `]` if cell is 0
//! - `]` : Jump back to matching `[` if cell is not 0
//!
//! Every other byte is invalid. Use [`Program::filtered`] to drop comments
//! before running.

use std::fmt;

/// A single decoded instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    MoveRight,
    MoveLeft,
    Increment,
    Decrement,
    Output,
    Input,
    JumpForward,
    JumpBackward,
}

impl Op {
    pub fn from_byte(byte: u8) -> Option<Op> {
        match byte {
            b'>' => Some(Op::MoveRight),
            b'<' => Some(Op::MoveLeft),
            b'+' => Some(Op::Increment),
            b'-' => Some(Op::Decrement),
            b'.' => Some(Op::Output),
            b',' => Some(Op::Input),
            b'[' => Some(Op::JumpForward),
            b']' => Some(Op::JumpBackward),
            _ => None,
        }
    }

    pub fn symbol(self) -> u8 {
        match self {
            Op::MoveRight => b'>',
            Op::MoveLeft => b'<',
            Op::Increment => b'+',
            Op::Decrement => b'-',
            Op::Output => b'.',
            Op::Input => b',',
            Op::JumpForward => b'[',
            Op::JumpBackward => b']',
        }
    }
}

/// An immutable instruction stream.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Program {
    code: Vec<u8>,
}

impl Program {
    /// Wraps `source` as is; unknown bytes fail when executed.
    pub fn new(source: impl Into<Vec<u8>>) -> Self {
        Program {
            code: source.into(),
        }
    }

    /// Keeps only the eight instruction bytes of `source`.
    pub fn filtered(source: &[u8]) -> Self {
        Program {
            code: source
                .iter()
                .copied()
                .filter(|&b| Op::from_byte(b).is_some())
                .collect(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.code
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }
}

impl From<&str> for Program {
    fn from(source: &str) -> Self {
        Program::new(source.as_bytes())
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.code))
    }
}
