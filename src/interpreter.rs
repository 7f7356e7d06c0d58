//! Driver loop: fetch the instruction under the instruction pointer, dispatch
//! it to the [`Machine`], repeat until the pointer runs off the end.

use std::io::{Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::config::Config;
use crate::error::{BfError, Result};
use crate::machine::Machine;
use crate::program::Program;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Running,
    Finished,
}

/// Cooperative cancellation flag, checked before every instruction.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

pub struct Interpreter {
    config: Config,
    cancel: CancelToken,
}

impl Interpreter {
    pub fn new(config: Config) -> Result<Self> {
        config.validate()?;
        Ok(Interpreter {
            config,
            cancel: CancelToken::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// A handle that stops any run of this interpreter at the next instruction.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Execute `program` on a fresh machine. The finished machine is returned
    /// so callers can inspect the tape and reclaim the I/O streams.
    pub fn run<'p, R: Read, W: Write>(
        &self,
        program: &'p Program,
        input: R,
        output: W,
    ) -> Result<Machine<'p, R, W>> {
        let mut machine = Machine::new(program, &self.config, input, output)?;
        debug!(
            program_len = program.len(),
            tape_size = self.config.tape_size,
            "starting run"
        );
        self.drive(&mut machine)?;
        debug!(
            steps = machine.steps(),
            cursor = machine.tape().cursor(),
            "run finished"
        );
        Ok(machine)
    }

    /// Step `machine` until it finishes or fails.
    pub fn drive<R: Read, W: Write>(&self, machine: &mut Machine<'_, R, W>) -> Result<()> {
        let mut state = state_of(machine);
        while state == State::Running {
            if self.cancel.is_cancelled() {
                return Err(BfError::Cancelled {
                    steps: machine.steps(),
                });
            }
            if let Some(limit) = self.config.step_limit {
                if machine.steps() >= limit {
                    return Err(BfError::StepLimitExceeded { limit });
                }
            }
            machine.step()?;
            state = state_of(machine);
        }
        Ok(())
    }
}

fn state_of<R: Read, W: Write>(machine: &Machine<'_, R, W>) -> State {
    if machine.is_finished() {
        State::Finished
    } else {
        State::Running
    }
}

/// Run `source` with the default configuration.
pub fn run<R: Read, W: Write>(source: &[u8], input: R, output: W) -> Result<()> {
    let program = Program::new(source);
    Interpreter::new(Config::default())?.run(&program, input, output)?;
    Ok(())
}
