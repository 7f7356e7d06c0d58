//! A Brainfuck virtual machine.
//!
//! Loops are resolved while running: `[` and `]` scan the program for their
//! matching bracket each time a jump is taken, so nothing is compiled ahead
//! of execution.

pub mod config;
pub mod error;
pub mod interpreter;
pub mod machine;
pub mod program;
pub mod tape;

pub use config::{BoundsPolicy, Config, EofPolicy, DEFAULT_TAPE_SIZE};
pub use error::{BfError, Result};
pub use interpreter::{run, CancelToken, Interpreter, State};
pub use machine::Machine;
pub use program::{Op, Program};
pub use tape::Tape;
