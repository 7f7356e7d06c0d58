use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BfError {
    #[error("Unrecognized instruction {} at position {position}", describe_symbol(.symbol))]
    UnrecognizedInstruction { symbol: u8, position: usize },

    #[error("Unmatched '[' at position {position}")]
    UnmatchedOpenBracket { position: usize },

    #[error("Unmatched ']' at position {position}")]
    UnmatchedCloseBracket { position: usize },

    #[error("Data pointer moved out of bounds (cursor {cursor}, tape of {capacity} cells)")]
    OutOfBounds { cursor: usize, capacity: usize },

    #[error("Input exhausted at position {position}")]
    UnexpectedEof { position: usize },

    #[error("Execution cancelled after {steps} steps")]
    Cancelled { steps: u64 },

    #[error("Step limit of {limit} exceeded")]
    StepLimitExceeded { limit: u64 },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),
}

pub type Result<T> = std::result::Result<T, BfError>;

fn describe_symbol(symbol: &u8) -> String {
    if symbol.is_ascii_graphic() {
        format!("'{}'", *symbol as char)
    } else {
        format!("{:#04x}", symbol)
    }
}
