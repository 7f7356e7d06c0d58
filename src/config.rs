//! Runtime configuration for the machine.

use clap::ValueEnum;

use crate::error::{BfError, Result};

/// Memory tape size (30KB as per original Brainfuck spec)
pub const DEFAULT_TAPE_SIZE: usize = 30_000;

/// What happens when the data pointer is moved past either end of the tape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum BoundsPolicy {
    /// Fail with `OutOfBounds`, leaving the pointer where it was.
    #[default]
    Fail,
    /// Wrap around to the opposite end of the tape.
    Wrap,
}

/// What `,` does once the input source is exhausted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum EofPolicy {
    /// Leave the current cell as it was before the read.
    #[default]
    Unchanged,
    /// Store 0 in the current cell.
    Zero,
    /// Abort with `UnexpectedEof`.
    Fail,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub tape_size: usize,
    pub bounds: BoundsPolicy,
    pub eof: EofPolicy,
    /// Maximum number of instructions to execute, `None` for no limit.
    pub step_limit: Option<u64>,
}

impl Config {
    pub fn with_tape_size(mut self, tape_size: usize) -> Self {
        self.tape_size = tape_size;
        self
    }

    pub fn with_bounds(mut self, bounds: BoundsPolicy) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn with_eof(mut self, eof: EofPolicy) -> Self {
        self.eof = eof;
        self
    }

    pub fn with_step_limit(mut self, step_limit: Option<u64>) -> Self {
        self.step_limit = step_limit;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.tape_size == 0 {
            return Err(BfError::InvalidConfig(
                "tape size must be at least one cell".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tape_size: DEFAULT_TAPE_SIZE,
            bounds: BoundsPolicy::default(),
            eof: EofPolicy::default(),
            step_limit: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.tape_size, 30_000);
        assert_eq!(config.bounds, BoundsPolicy::Fail);
        assert_eq!(config.eof, EofPolicy::Unchanged);
        assert_eq!(config.step_limit, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_builder() {
        let config = Config::default()
            .with_tape_size(8)
            .with_bounds(BoundsPolicy::Wrap)
            .with_eof(EofPolicy::Zero)
            .with_step_limit(Some(100));
        assert_eq!(config.tape_size, 8);
        assert_eq!(config.bounds, BoundsPolicy::Wrap);
        assert_eq!(config.eof, EofPolicy::Zero);
        assert_eq!(config.step_limit, Some(100));
    }

    #[test]
    fn test_zero_tape_rejected() {
        let err = Config::default().with_tape_size(0).validate().unwrap_err();
        assert!(matches!(err, BfError::InvalidConfig(_)));
    }
}
