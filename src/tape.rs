//! Fixed-capacity byte tape addressed by an index cursor.

use crate::config::BoundsPolicy;
use crate::error::{BfError, Result};

#[derive(Debug, Clone)]
pub struct Tape {
    cells: Vec<u8>,
    cursor: usize,
    bounds: BoundsPolicy,
}

impl Tape {
    /// Creates a zeroed tape. `capacity` must be non-zero.
    pub fn new(capacity: usize, bounds: BoundsPolicy) -> Self {
        debug_assert!(capacity > 0);
        Tape {
            cells: vec![0u8; capacity],
            cursor: 0,
            bounds,
        }
    }

    pub fn capacity(&self) -> usize {
        self.cells.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn cells(&self) -> &[u8] {
        &self.cells
    }

    /// Move the cursor one cell to the right.
    pub fn advance(&mut self) -> Result<()> {
        let next = self.cursor + 1;
        if next < self.cells.len() {
            self.cursor = next;
            return Ok(());
        }
        match self.bounds {
            BoundsPolicy::Wrap => {
                self.cursor = 0;
                Ok(())
            }
            BoundsPolicy::Fail => Err(BfError::OutOfBounds {
                cursor: self.cursor,
                capacity: self.cells.len(),
            }),
        }
    }

    /// Move the cursor one cell to the left.
    pub fn retreat(&mut self) -> Result<()> {
        if self.cursor > 0 {
            self.cursor -= 1;
            return Ok(());
        }
        match self.bounds {
            BoundsPolicy::Wrap => {
                self.cursor = self.cells.len() - 1;
                Ok(())
            }
            BoundsPolicy::Fail => Err(BfError::OutOfBounds {
                cursor: self.cursor,
                capacity: self.cells.len(),
            }),
        }
    }

    pub fn increment_cell(&mut self) {
        self.cells[self.cursor] = self.cells[self.cursor].wrapping_add(1);
    }

    pub fn decrement_cell(&mut self) {
        self.cells[self.cursor] = self.cells[self.cursor].wrapping_sub(1);
    }

    pub fn read_cell(&self) -> u8 {
        self.cells[self.cursor]
    }

    pub fn write_cell(&mut self, value: u8) {
        self.cells[self.cursor] = value;
    }

    /// Cells within `radius` of the cursor, with the index of the first one.
    pub fn window(&self, radius: usize) -> (usize, &[u8]) {
        let start = self.cursor.saturating_sub(radius);
        let end = (self.cursor + radius + 1).min(self.cells.len());
        (start, &self.cells[start..end])
    }
}
