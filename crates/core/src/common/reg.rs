//! Architectural register file.
//!
//! Eight 16-bit general-purpose registers. R0 is a normal register here —
//! it is *not* hardwired to zero, matching the source machine this core
//! models (see the R0 open question recorded in `DESIGN.md`).

use serde::Serialize;

/// Number of architectural registers.
pub const REGISTER_COUNT: usize = 8;

/// The flat architectural register file.
#[derive(Clone, Debug, Serialize)]
pub struct RegisterFile {
    values: [u16; REGISTER_COUNT],
}

impl Default for RegisterFile {
    fn default() -> Self {
        Self::new()
    }
}

impl RegisterFile {
    /// Creates a new register file with all registers initialized to zero.
    #[must_use]
    pub fn new() -> Self {
        Self {
            values: [0; REGISTER_COUNT],
        }
    }

    /// Reads a register's current value.
    ///
    /// # Panics
    ///
    /// Panics if `idx` is not in `0..REGISTER_COUNT`; the issue stage never
    /// produces an out-of-range register index, so this would indicate a bug
    /// upstream rather than a user-facing error.
    #[must_use]
    pub fn read(&self, idx: usize) -> u16 {
        self.values[idx]
    }

    /// Writes a value to a register.
    pub fn write(&mut self, idx: usize, val: u16) {
        self.values[idx] = val;
    }

    /// Resets every register back to zero.
    pub fn reset(&mut self) {
        self.values = [0; REGISTER_COUNT];
    }
}
