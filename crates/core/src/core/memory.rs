//! Flat, sparse memory.
//!
//! A single uniform address space: no cache hierarchy, no alignment
//! restrictions, unwritten addresses read as zero.

use serde::Serialize;
use std::collections::BTreeMap;

/// Sparse mapping from address to 16-bit value.
#[derive(Clone, Debug, Default, Serialize)]
pub struct Memory {
    cells: BTreeMap<u16, u16>,
}

impl Memory {
    /// Creates an empty memory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a value; unwritten addresses read as zero.
    #[must_use]
    pub fn read(&self, address: u16) -> u16 {
        self.cells.get(&address).copied().unwrap_or(0)
    }

    /// Writes a value.
    pub fn write(&mut self, address: u16, value: u16) {
        self.cells.insert(address, value);
    }

    /// Replaces the given address/value entries, leaving the rest untouched.
    pub fn initialize(&mut self, entries: impl IntoIterator<Item = (u16, u16)>) {
        for (address, value) in entries {
            self.cells.insert(address, value);
        }
    }

    /// Clears every entry back to the unwritten (zero-reading) state.
    pub fn reset(&mut self) {
        self.cells.clear();
    }

    /// Iterates over every address with a non-default value, in address order.
    pub fn iter(&self) -> impl Iterator<Item = (u16, u16)> + '_ {
        self.cells.iter().map(|(&a, &v)| (a, v))
    }
}
