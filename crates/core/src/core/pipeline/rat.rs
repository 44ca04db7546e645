//! Register Alias Table (RAT) for register dependency tracking.
//!
//! Maps each of the 8 architectural registers to the ROB index of its
//! latest in-flight producer, or `None` if the value lives in the
//! architectural register file. This lets issue resolve a source operand
//! with a single array lookup instead of scanning the ROB.

use crate::common::reg::REGISTER_COUNT;
use crate::core::pipeline::rob::Rob;

/// Maps each register to the ROB index of its latest in-flight producer.
#[derive(Debug)]
pub struct Rat {
    producers: [Option<usize>; REGISTER_COUNT],
}

impl Default for Rat {
    fn default() -> Self {
        Self::new()
    }
}

impl Rat {
    /// Creates a new RAT with all registers clear (no pending writers).
    #[must_use]
    pub fn new() -> Self {
        Self {
            producers: [None; REGISTER_COUNT],
        }
    }

    /// Marks `reg` as having a pending writer at the given ROB index.
    pub fn set_producer(&mut self, reg: usize, rob_index: usize) {
        self.producers[reg] = Some(rob_index);
    }

    /// Returns the ROB index of `reg`'s latest pending writer, if any.
    #[must_use]
    pub fn get_producer(&self, reg: usize) -> Option<usize> {
        self.producers[reg]
    }

    /// Clears `reg`'s pending writer, but only if it still matches
    /// `rob_index`. Prevents a committing instruction from clearing an
    /// entry a newer issue has since overwritten (WAW handling).
    pub fn clear_if_match(&mut self, reg: usize, rob_index: usize) {
        if self.producers[reg] == Some(rob_index) {
            self.producers[reg] = None;
        }
    }

    /// Clears every entry (all speculative renaming state is gone).
    pub fn flush(&mut self) {
        self.producers = [None; REGISTER_COUNT];
    }

    /// Rebuilds the RAT from the ROB entries that survived a partial flush.
    ///
    /// Walks head-to-tail so the youngest surviving writer for each
    /// register wins.
    pub fn rebuild_from_rob(&mut self, rob: &Rob) {
        self.flush();
        rob.for_each_valid(|entry| {
            if let Some(dest) = entry.dest {
                self.producers[dest] = Some(entry.index);
            }
        });
    }
}
