//! Simulator: the public facade over [`Core`], returning deep-copy
//! snapshots rather than exposing any live reference to engine state.

use crate::common::error::{LoadError, MemoryInitError};
use crate::config::Config;
use crate::core::Core;
use crate::sim::snapshot::Snapshot;

/// Owns the engine and mediates every external interaction with it through
/// [`Snapshot`] deep copies.
#[derive(Debug)]
pub struct Simulator {
    core: Core,
}

impl Simulator {
    /// Creates a simulator with no program loaded.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self {
            core: Core::new(config),
        }
    }

    /// Parses assembly source and resets the engine to its post-load initial
    /// state. None of the prior state is mutated if parsing fails.
    pub fn load_program(&mut self, source: &str) -> Result<(), LoadError> {
        self.core.load_program(source)
    }

    /// Replaces the given address/value memory entries.
    pub fn initialize_memory(
        &mut self,
        entries: impl IntoIterator<Item = (i64, i64)>,
    ) -> Result<(), MemoryInitError> {
        self.core.initialize_memory(entries)
    }

    /// Advances the engine by one cycle and returns the resulting snapshot.
    /// A no-op past completion: returns the terminal snapshot unchanged.
    pub fn step_cycle(&mut self) -> Snapshot {
        self.core.step_cycle();
        self.snapshot()
    }

    /// Clears all core state to the post-load initial state; the loaded
    /// program is retained.
    pub fn reset(&mut self) {
        self.core.reset();
    }

    /// Deep-copy of the engine's current public state.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        Snapshot::capture(&self.core)
    }

    /// True iff the loaded program has run to completion.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.core.is_complete()
    }

    /// Run-level statistics accumulated so far.
    #[must_use]
    pub fn stats(&self) -> &crate::stats::SimStats {
        self.core.stats()
    }
}
