//! Common Data Bus: at most one broadcast per cycle, FIFO beyond that.
//!
//! When several functional units finish in the same cycle, the engine
//! orders them by ROB age (oldest first) before handing them to
//! [`Cdb::enqueue`] — from then on it's strict FIFO. `current` holds
//! whatever was broadcast this cycle, visible to the RAT/RS snoop, the ROB
//! write, and branch resolution; it is cleared once per cycle.

use crate::core::pipeline::types::Completion;
use std::collections::VecDeque;

/// The Common Data Bus.
#[derive(Debug, Default)]
pub struct Cdb {
    current: Option<Completion>,
    pending: VecDeque<Completion>,
}

impl Cdb {
    /// Creates an empty bus.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues completions that arrived in the same cycle. Caller is
    /// responsible for ordering them oldest-ROB-first.
    pub fn enqueue(&mut self, completions: impl IntoIterator<Item = Completion>) {
        self.pending.extend(completions);
    }

    /// Promotes the next pending completion onto the bus, if the bus
    /// hasn't already broadcast this cycle and something is waiting.
    pub fn try_broadcast(&mut self) -> Option<Completion> {
        if self.current.is_some() {
            return None;
        }
        let next = self.pending.pop_front()?;
        self.current = Some(next);
        Some(next)
    }

    /// The completion broadcast this cycle, if any.
    #[must_use]
    pub fn current(&self) -> Option<Completion> {
        self.current
    }

    /// Clears the broadcast marker at the end of a cycle.
    pub fn clear_current(&mut self) {
        self.current = None;
    }

    /// Returns the pending queue, for snapshotting.
    #[must_use]
    pub fn pending(&self) -> &VecDeque<Completion> {
        &self.pending
    }

    /// Drops any queued or in-flight completion destined for a discarded
    /// ROB entry (misprediction flush).
    pub fn prune_discarded(&mut self, discarded: &[usize]) {
        self.pending.retain(|c| !discarded.contains(&c.rob));
        if matches!(self.current, Some(c) if discarded.contains(&c.rob)) {
            self.current = None;
        }
    }
}
