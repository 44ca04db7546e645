//! Reorder Buffer (ROB) for in-order commit of out-of-order completions.
//!
//! A fixed-capacity circular buffer. Unlike a monotonically-tagged ROB, an
//! entry's identity *is* its physical slot index — the RAT and reservation
//! stations reference a ROB "index" directly, and because issue/commit is
//! strictly in order, a slot is never reused while anything still points at
//! the instruction that last occupied it.

use crate::core::pipeline::types::{BranchOutcome, CompletionValue};
use crate::isa::{InstructionId, Opcode};
use serde::Serialize;

/// A single entry in the Reorder Buffer.
#[derive(Clone, Debug, Serialize)]
pub struct RobEntry {
    /// This entry's slot index.
    pub index: usize,
    /// The instruction occupying this slot.
    pub instruction_id: InstructionId,
    /// Program index of the instruction (for timing/tracing).
    pub pc: usize,
    /// Opcode, so commit knows what kind of side effect to apply.
    pub opcode: Opcode,
    /// Destination register, if any (CALL implicitly writes R1).
    pub dest: Option<usize>,
    /// Set true once a CDB broadcast has delivered this entry's result.
    pub ready: bool,
    /// Arithmetic/LOAD result, or CALL's return address.
    pub value: u16,
    /// STORE's resolved {address, value}, written to memory at commit.
    pub store: Option<(u16, u16)>,
    /// BEQ/CALL/RET outcome.
    pub branch: Option<BranchOutcome>,
    /// The next-PC predicted at issue time (PC + 1, or the CALL target).
    pub predicted_next_pc: usize,
    /// True if an older unresolved branch was in flight when this issued.
    pub speculative: bool,
}

/// Reorder Buffer — circular buffer for in-order commit.
#[derive(Debug)]
pub struct Rob {
    entries: Vec<Option<RobEntry>>,
    head: usize,
    tail: usize,
    count: usize,
}

impl Rob {
    /// Creates a new ROB with the given capacity.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        let mut entries = Vec::with_capacity(capacity);
        entries.resize_with(capacity, || None);
        Self {
            entries,
            head: 0,
            tail: 0,
            count: 0,
        }
    }

    /// Returns the ROB capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Returns the number of occupied entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.count
    }

    /// Returns true if the ROB is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns true if the ROB is full.
    #[must_use]
    pub fn is_full(&self) -> bool {
        self.count == self.entries.len()
    }

    /// Index of the oldest in-flight entry (the commit point).
    #[must_use]
    pub fn head(&self) -> usize {
        self.head
    }

    /// Index the next allocation will use.
    #[must_use]
    pub fn tail(&self) -> usize {
        self.tail
    }

    /// Allocates a new ROB entry at the tail. Returns `None` if full.
    #[allow(clippy::too_many_arguments)]
    pub fn allocate(
        &mut self,
        instruction_id: InstructionId,
        pc: usize,
        opcode: Opcode,
        dest: Option<usize>,
        predicted_next_pc: usize,
        speculative: bool,
    ) -> Option<usize> {
        if self.is_full() {
            return None;
        }
        let index = self.tail;
        self.entries[index] = Some(RobEntry {
            index,
            instruction_id,
            pc,
            opcode,
            dest,
            ready: false,
            value: 0,
            store: None,
            branch: None,
            predicted_next_pc,
            speculative,
        });
        self.tail = (self.tail + 1) % self.entries.len();
        self.count += 1;
        Some(index)
    }

    /// Applies a CDB broadcast's result to the named entry.
    pub fn complete(&mut self, index: usize, value: CompletionValue) {
        let Some(entry) = self.entries[index].as_mut() else {
            return;
        };
        match value {
            CompletionValue::Value(v) => {
                entry.value = v;
                entry.ready = true;
            }
            CompletionValue::Store { address, value } => {
                entry.store = Some((address, value));
                entry.ready = true;
            }
            CompletionValue::Branch(outcome) => {
                if let Some(return_address) = outcome.return_address {
                    entry.value = return_address;
                }
                entry.branch = Some(outcome);
                entry.ready = true;
            }
        }
    }

    /// Returns a reference to an entry by index, if occupied.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&RobEntry> {
        self.entries[index].as_ref()
    }

    /// Returns a reference to the head entry (oldest), if the ROB is non-empty.
    #[must_use]
    pub fn peek_head(&self) -> Option<&RobEntry> {
        if self.count == 0 {
            None
        } else {
            self.entries[self.head].as_ref()
        }
    }

    /// Commits the head entry if it is ready and not speculative.
    /// Returns `None` otherwise (including when the ROB is empty). If the
    /// committed entry was itself a branch, the entries behind it may no
    /// longer be waiting on anything, so their speculative flags are
    /// recomputed before returning.
    pub fn commit_head(&mut self) -> Option<RobEntry> {
        let head_ready = matches!(self.peek_head(), Some(e) if e.ready && !e.speculative);
        if !head_ready {
            return None;
        }
        let entry = self.entries[self.head].take();
        self.head = (self.head + 1) % self.entries.len();
        self.count -= 1;
        self.recompute_speculative();
        entry
    }

    /// Discards every entry strictly younger than `keep`. Returns the
    /// discarded indices, in no particular order, for RS/FU/CDB pruning.
    /// Recomputes the speculative flag on survivors, since the entries
    /// discarded here may have been the only thing one of them was waiting
    /// on.
    pub fn flush_after(&mut self, keep: usize) -> Vec<usize> {
        let mut discarded = Vec::new();
        if self.count == 0 {
            return discarded;
        }
        let keep_next = (keep + 1) % self.entries.len();
        let mut idx = keep_next;
        while idx != self.tail {
            if self.entries[idx].take().is_some() {
                discarded.push(idx);
            }
            idx = (idx + 1) % self.entries.len();
        }
        self.tail = keep_next;
        self.recount();
        self.recompute_speculative();
        discarded
    }

    /// Discards every entry (full flush: no branch or commit survives).
    pub fn flush_all(&mut self) -> Vec<usize> {
        let mut discarded = Vec::new();
        for entry in &mut self.entries {
            if let Some(e) = entry.take() {
                discarded.push(e.index);
            }
        }
        self.head = 0;
        self.tail = 0;
        self.count = 0;
        discarded
    }

    fn recount(&mut self) {
        self.count = 0;
        let mut idx = self.head;
        while idx != self.tail {
            if self.entries[idx].is_some() {
                self.count += 1;
            }
            idx = (idx + 1) % self.entries.len();
        }
    }

    /// Finds the nearest surviving in-flight entry (scanning tail-to-head,
    /// i.e. most-recent-first) that writes `reg`. Used to rebuild the RAT
    /// after a partial flush.
    #[must_use]
    pub fn latest_writer(&self, reg: usize) -> Option<usize> {
        if self.count == 0 {
            return None;
        }
        let mut idx = if self.tail == 0 {
            self.entries.len() - 1
        } else {
            self.tail - 1
        };
        for _ in 0..self.count {
            if let Some(entry) = &self.entries[idx] {
                if entry.dest == Some(reg) {
                    return Some(idx);
                }
            }
            idx = if idx == 0 {
                self.entries.len() - 1
            } else {
                idx - 1
            };
        }
        None
    }

    /// Recomputes every surviving entry's `speculative` flag from scratch:
    /// true iff an older, still-in-flight branch-like entry precedes it.
    /// Entries leave the ROB at commit and at flush; either can retire the
    /// branch a younger entry was waiting on, so this must run after both.
    fn recompute_speculative(&mut self) {
        if self.count == 0 {
            return;
        }
        let mut branch_seen = false;
        let mut idx = self.head;
        loop {
            if let Some(entry) = self.entries[idx].as_mut() {
                entry.speculative = branch_seen;
                if entry.opcode.is_branch_like() {
                    branch_seen = true;
                }
            }
            idx = (idx + 1) % self.entries.len();
            if idx == self.tail {
                break;
            }
        }
    }

    /// Iterates over every occupied entry from head to tail.
    pub fn for_each_valid(&self, mut f: impl FnMut(&RobEntry)) {
        if self.count == 0 {
            return;
        }
        let mut idx = self.head;
        loop {
            if let Some(entry) = &self.entries[idx] {
                f(entry);
            }
            idx = (idx + 1) % self.entries.len();
            if idx == self.tail {
                break;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocate_and_commit_in_order() {
        let mut rob = Rob::new(4);
        let a = rob
            .allocate(InstructionId(0), 0, Opcode::Add, Some(1), 1, false)
            .unwrap();
        let b = rob
            .allocate(InstructionId(1), 1, Opcode::Add, Some(2), 2, false)
            .unwrap();

        rob.complete(b, CompletionValue::Value(200));
        assert!(rob.commit_head().is_none());

        rob.complete(a, CompletionValue::Value(100));
        let committed = rob.commit_head().unwrap();
        assert_eq!(committed.value, 100);
        let committed = rob.commit_head().unwrap();
        assert_eq!(committed.value, 200);
        assert!(rob.is_empty());
    }

    #[test]
    fn full_rob_rejects_allocation() {
        let mut rob = Rob::new(2);
        let _ = rob.allocate(InstructionId(0), 0, Opcode::Add, Some(1), 1, false);
        let _ = rob.allocate(InstructionId(1), 1, Opcode::Add, Some(2), 2, false);
        assert!(rob.is_full());
        assert!(rob
            .allocate(InstructionId(2), 2, Opcode::Add, Some(3), 3, false)
            .is_none());
    }

    #[test]
    fn speculative_entry_does_not_commit() {
        let mut rob = Rob::new(4);
        let a = rob
            .allocate(InstructionId(0), 0, Opcode::Add, Some(1), 1, true)
            .unwrap();
        rob.complete(a, CompletionValue::Value(1));
        assert!(rob.commit_head().is_none());
    }

    #[test]
    fn recompute_speculative_clears_once_the_blocking_branch_commits() {
        let mut rob = Rob::new(4);
        let beq = rob
            .allocate(InstructionId(0), 0, Opcode::Beq, None, 1, false)
            .unwrap();
        let after = rob
            .allocate(InstructionId(1), 1, Opcode::Add, Some(1), 2, true)
            .unwrap();

        rob.complete(after, CompletionValue::Value(7));
        assert!(
            rob.get(after).unwrap().speculative,
            "entry issued behind an unresolved branch starts speculative"
        );

        rob.complete(beq, CompletionValue::Branch(BranchOutcome {
            taken: false,
            target: 2,
            return_address: None,
        }));
        assert_eq!(rob.commit_head().unwrap().index, beq);

        assert!(
            !rob.get(after).unwrap().speculative,
            "the branch's own commit must clear speculative on what follows it"
        );
        assert!(rob.commit_head().unwrap().value == 7);
    }

    #[test]
    fn flush_after_discards_younger_entries() {
        let mut rob = Rob::new(8);
        let a = rob
            .allocate(InstructionId(0), 0, Opcode::Add, Some(1), 1, false)
            .unwrap();
        let _ = rob.allocate(InstructionId(1), 1, Opcode::Add, Some(2), 2, false);
        let _ = rob.allocate(InstructionId(2), 2, Opcode::Add, Some(3), 3, false);
        assert_eq!(rob.len(), 3);

        let discarded = rob.flush_after(a);
        assert_eq!(discarded.len(), 2);
        assert_eq!(rob.len(), 1);

        rob.complete(a, CompletionValue::Value(100));
        assert_eq!(rob.commit_head().unwrap().value, 100);
    }

    #[test]
    fn circular_wraparound_survives_many_cycles() {
        let mut rob = Rob::new(2);
        for i in 0..10u16 {
            let idx = rob
                .allocate(
                    InstructionId(u32::from(i)),
                    i as usize,
                    Opcode::Add,
                    Some(1),
                    i as usize + 1,
                    false,
                )
                .unwrap();
            rob.complete(idx, CompletionValue::Value(i));
            assert_eq!(rob.commit_head().unwrap().value, i);
        }
    }

    #[test]
    fn latest_writer_finds_most_recent() {
        let mut rob = Rob::new(8);
        let _ = rob
            .allocate(InstructionId(0), 0, Opcode::Add, Some(5), 1, false)
            .unwrap();
        let b = rob
            .allocate(InstructionId(1), 1, Opcode::Add, Some(5), 2, false)
            .unwrap();
        assert_eq!(rob.latest_writer(5), Some(b));
        assert_eq!(rob.latest_writer(6), None);
    }
}
