//! Shared types passed between the reservation stations, functional units
//! and CDB. Kept in one place because all three exchange these values by
//! plain index, never by reference (see `DESIGN.md`'s note on index-based
//! graph structure).

use crate::isa::opcode::RsClass;
use serde::Serialize;

/// Operands captured from a reservation station at dispatch time, handed to
/// a functional unit for the duration of its countdown.
#[derive(Clone, Copy, Debug, Default, Serialize)]
pub struct CapturedOperands {
    /// First source value (base register for LOAD/STORE).
    pub vj: u16,
    /// Second source value (store value for STORE).
    pub vk: u16,
    /// Immediate, for LOAD/STORE offset or BEQ branch offset.
    pub imm: Option<i16>,
    /// Resolved absolute target program index, for CALL.
    pub target: Option<usize>,
    /// Program index of the instruction, for BEQ/CALL target arithmetic.
    pub pc: usize,
    /// ROB index this result is destined for.
    pub dest_rob: usize,
}

/// Outcome of a BEQ/CALL/RET completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BranchOutcome {
    /// Whether the branch redirects control flow away from PC + 1.
    pub taken: bool,
    /// The resolved next program index.
    pub target: usize,
    /// CALL's return address (PC + 1); `None` for BEQ/RET.
    pub return_address: Option<u16>,
}

/// The payload a functional unit produces on completion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum CompletionValue {
    /// Arithmetic/LOAD result, or CALL handled via its [`BranchOutcome`].
    Value(u16),
    /// STORE's resolved address/value pair.
    Store {
        /// Destination address.
        address: u16,
        /// Value to write at commit.
        value: u16,
    },
    /// BEQ/CALL/RET outcome.
    Branch(BranchOutcome),
}

/// A completed functional unit result, contending for the CDB.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct Completion {
    /// Destination ROB index.
    pub rob: usize,
    /// The computed result.
    pub value: CompletionValue,
    /// Class this completion belongs to, so the freed RS/FU can be found.
    pub class: RsClass,
    /// Reservation station slot to release once broadcast.
    pub rs_slot: usize,
    /// Functional unit slot to release once broadcast.
    pub fu_slot: usize,
}
