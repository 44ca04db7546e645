//! CDB promotion and broadcast effects (Phases 1 and 4).

use crate::core::pipeline::cdb::Cdb;
use crate::core::pipeline::functional_units::FunctionalUnits;
use crate::core::pipeline::rat::Rat;
use crate::core::pipeline::reservation::Reservations;
use crate::core::pipeline::rob::Rob;
use crate::core::pipeline::types::{Completion, CompletionValue};
use crate::core::timing::Timing;
use crate::stats::SimStats;

/// Promotes the next pending CDB entry (if the bus hasn't already broadcast
/// this cycle) and applies its effects: ROB write, RS/RAT snoop, and RS/FU
/// release.
#[allow(clippy::too_many_arguments)]
pub fn attempt(
    cdb: &mut Cdb,
    rob: &mut Rob,
    reservations: &mut Reservations,
    functional_units: &mut FunctionalUnits,
    timing: &mut Timing,
    stats: &mut SimStats,
    cycle: u64,
) -> Option<Completion> {
    let pending_before = cdb.pending().len();
    let completion = cdb.try_broadcast()?;
    if pending_before > 0 {
        stats.cdb_contentions += 1;
    }

    rob.complete(completion.rob, completion.value);

    if let Some(value) = register_value(&completion.value) {
        reservations.snoop_cdb(completion.rob, value);
    }

    reservations.release(completion.rs_slot);
    functional_units.release(completion.fu_slot);

    if let Some(entry) = rob.get(completion.rob) {
        timing.record_write_back(entry.instruction_id, cycle);
    }

    Some(completion)
}

/// The value, if any, a dependent reservation station can snoop off the bus.
/// STORE never produces a register result.
fn register_value(value: &CompletionValue) -> Option<u16> {
    match value {
        CompletionValue::Value(v) => Some(*v),
        CompletionValue::Branch(outcome) => outcome.return_address,
        CompletionValue::Store { .. } => None,
    }
}
