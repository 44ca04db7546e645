//! Shared harness for assembling a program, running it, and reading back
//! engine state without repeating the same boilerplate in every scenario.

use tomasim_core::config::Config;
use tomasim_core::{Simulator, Snapshot};

/// Upper bound on cycles any single test will step through. Every scenario
/// here completes in well under this; it exists purely so a regression that
/// makes the engine stall forever fails fast instead of hanging `cargo test`.
pub const CYCLE_BUDGET: u64 = 2_000;

/// Builds a simulator from assembly source and optional memory initializers,
/// using the default machine configuration.
pub fn load(source: &str, mem: &[(i64, i64)]) -> Simulator {
    with_config(Config::default(), source, mem)
}

/// Like [`load`], but with a caller-supplied configuration (back-pressure
/// tests shrink the ROB or a functional unit pool to force contention).
pub fn with_config(config: Config, source: &str, mem: &[(i64, i64)]) -> Simulator {
    let mut sim = Simulator::new(config);
    sim.load_program(source).expect("test program parses");
    sim.initialize_memory(mem.iter().copied())
        .expect("test memory initializer is in range");
    sim
}

/// Steps `sim` one cycle at a time until it reports completion, returning
/// the final snapshot. Panics if it hasn't finished within [`CYCLE_BUDGET`]
/// cycles — a stuck engine is a test failure, not a hang.
pub fn run_to_completion(sim: &mut Simulator) -> Snapshot {
    let mut snapshot = sim.snapshot();
    for _ in 0..CYCLE_BUDGET {
        if sim.is_complete() {
            return snapshot;
        }
        snapshot = sim.step_cycle();
    }
    panic!("program did not complete within {CYCLE_BUDGET} cycles");
}

/// Steps `sim` one cycle at a time until `predicate` holds of the snapshot,
/// returning it. Panics if [`CYCLE_BUDGET`] cycles pass without the
/// predicate firing, so a wrong expectation fails instead of hanging.
pub fn run_until(sim: &mut Simulator, mut predicate: impl FnMut(&Snapshot) -> bool) -> Snapshot {
    let mut snapshot = sim.snapshot();
    for _ in 0..CYCLE_BUDGET {
        if predicate(&snapshot) {
            return snapshot;
        }
        if sim.is_complete() {
            panic!("program completed before the predicate held");
        }
        snapshot = sim.step_cycle();
    }
    panic!("predicate did not hold within {CYCLE_BUDGET} cycles");
}
