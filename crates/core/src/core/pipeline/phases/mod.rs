//! Per-cycle phase implementations.
//!
//! Each phase is a free function over the component references it needs,
//! mirroring a discrete pipeline stage rather than a method on one big
//! struct — the orchestration in [`crate::core::Core::step_cycle`] wires
//! them together in the fixed order the engine requires.

/// Phase 3: branch/CALL/RET resolution and misprediction flush.
pub mod branch;
/// Phase 7: in-order commit from the ROB head.
pub mod commit;
/// Phase 5: dispatch of ready reservation stations onto free functional units.
pub mod dispatch;
/// Phase 2: functional unit countdown and completion enqueue.
pub mod execute;
/// Phase 8: instruction issue.
pub mod issue;
/// Phases 1 and 4: CDB promotion and broadcast effects.
pub mod writeback;
