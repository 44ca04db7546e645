//! Simulation statistics collection and reporting.
//!
//! Tracks instruction mix, branch misprediction rate, and CDB arbitration
//! contention — metrics an external driver (the CLI) wants after a run but
//! that the core engine itself never consults.

use std::time::Instant;

/// Simulation statistics structure tracking run-level performance metrics.
#[derive(Clone, Debug)]
pub struct SimStats {
    start_time: Instant,
    /// Total cycles elapsed.
    pub cycles: u64,
    /// Number of instructions committed (retired).
    pub instructions_retired: u64,

    /// Count of ADD/SUB/NAND/MUL instructions retired.
    pub inst_arith: u64,
    /// Count of LOAD instructions retired.
    pub inst_load: u64,
    /// Count of STORE instructions retired.
    pub inst_store: u64,
    /// Count of BEQ/CALL/RET instructions retired.
    pub inst_branch: u64,

    /// Number of BEQ instructions resolved not-mispredicted.
    pub branch_correct: u64,
    /// Number of BEQ instructions resolved mispredicted (triggering a flush).
    pub branch_mispredicted: u64,

    /// Cycles in which issue stalled on a full ROB or busy RS class.
    pub stalls_resource: u64,
    /// Cycles in which issue stalled behind an unresolved RET.
    pub stalls_ret: u64,
    /// Number of CDB cycles where more than one functional unit completed
    /// and at least one completion had to wait in the pending FIFO.
    pub cdb_contentions: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            instructions_retired: 0,
            inst_arith: 0,
            inst_load: 0,
            inst_store: 0,
            inst_branch: 0,
            branch_correct: 0,
            branch_mispredicted: 0,
            stalls_resource: 0,
            stalls_ret: 0,
            cdb_contentions: 0,
        }
    }
}

/// Section names for selective stats output.
pub const STATS_SECTIONS: &[&str] = &["summary", "instruction_mix", "branch"];

impl SimStats {
    /// Prints only the requested statistics sections to stdout.
    ///
    /// Each element of `sections` should be one of the names in
    /// [`STATS_SECTIONS`]. Pass an empty slice to print all sections.
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let seconds = self.start_time.elapsed().as_secs_f64();
        let cyc = self.cycles.max(1);
        let instr = self.instructions_retired.max(1);

        if want("summary") {
            let ipc = self.instructions_retired as f64 / cyc as f64;
            println!("==========================================================");
            println!("TOMASULO SIMULATION STATISTICS");
            println!("==========================================================");
            println!("host_seconds             {seconds:.4} s");
            println!("sim_cycles               {}", self.cycles);
            println!("sim_insts                {}", self.instructions_retired);
            println!("sim_ipc                  {ipc:.4}");
            println!("stalls.resource          {}", self.stalls_resource);
            println!("stalls.ret               {}", self.stalls_ret);
            println!("cdb.contentions          {}", self.cdb_contentions);
            println!("----------------------------------------------------------");
        }
        if want("instruction_mix") {
            let total = instr as f64;
            println!("INSTRUCTION MIX");
            println!(
                "  op.arith               {} ({:.2}%)",
                self.inst_arith,
                (self.inst_arith as f64 / total) * 100.0
            );
            println!(
                "  op.load                {} ({:.2}%)",
                self.inst_load,
                (self.inst_load as f64 / total) * 100.0
            );
            println!(
                "  op.store               {} ({:.2}%)",
                self.inst_store,
                (self.inst_store as f64 / total) * 100.0
            );
            println!(
                "  op.branch              {} ({:.2}%)",
                self.inst_branch,
                (self.inst_branch as f64 / total) * 100.0
            );
            println!("----------------------------------------------------------");
        }
        if want("branch") {
            let total = self.branch_correct + self.branch_mispredicted;
            let acc = if total > 0 {
                100.0 * (self.branch_correct as f64 / total as f64)
            } else {
                0.0
            };
            println!("BRANCH RESOLUTION");
            println!("  bp.resolved            {total}");
            println!("  bp.mispredicts         {}", self.branch_mispredicted);
            println!("  bp.accuracy            {acc:.2}%");
        }
        println!("==========================================================");
    }

    /// Prints all statistics sections to stdout.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
