//! Instruction record and the parsed program it lives in.

use super::opcode::Opcode;
use serde::Serialize;

/// Dense, stable identifier for an instruction, assigned at parse time.
///
/// Distinct from the program index: the id never changes even though the
/// same program index is reissued every time the simulator is reset.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub struct InstructionId(pub u32);

/// A single parsed instruction. Immutable once produced by the parser.
#[derive(Clone, Debug, Serialize)]
pub struct Instruction {
    /// Stable id, dense and assigned in program order.
    pub id: InstructionId,
    /// Program index this instruction occupies.
    pub pc: usize,
    /// The opcode.
    pub opcode: Opcode,
    /// Destination register for ADD/SUB/NAND/MUL/LOAD; value-to-store
    /// register for STORE; first compare register for BEQ. `None` for
    /// CALL (implicit R1) and RET.
    pub ra: Option<usize>,
    /// First source register (base register for LOAD/STORE; second
    /// compare register for BEQ).
    pub rb: Option<usize>,
    /// Second source register, for ADD/SUB/NAND/MUL only.
    pub rc: Option<usize>,
    /// Signed immediate: memory offset for LOAD/STORE, branch offset for BEQ.
    pub imm: Option<i16>,
    /// Resolved absolute program index, for CALL.
    pub target: Option<usize>,
    /// Original label text referenced by BEQ/CALL, kept for disassembly.
    pub label: Option<String>,
}

impl Instruction {
    /// The register this instruction writes on commit, if any.
    ///
    /// CALL implicitly writes R1 with the return address.
    #[must_use]
    pub fn dest_register(&self) -> Option<usize> {
        match self.opcode {
            Opcode::Add | Opcode::Sub | Opcode::Nand | Opcode::Mul | Opcode::Load => self.ra,
            Opcode::Call => Some(1),
            Opcode::Store | Opcode::Beq | Opcode::Ret => None,
        }
    }

    /// The (base/first, second) source registers consulted at issue.
    ///
    /// For STORE, the base register (`rb`) is the first operand and the
    /// value-to-store register (`ra`) is the second — STORE's `ra` field
    /// names a source, not the usual destination.
    #[must_use]
    pub fn source_registers(&self) -> (Option<usize>, Option<usize>) {
        match self.opcode {
            Opcode::Add | Opcode::Sub | Opcode::Nand | Opcode::Mul => (self.rb, self.rc),
            Opcode::Load => (self.rb, None),
            Opcode::Store => (self.rb, self.ra),
            Opcode::Beq => (self.ra, self.rb),
            Opcode::Ret => (Some(1), None),
            Opcode::Call => (None, None),
        }
    }
}

/// A parsed program: the dense instruction list plus label lookup, produced
/// once by [`crate::isa::parse_program`] and never mutated afterward.
#[derive(Clone, Debug, Default)]
pub struct Program {
    /// Instructions in program order; `instructions[i].pc == i`.
    pub instructions: Vec<Instruction>,
}

impl Program {
    /// Looks up an instruction by program index.
    #[must_use]
    pub fn get(&self, pc: usize) -> Option<&Instruction> {
        self.instructions.get(pc)
    }

    /// Number of instructions in the program.
    #[must_use]
    pub fn len(&self) -> usize {
        self.instructions.len()
    }

    /// True if the program has no instructions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.instructions.is_empty()
    }
}
