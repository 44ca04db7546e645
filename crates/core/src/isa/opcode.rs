//! Opcode enum and the per-opcode tables that drive issue, dispatch and
//! commit. The engine never matches on opcode names directly outside this
//! module — everything else consults [`Opcode::rs_class`],
//! [`Opcode::dest_register`] or [`Opcode::source_registers`].

use serde::Serialize;
use std::fmt;

/// The reservation-station/functional-unit class an opcode dispatches to.
///
/// CALL and RET share a class: the spec names a single `CALL/RET` RS and a
/// single `CALL/RET` functional unit, not two independent ones.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum RsClass {
    /// ADD and SUB.
    AddSub,
    /// NAND.
    Nand,
    /// MUL.
    Mul,
    /// LOAD.
    Load,
    /// STORE.
    Store,
    /// BEQ.
    Beq,
    /// CALL and RET.
    CallRet,
}

impl RsClass {
    /// All classes, in a fixed order used to size station/unit pools.
    pub const ALL: [RsClass; 7] = [
        RsClass::AddSub,
        RsClass::Nand,
        RsClass::Mul,
        RsClass::Load,
        RsClass::Store,
        RsClass::Beq,
        RsClass::CallRet,
    ];
}

/// The nine opcodes of the target machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum Opcode {
    /// `ADD rA,rB,rC`: rA <- rB + rC.
    Add,
    /// `SUB rA,rB,rC`: rA <- rB - rC.
    Sub,
    /// `NAND rA,rB,rC`: rA <- ~(rB & rC).
    Nand,
    /// `MUL rA,rB,rC`: rA <- low 16 bits of rB * rC.
    Mul,
    /// `LOAD rA,imm(rB)`: rA <- Memory[rB + imm].
    Load,
    /// `STORE rA,imm(rB)`: Memory[rB + imm] <- rA.
    Store,
    /// `BEQ rA,rB,label`: if rA == rB, PC <- PC + 1 + imm, else PC + 1.
    Beq,
    /// `CALL target`: R1 <- PC + 1; PC <- target.
    Call,
    /// `RET`: PC <- R1.
    Ret,
}

impl Opcode {
    /// Mnemonic as it appears in assembly source.
    #[must_use]
    pub fn mnemonic(self) -> &'static str {
        match self {
            Opcode::Add => "ADD",
            Opcode::Sub => "SUB",
            Opcode::Nand => "NAND",
            Opcode::Mul => "MUL",
            Opcode::Load => "LOAD",
            Opcode::Store => "STORE",
            Opcode::Beq => "BEQ",
            Opcode::Call => "CALL",
            Opcode::Ret => "RET",
        }
    }

    /// Parses a mnemonic (case-sensitive, as listed in the spec).
    #[must_use]
    pub fn from_mnemonic(s: &str) -> Option<Self> {
        Some(match s {
            "ADD" => Opcode::Add,
            "SUB" => Opcode::Sub,
            "NAND" => Opcode::Nand,
            "MUL" => Opcode::Mul,
            "LOAD" => Opcode::Load,
            "STORE" => Opcode::Store,
            "BEQ" => Opcode::Beq,
            "CALL" => Opcode::Call,
            "RET" => Opcode::Ret,
            _ => return None,
        })
    }

    /// The reservation-station/functional-unit class this opcode dispatches to.
    #[must_use]
    pub fn rs_class(self) -> RsClass {
        match self {
            Opcode::Add | Opcode::Sub => RsClass::AddSub,
            Opcode::Nand => RsClass::Nand,
            Opcode::Mul => RsClass::Mul,
            Opcode::Load => RsClass::Load,
            Opcode::Store => RsClass::Store,
            Opcode::Beq => RsClass::Beq,
            Opcode::Call | Opcode::Ret => RsClass::CallRet,
        }
    }

    /// True for ADD/SUB/NAND/MUL.
    #[must_use]
    pub fn is_arithmetic(self) -> bool {
        matches!(self, Opcode::Add | Opcode::Sub | Opcode::Nand | Opcode::Mul)
    }

    /// True for BEQ/CALL/RET — opcodes whose completion may redirect the PC.
    #[must_use]
    pub fn is_branch_like(self) -> bool {
        matches!(self, Opcode::Beq | Opcode::Call | Opcode::Ret)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.mnemonic())
    }
}
