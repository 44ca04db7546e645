//! Error types surfaced at the core API boundary.
//!
//! Every recoverable failure the core can produce — a malformed assembly
//! source, an out-of-range memory initializer — is represented here as a
//! structured, `thiserror`-derived type rather than a bare `String`. Internal
//! invariant violations (I1–I5) are not represented as errors: they panic,
//! since they indicate a bug in the engine rather than a bad input.

use thiserror::Error;

/// A single diagnostic produced while parsing assembly source.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseError {
    /// 1-based source line the error was detected on.
    pub line: usize,
    /// Human-readable description of what went wrong.
    pub message: String,
}

impl ParseError {
    pub(crate) fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}: {}", self.line, self.message)
    }
}

impl std::error::Error for ParseError {}

/// Failure loading a program: parsing aborts on the first pass that collects
/// every error it can find, so callers get the whole list at once.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
#[error("program failed to parse ({} error(s))", .0.len())]
pub struct LoadError(pub Vec<ParseError>);

/// Failure initializing memory contents ahead of a run.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum MemoryInitError {
    /// A value outside the representable 16-bit unsigned range (0..=65535).
    #[error("value {value} at address {address} does not fit in 0..=65535")]
    ValueOutOfRange {
        /// Offending address.
        address: u32,
        /// Offending value, as given by the caller.
        value: i64,
    },
    /// An address outside the representable 16-bit address space (0..=65535).
    #[error("address {address} does not fit in 0..=65535")]
    AddressOutOfRange {
        /// Offending address, as given by the caller.
        address: i64,
    },
    /// A negative address was supplied.
    #[error("address {address} is negative")]
    NegativeAddress {
        /// Offending address.
        address: i64,
    },
}
