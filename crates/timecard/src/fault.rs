//! Closed taxonomy shared by every workflow error.
//!
//! Transport adapters decide how to surface a failure from its kind alone;
//! the stable code travels with the message so callers can match on it
//! without parsing prose.

use std::fmt;

/// The closed set of failure categories the engine reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// A referenced employee, request, or grant does not exist.
    NotFound,
    /// The entity exists but the operation is not legal in its current state.
    InvalidState,
    /// Malformed or missing input detected before any rule evaluation.
    InvalidInput,
    /// Input was well-formed but a business rule rejected it.
    RuleViolation,
    /// Storage or infrastructure failure; nothing was committed.
    Internal,
}

impl FaultKind {
    pub const fn label(self) -> &'static str {
        match self {
            FaultKind::NotFound => "not_found",
            FaultKind::InvalidState => "invalid_state",
            FaultKind::InvalidInput => "invalid_input",
            FaultKind::RuleViolation => "rule_violation",
            FaultKind::Internal => "internal",
        }
    }
}

impl fmt::Display for FaultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Implemented by every workflow error so call sites can branch on the
/// category and report a stable machine-readable code.
pub trait Fault {
    fn kind(&self) -> FaultKind;
    fn code(&self) -> &'static str;
}
