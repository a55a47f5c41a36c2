use thiserror::Error;

/// Errors that can arise while replaying or minimising a proof.
#[derive(Debug, Error)]
pub enum CheckerError {
    #[error("failed to parse input: {0}")]
    Parse(#[from] pbcheck_format::FormatError),

    #[error("constraint error: {0}")]
    Constraint(#[from] crate::constraint::ConstraintError),

    #[error("axiom count mismatch: header declares {declared}, parser found {actual}")]
    CountMismatch { declared: u64, actual: u64 },

    #[error("step {step}: RUP check failed, no contradiction reached from the negated constraint")]
    RupFailure { step: u64 },

    #[error("step {step}: claimed solution is not a valid total model")]
    InvalidSolution { step: u64 },

    #[error("attempted to delete model constraint {id}, which is immutable")]
    IllegalDelete { id: u64 },

    #[error("step {step}: cited constraint {cited} is not falsified by the empty assignment")]
    ContradictionAbsent { step: u64, cited: u64 },

    #[error("step {step}: reference to unknown or tombstoned constraint {referenced}")]
    DanglingReference { step: u64, referenced: u64 },

    #[error("step {step}: malformed polish expression, {reason}")]
    MalformedPolish { step: u64, reason: String },
}
