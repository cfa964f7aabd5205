//! Error types for trellis.

use thiserror::Error;

/// Top-level error type for trellis.
#[derive(Debug, Error)]
pub enum TrellisError {
    #[error(transparent)]
    Solver(#[from] SolverError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Nonlinear(#[from] NonlinearExpression),
}

/// Errors reported by the constraint solver.
///
/// `Internal` signals a broken solver invariant rather than a usage mistake.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SolverError {
    #[error("The constraint has already been added to the solver")]
    DuplicateConstraint,

    #[error("The constraint is required and cannot be satisfied")]
    UnsatisfiableConstraint,

    #[error("The constraint has not been added to the solver")]
    UnknownConstraint,

    #[error("The variable is already registered as an edit variable")]
    DuplicateEditVariable,

    #[error("The variable is not registered as an edit variable")]
    UnknownEditVariable,

    #[error("Edit variables cannot have required strength")]
    RequiredFailure,

    #[error("Internal solver error: {0}")]
    Internal(&'static str),
}

/// Product or quotient of two non-constant expressions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("Cannot multiply or divide by a non-constant expression")]
pub struct NonlinearExpression;

/// Errors while parsing constraint text.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("Unexpected input at column {column}: expected {expected}, found {found:?}")]
    UnexpectedToken {
        found: String,
        expected: String,
        column: usize,
    },

    #[error("Unknown strength: {name}")]
    UnknownStrength { name: String },

    #[error("Unexpected end of input: expected {expected}")]
    UnexpectedEof { expected: String },

    #[error(transparent)]
    Nonlinear(#[from] NonlinearExpression),
}
