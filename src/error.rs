//! Error taxonomy shared by the expression engine and the primitives
//!
//! No error is recovered inside the crate: every variant propagates to the
//! caller. "No intersection" is never an error, see [`crate::types::Intersection`].

use crate::expr::EvaluationType;
use thiserror::Error;

/// Result alias used throughout the crate
pub type EvalResult<T> = Result<T, EvalError>;

/// Evaluation and construction errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// A variable was looked up but nothing is bound to it
    #[error("unbound variable `{0}`")]
    UnboundVariable(String),

    /// Real zero divisor, or an interval divisor containing zero
    #[error("division by zero")]
    DivisionByZero,

    /// Operator/mode combination that is not supported
    #[error("{operation} is not implemented in {mode} mode")]
    Unimplemented {
        /// Operator or function name
        operation: String,
        /// Evaluation mode that was requested
        mode: EvaluationType,
    },

    /// A variable's binding refers back to the variable itself
    #[error("variable `{0}` is bound to an expression that refers to itself")]
    CyclicBinding(String),

    /// Rejected at construction time, before any ray is traced
    #[error("invalid construction: {0}")]
    InvalidConstruction(String),

    /// Vector operands (or composed functions) whose dimensions do not fit
    #[error("dimension mismatch: {left} vs {right}")]
    DimensionMismatch {
        /// Left-hand (or inner) dimension
        left: usize,
        /// Right-hand (or outer) dimension
        right: usize,
    },

    /// A value of the wrong kind reached an operation
    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        /// Kind of value the operation requires
        expected: &'static str,
        /// Kind of value it received
        found: &'static str,
    },
}

impl EvalError {
    pub(crate) fn unimplemented(operation: impl Into<String>, mode: EvaluationType) -> Self {
        EvalError::Unimplemented {
            operation: operation.into(),
            mode,
        }
    }

    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        EvalError::InvalidConstruction(reason.into())
    }
}
