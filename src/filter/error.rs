//! Evaluation error types.

use thiserror::Error;

/// Errors that can occur while evaluating a filter against a document.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    #[error("Property '{name}' not found in '{parent}'")]
    PropertyNotFound { name: String, parent: String },

    #[error("Property has no children: '{value}'")]
    PropertyHasNoChildren { value: String },

    /// The property's runtime type and the literal's lexical form do not
    /// agree (for example a string property compared against a bare number).
    #[error("Type mismatch: property '{property}' = '{value}' while literal is '{literal}'")]
    TypeMismatch {
        property: String,
        value: String,
        literal: String,
    },

    #[error("Invalid operator '{op}' for {type_name} property")]
    InvalidOperator { op: String, type_name: &'static str },

    #[error("Number out of range: '{literal}'")]
    NumberOutOfRange { literal: String },

    #[error("Number has improper syntax: '{literal}'")]
    NumberSyntax { literal: String },

    #[error("Malformed timestamp literal '{literal}': {reason}")]
    MalformedTimestamp { literal: String, reason: String },

    /// An implementation bug, never user input; see [`InternalError`].
    #[error("Internal error: {0}")]
    Internal(#[from] InternalError),
}

/// Internal-consistency violations.
///
/// These signal a malformed filter that cannot be produced by compilation,
/// and are distinct from user-facing compile and evaluation errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InternalError {
    #[error("evaluation stack underflow")]
    StackUnderflow,

    #[error("evaluation ended with {len} values on the stack, expected 1")]
    UnterminatedStack { len: usize },

    #[error("node kind '{0}' must not appear in a compiled filter")]
    UnexpectedNode(&'static str),
}

/// Result type for evaluation.
pub type EvalResult<T> = Result<T, EvalError>;
