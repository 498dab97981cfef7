//! Compile-time (lexical/syntactic) error types.

use thiserror::Error;

/// Errors reported while compiling a filter expression.
///
/// Compilation fails fast: the first problem found is the only one
/// reported, and no `Filter` is produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CompileError {
    /// The lexer hit a character outside the language; carries the
    /// remainder of the input starting at that character.
    #[error("{0}")]
    InvalidCharacter(String),

    #[error("Unbalanced parentheses")]
    UnbalancedParentheses,

    #[error("Unrecognized function name: {0}")]
    UnknownFunction(String),

    #[error("Expected property name in call to '{0}'")]
    ExpectedPropertyName(String),

    #[error("Expected ',' after property name: {0}")]
    ExpectedComma(String),

    #[error("Expected literal after ','")]
    ExpectedFunctionLiteral,

    #[error("Expected ')' after literal: {0}")]
    ExpectedRightParen(String),

    #[error("Expected comparison operator after property name: {0}")]
    ExpectedOperator(String),

    #[error("Invalid comparison operator: '{0}'")]
    InvalidOperator(String),

    #[error("Expected literal after comparison operator: {0}")]
    ExpectedLiteral(String),
}
