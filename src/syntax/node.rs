// Expression nodes produced by the parser

use super::error::CompileError;
use super::token::Token;

/// Comparison operators of the filter language.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CompareOp {
    Eq,
    Ne,
    Gt,
    Ge,
    Lt,
    Le,
}

impl CompareOp {
    /// Convert a lexeme to an operator if it matches.
    pub fn from_lexeme(s: &str) -> Option<CompareOp> {
        match s {
            "eq" => Some(CompareOp::Eq),
            "ne" => Some(CompareOp::Ne),
            "gt" => Some(CompareOp::Gt),
            "ge" => Some(CompareOp::Ge),
            "lt" => Some(CompareOp::Lt),
            "le" => Some(CompareOp::Le),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CompareOp::Eq => "eq",
            CompareOp::Ne => "ne",
            CompareOp::Gt => "gt",
            CompareOp::Ge => "ge",
            CompareOp::Lt => "lt",
            CompareOp::Le => "le",
        }
    }
}

/// A property comparison: `property op literal`.
///
/// The literal token stays raw text; it is parsed against the property's
/// runtime type at evaluation time.
#[derive(Debug, Clone, PartialEq)]
pub struct Comparison {
    /// Dot-separated path addressing a (possibly nested) document field.
    pub property: String,
    pub op: CompareOp,
    pub literal: Token,
}

/// A `contains(property, 'literal')` substring test.
#[derive(Debug, Clone, PartialEq)]
pub struct Contains {
    pub property: String,
    pub literal: Token,
}

/// A node of the filter expression.
///
/// The parser emits these in infix order; the postfix reducer rewrites the
/// sequence into postfix order, at which point `LeftParen`/`RightParen`
/// no longer appear.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    LeftParen,
    RightParen,
    And,
    Or,
    Comparison(Comparison),
    Contains(Contains),
    /// Parsing failed; always the last node of its stream.
    Error(CompileError),
    Eof,
}
