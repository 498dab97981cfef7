// Filter module - compilation and evaluation of filter expressions

pub mod error;
pub mod eval;
pub mod postfix;

pub use error::{EvalError, EvalResult, InternalError};
pub use eval::Evaluable;

use crate::document::Document;
use crate::syntax::{CompileError, Node, Parser};
use log::debug;

/// A compiled filter expression.
///
/// Example of a filter string:
///
///   (name eq 'Jeff' and age gt 30) or (student eq true and semester.gpa gt 3.5) and graduated gt time'2020-01-01T00:00:00Z'
///
/// A logical operation is one of: `and`, `or`; `or` has lower precedence,
/// so `A and B or C and D` means `(A and B) or (C and D)`.
/// A comparison operation is one of: `eq`, `ne`, `gt`, `ge`, `lt`, `le`.
/// A property name addresses a document field; use a period to step into
/// child documents (ex: `gpa` is a child of `semester`).
/// A literal value (after a comparison operator) can be:
///   boolean: `true` | `false`
///   integer: `(+|-) <digits>` -- no decimal point
///   float:   `(+|-) <digits> . <digits>`
///   string:  `'<text>'`
///   time:    `time'<rfc3339 time>'`
///   `null`   (tests the presence (`ne`) / absence (`eq`) of a property)
/// The `contains(property, 'text')` function tests for a substring.
///
/// The compiled form is an immutable postfix node sequence: it can be
/// evaluated any number of times, from any number of threads, against
/// documents it never takes ownership of.
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    nodes: Vec<Node>,
}

impl Filter {
    /// Compile a filter string.
    ///
    /// Compilation fails fast: the first lexical or syntactic problem is
    /// returned and no further errors are collected.
    pub fn new(filter: &str) -> Result<Filter, CompileError> {
        let nodes = postfix::to_postfix(Parser::new(filter).parse());
        debug!("compiled {:?} to {:?}", filter, nodes);
        for node in &nodes {
            if let Node::Error(err) = node {
                return Err(err.clone());
            }
        }
        Ok(Filter { nodes })
    }

    /// Apply the filter to a document.
    ///
    /// Each of the document's values must be a bool, integer, float,
    /// string, timestamp, or a child document (arrays are not supported).
    pub fn evaluate(&self, document: &Document) -> EvalResult<bool> {
        eval::evaluate(&self.nodes, document)
    }
}
