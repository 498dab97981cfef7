//! Stack-machine evaluation of compiled filters.
//!
//! Every node kind implements the same [`Evaluable`] contract, so the
//! per-type comparison logic lives in exactly one place.

use crate::collections::Stack;
use crate::document::{Document, Value};
use crate::filter::error::{EvalError, EvalResult, InternalError};
use crate::syntax::{CompareOp, Comparison, Contains, Node, Token};
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::fmt;
use std::num::IntErrorKind;

/// One evaluation step: consume/produce booleans on the stack.
pub trait Evaluable {
    fn evaluate(&self, stack: &mut Stack<bool>, document: &Document) -> EvalResult<()>;
}

/// Walk a postfix node sequence against one document.
///
/// Allocates a private stack per call; the nodes and the document are only
/// read, so any number of walks may run concurrently.
pub fn evaluate(nodes: &[Node], document: &Document) -> EvalResult<bool> {
    let mut stack = Stack::new();
    for node in nodes {
        node.evaluate(&mut stack, document)?;
    }

    let result = match stack.pop() {
        Some(result) => result,
        None => return Err(InternalError::StackUnderflow.into()),
    };
    if !stack.is_empty() {
        return Err(InternalError::UnterminatedStack {
            len: stack.len() + 1,
        }
        .into());
    }
    Ok(result)
}

impl Evaluable for Node {
    fn evaluate(&self, stack: &mut Stack<bool>, document: &Document) -> EvalResult<()> {
        match self {
            Node::And => {
                let (a, b) = pop_pair(stack)?;
                stack.push(a && b);
            }
            Node::Or => {
                let (a, b) = pop_pair(stack)?;
                stack.push(a || b);
            }
            Node::Comparison(comparison) => stack.push(comparison.apply(document)?),
            Node::Contains(contains) => stack.push(contains.apply(document)?),

            // None of these survive compilation
            Node::LeftParen => return Err(InternalError::UnexpectedNode("(").into()),
            Node::RightParen => return Err(InternalError::UnexpectedNode(")").into()),
            Node::Error(_) => return Err(InternalError::UnexpectedNode("error").into()),
            Node::Eof => return Err(InternalError::UnexpectedNode("eof").into()),
        }
        Ok(())
    }
}

/// Pop the two operands of a logical operator (order is irrelevant, the
/// operations are commutative).
fn pop_pair(stack: &mut Stack<bool>) -> EvalResult<(bool, bool)> {
    match (stack.pop(), stack.pop()) {
        (Some(a), Some(b)) => Ok((a, b)),
        _ => Err(InternalError::StackUnderflow.into()),
    }
}

/// Resolve a dot-separated property path against nested documents.
fn resolve<'a>(document: &'a Document, path: &str) -> EvalResult<&'a Value> {
    let mut scope = document;
    let mut segments = path.split('.').peekable();

    while let Some(segment) = segments.next() {
        let value = match scope.get(segment) {
            Some(value) => value,
            None => {
                return Err(EvalError::PropertyNotFound {
                    name: segment.to_string(),
                    parent: scope.to_string(),
                })
            }
        };
        if segments.peek().is_none() {
            return Ok(value);
        }
        match value {
            Value::Map(map) => scope = map,
            other => {
                return Err(EvalError::PropertyHasNoChildren {
                    value: other.to_string(),
                })
            }
        }
    }

    // split() yields at least one segment, so this is only the empty path
    Err(EvalError::PropertyNotFound {
        name: path.to_string(),
        parent: scope.to_string(),
    })
}

/// Strip `prefix` and `suffix` from a Symbol token's lexeme.
fn unquote<'a>(token: &'a Token, prefix: &str, suffix: &str) -> Option<&'a str> {
    let lexeme = match token {
        Token::Symbol(s) => s.as_str(),
        _ => return None,
    };
    if lexeme.len() < prefix.len() + suffix.len() {
        return None;
    }
    lexeme.strip_prefix(prefix)?.strip_suffix(suffix)
}

impl Comparison {
    /// Evaluate this comparison against a document.
    fn apply(&self, document: &Document) -> EvalResult<bool> {
        let resolved = resolve(document, &self.property);

        // Comparisons to null are a special case: the resolution outcome
        // itself is the answer, not an error
        if matches!(&self.literal, Token::Symbol(s) if s == "null") {
            return self.compare_null(resolved.is_ok());
        }

        match resolved? {
            Value::Bool(v) => self.compare_bool(*v),
            Value::Int(v) => self.compare_int(*v),
            Value::Float(v) => self.compare_float(*v),
            Value::String(v) => self.compare_string(v),
            Value::Timestamp(v) => self.compare_timestamp(*v),
            value @ Value::Map(_) => Err(self.type_mismatch(value)),
        }
    }

    fn compare_null(&self, exists: bool) -> EvalResult<bool> {
        match self.op {
            CompareOp::Eq => Ok(!exists),
            CompareOp::Ne => Ok(exists),
            _ => Err(self.invalid_operator("null")),
        }
    }

    fn compare_bool(&self, v: bool) -> EvalResult<bool> {
        let n = match &self.literal {
            Token::Symbol(s) if s == "true" => true,
            Token::Symbol(s) if s == "false" => false,
            _ => return Err(self.type_mismatch(v)),
        };
        match self.op {
            CompareOp::Eq => Ok(v == n),
            CompareOp::Ne => Ok(v != n),
            _ => Err(self.invalid_operator("bool")),
        }
    }

    fn compare_int(&self, v: i64) -> EvalResult<bool> {
        if !self.literal.is_number() {
            return Err(self.type_mismatch(v));
        }
        let lexeme = self.literal.lexeme();
        let n: i64 = lexeme.parse().map_err(|err: std::num::ParseIntError| {
            match err.kind() {
                IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => {
                    EvalError::NumberOutOfRange {
                        literal: lexeme.to_string(),
                    }
                }
                _ => EvalError::NumberSyntax {
                    literal: lexeme.to_string(),
                },
            }
        })?;
        Ok(self.ordering_matches(v.cmp(&n)))
    }

    fn compare_float(&self, v: f64) -> EvalResult<bool> {
        if !self.literal.is_number() {
            return Err(self.type_mismatch(v));
        }
        let lexeme = self.literal.lexeme();
        let n: f64 = lexeme.parse().map_err(|_| EvalError::NumberSyntax {
            literal: lexeme.to_string(),
        })?;
        // IEEE semantics, exact equality, no epsilon
        Ok(match self.op {
            CompareOp::Eq => v == n,
            CompareOp::Ne => v != n,
            CompareOp::Gt => v > n,
            CompareOp::Ge => v >= n,
            CompareOp::Lt => v < n,
            CompareOp::Le => v <= n,
        })
    }

    fn compare_string(&self, v: &str) -> EvalResult<bool> {
        let literal = match unquote(&self.literal, "'", "'") {
            Some(literal) => literal,
            None => return Err(self.type_mismatch(v)),
        };
        Ok(self.ordering_matches(v.cmp(literal)))
    }

    fn compare_timestamp(&self, v: DateTime<Utc>) -> EvalResult<bool> {
        let literal = match unquote(&self.literal, "time'", "'") {
            Some(literal) => literal,
            None => return Err(self.type_mismatch(v.to_rfc3339())),
        };
        let n = DateTime::parse_from_rfc3339(literal).map_err(|err| {
            EvalError::MalformedTimestamp {
                literal: self.literal.lexeme().to_string(),
                reason: err.to_string(),
            }
        })?;
        Ok(self.ordering_matches(v.cmp(&n.with_timezone(&Utc))))
    }

    fn ordering_matches(&self, ordering: Ordering) -> bool {
        match self.op {
            CompareOp::Eq => ordering == Ordering::Equal,
            CompareOp::Ne => ordering != Ordering::Equal,
            CompareOp::Gt => ordering == Ordering::Greater,
            CompareOp::Ge => ordering != Ordering::Less,
            CompareOp::Lt => ordering == Ordering::Less,
            CompareOp::Le => ordering != Ordering::Greater,
        }
    }

    fn type_mismatch(&self, value: impl fmt::Display) -> EvalError {
        EvalError::TypeMismatch {
            property: self.property.clone(),
            value: value.to_string(),
            literal: self.literal.lexeme().to_string(),
        }
    }

    fn invalid_operator(&self, type_name: &'static str) -> EvalError {
        EvalError::InvalidOperator {
            op: self.op.as_str().to_string(),
            type_name,
        }
    }
}

impl Contains {
    /// Evaluate this substring test against a document.
    ///
    /// Paths resolve exactly as they do for comparisons: a missing
    /// property is an error, never a silent false.
    fn apply(&self, document: &Document) -> EvalResult<bool> {
        let value = resolve(document, &self.property)?;
        let v = match value {
            Value::String(s) => s,
            other => return Err(self.type_mismatch(other)),
        };
        match unquote(&self.literal, "'", "'") {
            Some(literal) => Ok(v.contains(literal)),
            None => Err(self.type_mismatch(v)),
        }
    }

    fn type_mismatch(&self, value: impl fmt::Display) -> EvalError {
        EvalError::TypeMismatch {
            property: self.property.clone(),
            value: value.to_string(),
            literal: self.literal.lexeme().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn comparison(property: &str, op: CompareOp, literal: Token) -> Comparison {
        Comparison {
            property: property.to_string(),
            op,
            literal,
        }
    }

    fn symbol(s: &str) -> Token {
        Token::Symbol(s.to_string())
    }

    fn number(s: &str) -> Token {
        Token::Number(s.to_string())
    }

    fn sample() -> Document {
        Document::new()
            .with("string", "Jeff")
            .with("int", 23)
            .with("float", 3.14)
            .with("bool", true)
            .with("time", Utc.with_ymd_and_hms(1990, 1, 1, 0, 0, 0).unwrap())
            .with(
                "child",
                Document::new()
                    .with("childString", "child")
                    .with("childBool", false)
                    .with("childInt", 42),
            )
    }

    #[test]
    fn test_resolve_top_level_and_nested() {
        let doc = sample();
        assert_eq!(resolve(&doc, "int"), Ok(&Value::Int(23)));
        assert_eq!(resolve(&doc, "child.childInt"), Ok(&Value::Int(42)));
    }

    #[test]
    fn test_resolve_missing_property() {
        let doc = sample();
        match resolve(&doc, "missing") {
            Err(EvalError::PropertyNotFound { name, .. }) => assert_eq!(name, "missing"),
            other => panic!("expected PropertyNotFound, got {:?}", other),
        }
        match resolve(&doc, "child.missing") {
            Err(EvalError::PropertyNotFound { name, .. }) => assert_eq!(name, "missing"),
            other => panic!("expected PropertyNotFound, got {:?}", other),
        }
    }

    #[test]
    fn test_resolve_through_leaf() {
        let doc = sample();
        match resolve(&doc, "int.deeper") {
            Err(EvalError::PropertyHasNoChildren { value }) => assert_eq!(value, "23"),
            other => panic!("expected PropertyHasNoChildren, got {:?}", other),
        }
    }

    #[test]
    fn test_int_comparisons() {
        let doc = sample();
        let cases = [
            (CompareOp::Eq, "23", true),
            (CompareOp::Eq, "24", false),
            (CompareOp::Ne, "24", true),
            (CompareOp::Gt, "22", true),
            (CompareOp::Gt, "23", false),
            (CompareOp::Ge, "23", true),
            (CompareOp::Lt, "24", true),
            (CompareOp::Le, "23", true),
            (CompareOp::Le, "22", false),
        ];
        for (op, literal, expected) in cases {
            let c = comparison("int", op, number(literal));
            assert_eq!(c.apply(&doc), Ok(expected), "int {} {}", op.as_str(), literal);
        }
    }

    #[test]
    fn test_int_negative_literal() {
        let doc = Document::new().with("n", -5);
        let c = comparison("n", CompareOp::Lt, number("-4"));
        assert_eq!(c.apply(&doc), Ok(true));
    }

    #[test]
    fn test_int_out_of_range_vs_syntax() {
        let doc = sample();
        let c = comparison("int", CompareOp::Eq, number("99999999999999999999"));
        assert_eq!(
            c.apply(&doc),
            Err(EvalError::NumberOutOfRange {
                literal: "99999999999999999999".to_string()
            })
        );

        // A bare sign lexes as a Number but does not parse as one
        let c = comparison("int", CompareOp::Eq, number("+"));
        assert_eq!(
            c.apply(&doc),
            Err(EvalError::NumberSyntax {
                literal: "+".to_string()
            })
        );
    }

    #[test]
    fn test_float_comparisons() {
        let doc = sample();
        assert_eq!(
            comparison("float", CompareOp::Eq, number("3.14")).apply(&doc),
            Ok(true)
        );
        assert_eq!(
            comparison("float", CompareOp::Le, number("5")).apply(&doc),
            Ok(true)
        );
        assert_eq!(
            comparison("float", CompareOp::Gt, number("3.15")).apply(&doc),
            Ok(false)
        );
    }

    #[test]
    fn test_string_comparisons() {
        let doc = sample();
        assert_eq!(
            comparison("string", CompareOp::Eq, symbol("'Jeff'")).apply(&doc),
            Ok(true)
        );
        assert_eq!(
            comparison("string", CompareOp::Ne, symbol("'Bob'")).apply(&doc),
            Ok(true)
        );
        // Lexicographic ordering
        assert_eq!(
            comparison("string", CompareOp::Gt, symbol("'Jefe'")).apply(&doc),
            Ok(true)
        );
        assert_eq!(
            comparison("string", CompareOp::Lt, symbol("'Jeg'")).apply(&doc),
            Ok(true)
        );
    }

    #[test]
    fn test_bool_comparisons() {
        let doc = sample();
        assert_eq!(
            comparison("bool", CompareOp::Eq, symbol("true")).apply(&doc),
            Ok(true)
        );
        assert_eq!(
            comparison("bool", CompareOp::Ne, symbol("false")).apply(&doc),
            Ok(true)
        );
        assert_eq!(
            comparison("bool", CompareOp::Gt, symbol("false")).apply(&doc),
            Err(EvalError::InvalidOperator {
                op: "gt".to_string(),
                type_name: "bool"
            })
        );
    }

    #[test]
    fn test_timestamp_comparisons() {
        let doc = sample();
        assert_eq!(
            comparison("time", CompareOp::Gt, symbol("time'1989-01-01T00:00:00Z'")).apply(&doc),
            Ok(true)
        );
        assert_eq!(
            comparison("time", CompareOp::Eq, symbol("time'1990-01-01T00:00:00Z'")).apply(&doc),
            Ok(true)
        );
        assert_eq!(
            comparison("time", CompareOp::Lt, symbol("time'1989-01-01T00:00:00Z'")).apply(&doc),
            Ok(false)
        );
        // Offsets are normalized before comparing
        assert_eq!(
            comparison("time", CompareOp::Eq, symbol("time'1990-01-01T01:00:00+01:00'"))
                .apply(&doc),
            Ok(true)
        );
    }

    #[test]
    fn test_malformed_timestamp() {
        let doc = sample();
        match comparison("time", CompareOp::Eq, symbol("time'1990-13-01T00:00:00Z'")).apply(&doc) {
            Err(EvalError::MalformedTimestamp { literal, .. }) => {
                assert_eq!(literal, "time'1990-13-01T00:00:00Z'")
            }
            other => panic!("expected MalformedTimestamp, got {:?}", other),
        }
    }

    #[test]
    fn test_null_comparisons() {
        let doc = sample();
        assert_eq!(
            comparison("missing", CompareOp::Eq, symbol("null")).apply(&doc),
            Ok(true)
        );
        assert_eq!(
            comparison("missing", CompareOp::Ne, symbol("null")).apply(&doc),
            Ok(false)
        );
        assert_eq!(
            comparison("int", CompareOp::Eq, symbol("null")).apply(&doc),
            Ok(false)
        );
        assert_eq!(
            comparison("int", CompareOp::Ne, symbol("null")).apply(&doc),
            Ok(true)
        );
        // Nested absence is still "absent"
        assert_eq!(
            comparison("child.missing", CompareOp::Eq, symbol("null")).apply(&doc),
            Ok(true)
        );
        assert_eq!(
            comparison("missing", CompareOp::Gt, symbol("null")).apply(&doc),
            Err(EvalError::InvalidOperator {
                op: "gt".to_string(),
                type_name: "null"
            })
        );
    }

    #[test]
    fn test_type_mismatch_names_property_value_and_literal() {
        let doc = sample();
        assert_eq!(
            comparison("string", CompareOp::Eq, number("5")).apply(&doc),
            Err(EvalError::TypeMismatch {
                property: "string".to_string(),
                value: "Jeff".to_string(),
                literal: "5".to_string(),
            })
        );
        // Unquoted symbol against a string property
        assert_eq!(
            comparison("string", CompareOp::Eq, symbol("Jeff")).apply(&doc),
            Err(EvalError::TypeMismatch {
                property: "string".to_string(),
                value: "Jeff".to_string(),
                literal: "Jeff".to_string(),
            })
        );
        // Quoted string against an int property
        assert!(matches!(
            comparison("int", CompareOp::Eq, symbol("'23'")).apply(&doc),
            Err(EvalError::TypeMismatch { .. })
        ));
        // A nested map is not comparable to any literal
        assert!(matches!(
            comparison("child", CompareOp::Eq, number("1")).apply(&doc),
            Err(EvalError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_contains() {
        let doc = sample();
        let c = Contains {
            property: "string".to_string(),
            literal: symbol("'ef'"),
        };
        assert_eq!(c.apply(&doc), Ok(true));

        let c = Contains {
            property: "string".to_string(),
            literal: symbol("'xyz'"),
        };
        assert_eq!(c.apply(&doc), Ok(false));
    }

    #[test]
    fn test_contains_missing_property_is_an_error() {
        let doc = sample();
        let c = Contains {
            property: "missing".to_string(),
            literal: symbol("'ef'"),
        };
        assert!(matches!(
            c.apply(&doc),
            Err(EvalError::PropertyNotFound { .. })
        ));
    }

    #[test]
    fn test_contains_type_mismatches() {
        let doc = sample();
        // Non-string property
        let c = Contains {
            property: "int".to_string(),
            literal: symbol("'2'"),
        };
        assert!(matches!(c.apply(&doc), Err(EvalError::TypeMismatch { .. })));

        // Unquoted literal
        let c = Contains {
            property: "string".to_string(),
            literal: symbol("ef"),
        };
        assert!(matches!(c.apply(&doc), Err(EvalError::TypeMismatch { .. })));

        // Null literal is not a substring
        let c = Contains {
            property: "string".to_string(),
            literal: symbol("null"),
        };
        assert!(matches!(c.apply(&doc), Err(EvalError::TypeMismatch { .. })));
    }

    #[test]
    fn test_logical_nodes_pop_two_push_one() {
        let doc = sample();
        let mut stack = Stack::new();
        stack.push(true);
        stack.push(false);
        Node::And.evaluate(&mut stack, &doc).unwrap();
        assert_eq!(stack.pop(), Some(false));

        let mut stack = Stack::new();
        stack.push(true);
        stack.push(false);
        Node::Or.evaluate(&mut stack, &doc).unwrap();
        assert_eq!(stack.pop(), Some(true));
    }

    #[test]
    fn test_stack_underflow_is_internal() {
        let doc = sample();
        let mut stack = Stack::new();
        stack.push(true);
        assert_eq!(
            Node::And.evaluate(&mut stack, &doc),
            Err(EvalError::Internal(InternalError::StackUnderflow))
        );
    }

    #[test]
    fn test_malformed_sequences_are_internal_errors() {
        let doc = sample();
        // Empty sequence leaves nothing on the stack
        assert_eq!(
            evaluate(&[], &doc),
            Err(EvalError::Internal(InternalError::StackUnderflow))
        );
        // Two operands with no operator leave two values
        let c = Node::Comparison(comparison("int", CompareOp::Eq, number("23")));
        assert_eq!(
            evaluate(&[c.clone(), c], &doc),
            Err(EvalError::Internal(InternalError::UnterminatedStack {
                len: 2
            }))
        );
        // Parens never appear in a compiled filter
        assert_eq!(
            evaluate(&[Node::LeftParen], &doc),
            Err(EvalError::Internal(InternalError::UnexpectedNode("(")))
        );
    }
}
