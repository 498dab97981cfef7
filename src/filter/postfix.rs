// Infix to postfix conversion via the shunting-yard algorithm

use crate::collections::{Queue, Stack};
use crate::syntax::Node;

/// Convert an infix node sequence into postfix (reverse-polish) order.
///
/// `and` binds tighter than `or`; both are left-associative. Parentheses
/// are fully resolved here and never appear in the output. An `Error`
/// node is passed through to the output and ends the conversion, so
/// compilation can surface it.
pub fn to_postfix(nodes: Vec<Node>) -> Vec<Node> {
    let mut output: Queue<Node> = Queue::new();
    let mut operators: Stack<Node> = Stack::new();

    for node in nodes {
        match node {
            Node::Eof => break,

            Node::Error(_) => {
                output.enqueue(node);
                break;
            }

            // Operands go straight to the output
            Node::Comparison(_) | Node::Contains(_) => output.enqueue(node),

            Node::LeftParen | Node::And => operators.push(node),

            // Pop higher-precedence 'and's before pushing 'or'
            Node::Or => {
                while operators.peek() == Some(&Node::And) {
                    if let Some(op) = operators.pop() {
                        output.enqueue(op);
                    }
                }
                operators.push(node);
            }

            // Pop to the output until the matching '(' (both discarded).
            // The parser rejects unbalanced input, so the '(' is always
            // found; if it somehow is not, the evaluator's stack checks
            // report the malformed filter.
            Node::RightParen => {
                while let Some(op) = operators.pop() {
                    match op {
                        Node::LeftParen => break,
                        op => output.enqueue(op),
                    }
                }
            }
        }
    }

    // Input exhausted; drain the remaining operators in pop order
    while let Some(op) = operators.pop() {
        output.enqueue(op);
    }

    output.into_vec()
}
