// Filter parser - converts tokens to an infix node sequence

use super::error::CompileError;
use super::lexer::Lexer;
use super::node::{CompareOp, Comparison, Contains, Node};
use super::token::Token;
use log::trace;

/// Parses a token stream into expression nodes in infix order.
///
/// Uses single-token lookahead with pushback, no further backtracking.
/// The first syntax problem ends parsing: an `Error` node is emitted as
/// the final node and nothing after it is examined.
pub struct Parser {
    tokens: Vec<Token>,
    position: usize,
}

impl Parser {
    pub fn new(filter: &str) -> Self {
        let mut lexer = Lexer::new(filter.to_string());
        let tokens = lexer.tokenize();
        Parser {
            tokens,
            position: 0,
        }
    }

    /// Parse the token stream into nodes.
    ///
    /// The returned sequence always ends with exactly one `Eof` or one
    /// `Error` node.
    pub fn parse(mut self) -> Vec<Node> {
        let mut nodes = Vec::new();
        let mut depth = 0usize;

        loop {
            match self.next() {
                Token::Error(msg) => {
                    return Self::emit_error(nodes, CompileError::InvalidCharacter(msg));
                }

                Token::Eof => {
                    if depth > 0 {
                        return Self::emit_error(nodes, CompileError::UnbalancedParentheses);
                    }
                    Self::emit(&mut nodes, Node::Eof);
                    return nodes;
                }

                Token::LeftParen => {
                    depth += 1;
                    Self::emit(&mut nodes, Node::LeftParen);
                }

                Token::RightParen => {
                    // A close with no matching open can never balance out
                    if depth == 0 {
                        return Self::emit_error(nodes, CompileError::UnbalancedParentheses);
                    }
                    depth -= 1;
                    Self::emit(&mut nodes, Node::RightParen);
                }

                Token::Symbol(symbol) => {
                    if symbol == "and" {
                        Self::emit(&mut nodes, Node::And);
                    } else if symbol == "or" {
                        Self::emit(&mut nodes, Node::Or);
                    } else {
                        // Property or function name
                        let node = if self.accept(&Token::LeftParen) {
                            self.parse_function(&symbol)
                        } else {
                            self.parse_comparison(symbol)
                        };
                        match node {
                            Ok(node) => Self::emit(&mut nodes, node),
                            Err(err) => return Self::emit_error(nodes, err),
                        }
                    }
                }

                // Stray commas and numbers in term position carry no meaning
                // and are dropped, matching the surface grammar
                Token::Comma | Token::Number(_) => {}
            }
        }
    }

    /// Parse a function call; the name and its `(` are already consumed.
    /// `contains(property, literal)` is the only recognized function.
    fn parse_function(&mut self, name: &str) -> Result<Node, CompileError> {
        if name != "contains" {
            return Err(CompileError::UnknownFunction(name.to_string()));
        }

        let property = match self.next() {
            Token::Eof => return Err(CompileError::ExpectedPropertyName(name.to_string())),
            Token::Error(msg) => return Err(CompileError::InvalidCharacter(msg)),
            token => token,
        };
        if !self.accept(&Token::Comma) {
            return Err(CompileError::ExpectedComma(property.lexeme().to_string()));
        }
        let literal = match self.next() {
            Token::Eof => return Err(CompileError::ExpectedFunctionLiteral),
            Token::Error(msg) => return Err(CompileError::InvalidCharacter(msg)),
            token => token,
        };
        if !self.accept(&Token::RightParen) {
            return Err(CompileError::ExpectedRightParen(literal.lexeme().to_string()));
        }

        Ok(Node::Contains(Contains {
            property: property.lexeme().to_string(),
            literal,
        }))
    }

    /// Parse `property op literal`; the property symbol is already consumed.
    fn parse_comparison(&mut self, property: String) -> Result<Node, CompileError> {
        let op = match self.next() {
            Token::Symbol(op) => match CompareOp::from_lexeme(&op) {
                Some(op) => op,
                None => return Err(CompileError::InvalidOperator(op)),
            },
            _ => return Err(CompileError::ExpectedOperator(property)),
        };

        let literal = match self.next() {
            Token::Eof => return Err(CompileError::ExpectedLiteral(op.as_str().to_string())),
            Token::Error(msg) => return Err(CompileError::InvalidCharacter(msg)),
            token => token,
        };

        Ok(Node::Comparison(Comparison {
            property,
            op,
            literal,
        }))
    }

    /// Read the next token. The stream is terminated by `Eof` or `Error`,
    /// and reads past the end stay clamped on that terminator.
    fn next(&mut self) -> Token {
        if self.position >= self.tokens.len() {
            return self.tokens.last().cloned().unwrap_or(Token::Eof);
        }
        self.position += 1;
        self.tokens[self.position - 1].clone()
    }

    /// Place the previously read token back.
    fn backup(&mut self) {
        self.position -= 1;
    }

    /// Consume the next token if it matches, otherwise push it back.
    fn accept(&mut self, expected: &Token) -> bool {
        if self.next() == *expected {
            return true;
        }
        self.backup();
        false
    }

    fn emit(nodes: &mut Vec<Node>, node: Node) {
        trace!("node: {:?}", node);
        nodes.push(node);
    }

    fn emit_error(mut nodes: Vec<Node>, err: CompileError) -> Vec<Node> {
        trace!("node: error: {}", err);
        nodes.push(Node::Error(err));
        nodes
    }
}
