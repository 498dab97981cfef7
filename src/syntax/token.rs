// Lexical tokens of the filter language

/// A lexical token produced by the lexer.
///
/// Quoted strings, `time'…'` literals, and bare words such as `true`,
/// `null`, and `and` all scan as `Symbol`; the parser and evaluator
/// distinguish them by context.
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Identifier, keyword, quoted string, or timestamp literal.
    Symbol(String),
    /// Signed integer or decimal literal, kept as raw text.
    Number(String),
    LeftParen,
    RightParen,
    Comma,
    Eof,
    /// Scanning failed; carries the offending remainder of the input.
    Error(String),
}

impl Token {
    /// The textual form of this token.
    pub fn lexeme(&self) -> &str {
        match self {
            Token::Symbol(s) => s,
            Token::Number(s) => s,
            Token::LeftParen => "(",
            Token::RightParen => ")",
            Token::Comma => ",",
            Token::Eof => "",
            Token::Error(msg) => msg,
        }
    }

    pub fn is_symbol(&self) -> bool {
        matches!(self, Token::Symbol(_))
    }

    pub fn is_number(&self) -> bool {
        matches!(self, Token::Number(_))
    }
}
