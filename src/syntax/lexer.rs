// Filter lexer - tokenizes a filter expression

use super::token::Token;
use log::trace;

/// Characters that may continue a symbol: letters, digits, and the
/// characters needed for quoted strings and RFC3339 timestamps.
fn is_symbol_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || matches!(ch, '\'' | '-' | ':' | '.')
}

pub struct Lexer {
    input: String,
    position: usize,
    current_char: Option<char>,
}

impl Lexer {
    pub fn new(input: String) -> Self {
        let mut lexer = Lexer {
            input,
            position: 0,
            current_char: None,
        };
        lexer.current_char = lexer.input.chars().next();
        lexer
    }

    /// Get the next token from the input.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace();

        let ch = match self.current_char {
            Some(ch) => ch,
            None => return Token::Eof,
        };

        match ch {
            '(' => {
                self.advance();
                Token::LeftParen
            }
            ')' => {
                self.advance();
                Token::RightParen
            }
            ',' => {
                self.advance();
                Token::Comma
            }
            '+' | '-' => self.read_number(),
            c if c.is_ascii_digit() => self.read_number(),
            c if c.is_ascii_alphabetic() || c == '\'' => self.read_symbol(),
            _ => {
                // Scanning halts here; the message carries the rest of the input
                let rest: String = self.input.chars().skip(self.position).collect();
                Token::Error(format!("Invalid character: {}", rest))
            }
        }
    }

    /// Advance to the next character
    fn advance(&mut self) {
        self.position += 1;
        self.current_char = self.input.chars().nth(self.position);
    }

    /// Skip spaces and tabs; they are never tokenized
    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.current_char {
            if ch == ' ' || ch == '\t' {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Read a number: optional sign, digit run, optional `.` and digit run.
    ///
    /// The digit runs are consumed greedily, so a bare trailing dot stays
    /// part of the lexeme; the evaluator rejects it when the literal is
    /// parsed against a typed property.
    fn read_number(&mut self) -> Token {
        let mut number = String::new();

        if let Some(ch @ ('+' | '-')) = self.current_char {
            number.push(ch);
            self.advance();
        }
        while let Some(ch) = self.current_char {
            if ch.is_ascii_digit() {
                number.push(ch);
                self.advance();
            } else {
                break;
            }
        }
        if self.current_char == Some('.') {
            number.push('.');
            self.advance();
            while let Some(ch) = self.current_char {
                if ch.is_ascii_digit() {
                    number.push(ch);
                    self.advance();
                } else {
                    break;
                }
            }
        }

        Token::Number(number)
    }

    /// Read a symbol: a maximal run of letters, digits, `'`, `-`, `:`, `.`.
    fn read_symbol(&mut self) -> Token {
        let mut symbol = String::new();

        while let Some(ch) = self.current_char {
            if is_symbol_char(ch) {
                symbol.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        Token::Symbol(symbol)
    }

    /// Tokenize the entire input.
    ///
    /// The returned stream always ends with exactly one `Eof` or, when an
    /// unrecognized character is hit, one `Error` (no recovery).
    pub fn tokenize(&mut self) -> Vec<Token> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token();
            trace!("token: {:?}", token);
            let done = matches!(token, Token::Eof | Token::Error(_));
            tokens.push(token);
            if done {
                break;
            }
        }

        tokens
    }
}
