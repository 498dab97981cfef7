// Syntax module - lexical scanning and parsing of filter expressions

pub mod error;
pub mod lexer;
pub mod node;
pub mod parser;
pub mod token;

pub use error::CompileError;
pub use lexer::Lexer;
pub use node::{CompareOp, Comparison, Contains, Node};
pub use parser::Parser;
pub use token::Token;
