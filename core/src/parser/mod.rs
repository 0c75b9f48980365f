pub mod ast;
pub mod error;
#[allow(clippy::module_inception)]
pub mod parser;
mod syntax;
mod token;
mod tokenizer;

pub use ast::{ArithmeticOp, ComparisonOp, Literal, LogicalOp, Node, NodeKind, SelectionMode, UnaryOp};
pub use error::{ParseError, ParseErrorKind};
pub use parser::{Parser, parse, parse_with_options};
pub use syntax::Span;
pub use token::{Token, TokenKind};
pub use tokenizer::{LexicalError, Tokenizer};

#[cfg(test)]
mod parse_test;
