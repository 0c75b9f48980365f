use thiserror::Error;

use crate::api::{Diagnostic, RelatedInfo, Severity};
use crate::parser::{LexicalError, Span, TokenKind};

/// Parser error with the offending source range.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}")]
pub struct ParseError {
    pub kind: ParseErrorKind,
    pub span: Span,
}

/// Specific kinds of parse errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseErrorKind {
    /// Tokenizer failure
    #[error(transparent)]
    Lexical(#[from] LexicalError),

    /// Unexpected token
    #[error("expected {expected}, found {found}")]
    UnexpectedToken {
        expected: TokenKind,
        found: TokenKind,
    },

    /// Input ended before the closing delimiter
    #[error("missing closing {delimiter}")]
    UnclosedDelimiter { delimiter: TokenKind, opened: Span },

    /// Numeric literal that is not made of digits, or overflows to infinity
    #[error("invalid number literal '{text}'")]
    InvalidNumber { text: String },

    /// Input ended in the middle of a construct
    #[error("unexpected end of input, expected {expected}")]
    UnexpectedEnd { expected: &'static str },

    /// Source contains nothing but blanks
    #[error("empty expression")]
    EmptySource,

    /// No expression could start at this token
    #[error("expected an expression, found {found}")]
    ExpectedExpression { found: TokenKind },

    /// Operator or opener not followed by an expression
    #[error("expected an expression after {after}, found {found}")]
    MissingOperand { after: TokenKind, found: TokenKind },

    /// Maximum nesting depth exceeded
    #[error("expression nesting depth exceeds maximum of {max_depth} levels")]
    MaxDepthExceeded { max_depth: usize },

    /// Tokens left over after the root expression
    #[error("unexpected {found} after the end of the expression")]
    TrailingInput { found: TokenKind },
}

impl ParseError {
    pub fn new(kind: ParseErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Convert to a Diagnostic for API boundary
    pub fn to_diagnostic(&self) -> Diagnostic {
        let (code, help) = match &self.kind {
            ParseErrorKind::Lexical(LexicalError::UnexpectedChar { .. }) => ("L001", None),
            ParseErrorKind::Lexical(LexicalError::UnterminatedString { .. }) => (
                "L002",
                Some("Add the matching closing quote; strings have no escapes"),
            ),
            ParseErrorKind::UnexpectedToken { .. } => ("P001", None),
            ParseErrorKind::UnclosedDelimiter { .. } => {
                ("P002", Some("Add the missing closing delimiter"))
            }
            ParseErrorKind::InvalidNumber { .. } => ("P003", Some("Check the number format")),
            ParseErrorKind::MaxDepthExceeded { .. } => (
                "P004",
                Some("Reduce nesting or simplify the expression"),
            ),
            ParseErrorKind::UnexpectedEnd { .. } => ("P005", None),
            ParseErrorKind::EmptySource => ("P006", None),
            ParseErrorKind::ExpectedExpression { .. } => ("P007", None),
            ParseErrorKind::MissingOperand { .. } => ("P009", None),
            ParseErrorKind::TrailingInput { .. } => (
                "P008",
                Some("Remove the trailing input or join it with an operator"),
            ),
        };

        let related = match &self.kind {
            ParseErrorKind::UnclosedDelimiter { opened, .. } => vec![RelatedInfo {
                span: opened.clone(),
                message: "opened here".to_string(),
            }],
            _ => Vec::new(),
        };

        Diagnostic {
            severity: Severity::Error,
            message: self.kind.to_string(),
            span: self.span.clone(),
            related,
            help: help.map(str::to_string),
            code: Some(code.to_string()),
        }
    }
}

impl From<LexicalError> for ParseError {
    fn from(err: LexicalError) -> Self {
        let span = err.span();
        ParseError::new(ParseErrorKind::Lexical(err), span)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lexical_errors_keep_their_position() {
        let err = ParseError::from(LexicalError::UnexpectedChar { ch: '@', offset: 3 });
        assert_eq!(err.span, Span::new(3, 4));
        assert_eq!(err.to_string(), "unexpected character '@' at offset 3");
        assert_eq!(err.to_diagnostic().code.as_deref(), Some("L001"));
    }

    #[test]
    fn unclosed_delimiter_points_at_opener() {
        let err = ParseError::new(
            ParseErrorKind::UnclosedDelimiter {
                delimiter: TokenKind::RParen,
                opened: Span::new(0, 1),
            },
            Span::new(4, 4),
        );
        let diagnostic = err.to_diagnostic();
        assert_eq!(diagnostic.message, "missing closing ')'");
        assert_eq!(diagnostic.related.len(), 1);
        assert_eq!(diagnostic.related[0].span, Span::new(0, 1));
        assert_eq!(diagnostic.code.as_deref(), Some("P002"));
    }
}
