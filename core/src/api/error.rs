//! Public error types for the Jel API.
//!
//! Internal parse and evaluation errors are wrapped in [`Error`] at the API
//! boundary together with the expression text, so callers can render them
//! without keeping the source around.

use core::fmt;

use crate::evaluator::EvalError;
use crate::parser::{ParseError, Span};

/// Public error type for all Jel operations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// The expression text is not valid Jel.
    Parse { error: ParseError, text: String },

    /// The expression failed while evaluating against a document.
    Evaluation { error: EvalError, text: String },
}

impl Error {
    /// The expression text the error refers to.
    pub fn text(&self) -> &str {
        match self {
            Error::Parse { text, .. } | Error::Evaluation { text, .. } => text,
        }
    }

    /// Byte range of the offending part of [`Error::text`].
    pub fn span(&self) -> &Span {
        match self {
            Error::Parse { error, .. } => &error.span,
            Error::Evaluation { error, .. } => &error.span,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            Error::Parse { error, .. } => error.to_diagnostic(),
            Error::Evaluation { error, .. } => error.to_diagnostic(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Parse { error, .. } => write!(f, "Parse error: {}", error),
            Error::Evaluation { error, .. } => write!(f, "Evaluation error: {}", error),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Parse { error, .. } => Some(error),
            Error::Evaluation { error, .. } => Some(error),
        }
    }
}

/// A diagnostic message (error, warning, or info) with source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Severity level (error, warning, info).
    pub severity: Severity,

    /// Primary diagnostic message.
    pub message: String,

    /// Source location of the primary issue.
    pub span: Span,

    /// Related locations that provide additional context.
    pub related: Vec<RelatedInfo>,

    /// Optional help text suggesting how to fix the issue.
    pub help: Option<String>,

    /// Optional error code (e.g., "E001") for documentation lookup.
    pub code: Option<String>,
}

/// Severity level for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// Related information for a diagnostic (e.g., "opened here").
#[derive(Debug, Clone, PartialEq)]
pub struct RelatedInfo {
    /// Source location of the related information.
    pub span: Span,

    /// Message explaining the relevance.
    pub message: String,
}
