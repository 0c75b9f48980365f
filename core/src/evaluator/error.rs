//! Evaluation errors.
//!
//! Every failure aborts the evaluation; there are no partial results. The
//! null-safe navigation forms (`?.`) are the only way an expression turns
//! an otherwise fatal missing value into `null`.

use thiserror::Error;

use crate::api::{Diagnostic, Severity};
use crate::functions::FunctionError;
use crate::parser::Span;
use crate::values::ValueKind;

/// Evaluation error with the span of the node that raised it.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind}")]
pub struct EvalError {
    pub kind: EvalErrorKind,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvalErrorKind {
    /// Non-null-safe navigation through null.
    #[error("cannot {operation} on null")]
    NullReceiver { operation: String },

    #[error("cannot read property '{name}' of {found}")]
    NotAnObject { name: String, found: ValueKind },

    #[error("expected an array or object to iterate, found {found}")]
    NotACollection { found: ValueKind },

    #[error("cannot index into {found}")]
    NotIndexable { found: ValueKind },

    #[error("cannot index {target} with {index}")]
    InvalidIndex { target: ValueKind, index: ValueKind },

    #[error("index {index} out of bounds (length: {len})")]
    IndexOutOfBounds { index: i64, len: usize },

    #[error("key '{key}' not found")]
    KeyNotFound { key: String },

    #[error("unknown variable '#{name}'")]
    UnknownVariable { name: String },

    #[error("unknown function '#{name}' taking {arity} argument(s)")]
    UnknownFunction { name: String, arity: usize },

    #[error("no method '{name}' taking {arity} argument(s) on {kind}")]
    UnsupportedMethod {
        kind: ValueKind,
        name: String,
        arity: usize,
    },

    #[error("'{name}' failed: {error}")]
    FunctionFailed {
        name: String,
        #[source]
        error: FunctionError,
    },

    #[error("unsupported operand types for '{op}': {left} and {right}")]
    TypeMismatch {
        op: String,
        left: ValueKind,
        right: ValueKind,
    },

    #[error("division by zero")]
    DivisionByZero,

    #[error("result of '{op}' is not a finite number")]
    NonFiniteNumber { op: String },

    #[error("flat projection expects each element to produce an array, found {found}")]
    FlatNotArray { found: ValueKind },

    #[error("map keys must be integers or strings, found {found}")]
    InvalidMapKey { found: ValueKind },

    #[error("{construct} is not supported")]
    Unsupported { construct: &'static str },

    #[error("evaluation depth exceeds maximum of {max_depth}")]
    DepthExceeded { max_depth: usize },
}

impl EvalError {
    pub fn new(kind: EvalErrorKind, span: Span) -> Self {
        Self { kind, span }
    }

    /// Convert to a Diagnostic for API boundary
    pub fn to_diagnostic(&self) -> Diagnostic {
        use EvalErrorKind::*;

        let (code, help) = match &self.kind {
            NullReceiver { .. } => ("E001", Some("Use '?.' to yield null instead of failing")),
            NotAnObject { .. } => ("E002", None),
            NotACollection { .. } => ("E003", None),
            NotIndexable { .. } => ("E004", None),
            InvalidIndex { .. } => (
                "E005",
                Some("Strings and arrays take integer indices, objects take string keys"),
            ),
            IndexOutOfBounds { .. } => ("E006", None),
            KeyNotFound { .. } => (
                "E007",
                Some("Property access yields null for missing keys; indexing does not"),
            ),
            UnknownVariable { .. } => ("E008", Some("Available variables are #this and #root")),
            UnknownFunction { .. } => ("E009", None),
            UnsupportedMethod { .. } => ("E010", None),
            FunctionFailed { .. } => ("E011", None),
            TypeMismatch { .. } => ("E012", None),
            DivisionByZero => ("E013", None),
            NonFiniteNumber { .. } => ("E014", None),
            FlatNotArray { .. } => ("E015", None),
            InvalidMapKey { .. } => ("E016", None),
            Unsupported { .. } => ("E017", None),
            DepthExceeded { .. } => ("E018", Some("Reduce nesting or simplify the expression")),
        };

        Diagnostic {
            severity: Severity::Error,
            message: self.kind.to_string(),
            span: self.span.clone(),
            related: Vec::new(),
            help: help.map(str::to_string),
            code: Some(code.to_string()),
        }
    }
}
