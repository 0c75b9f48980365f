//! Beautiful error rendering using ariadne
//!
//! This module provides utilities for rendering Jel errors with
//! rich formatting, source code snippets, and helpful annotations.

use crate::{Diagnostic, Error, Severity};
use ariadne::{ColorGenerator, Label, Report, ReportKind, Source};
use std::io::Write;

/// Render an error with beautiful formatting to stderr
///
/// # Example
/// ```no_run
/// use jel::{Expression, render_error};
///
/// if let Err(e) = Expression::parse("items.![") {
///     render_error(&e);
/// }
/// ```
pub fn render_error(error: &Error) {
    render_error_to_writer(error, &mut std::io::stderr(), true).ok();
}

/// Render an error to a specific writer
///
/// This is useful when you want to control where the error is written,
/// such as to a file, a buffer, or a custom output stream.
pub fn render_error_to(error: &Error, writer: &mut dyn Write) -> std::io::Result<()> {
    render_error_to_writer(error, writer, true)
}

/// Render an error to a String (useful for tests, web UIs, etc.)
///
/// # Example
/// ```
/// use jel::{Expression, render_error_to_string};
/// use serde_json::json;
///
/// let expr = Expression::parse("total / count").unwrap();
/// if let Err(e) = expr.evaluate(&json!({ "total": 10, "count": 0 })) {
///     let formatted = render_error_to_string(&e);
///     assert!(formatted.contains("division by zero"));
/// }
/// ```
pub fn render_error_to_string(error: &Error) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, &mut buf, true).ok();
    String::from_utf8_lossy(&buf).to_string()
}

/// Render an error to a String without color codes (useful for tests)
///
/// This is the same as `render_error_to_string` but without ANSI color codes,
/// making the output easier to compare in tests.
pub fn render_error_to_string_no_color(error: &Error) -> String {
    let mut buf = Vec::new();
    render_error_to_writer(error, &mut buf, false).ok();
    String::from_utf8_lossy(&buf).to_string()
}

fn render_error_to_writer(
    error: &Error,
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    render_diagnostics(error.text(), &[error.to_diagnostic()], writer, use_color)
}

fn render_diagnostics(
    source: &str,
    diagnostics: &[Diagnostic],
    writer: &mut dyn Write,
    use_color: bool,
) -> std::io::Result<()> {
    for diag in diagnostics {
        let mut colors = ColorGenerator::new();
        colors.next(); // Skip the first color.

        let kind = match diag.severity {
            Severity::Error => ReportKind::Error,
            Severity::Warning => ReportKind::Warning,
            Severity::Info => ReportKind::Advice,
        };

        let mut report = Report::build(kind, ("<unknown>", diag.span.0.clone()))
            .with_message(&diag.message)
            .with_config(ariadne::Config::default().with_color(use_color));

        // Add error code if present
        if let Some(code) = &diag.code {
            report = report.with_code(code);
        }

        // Primary label with the main error span
        let color = colors.next();
        report = report.with_label(
            Label::new(("<unknown>", diag.span.0.clone()))
                .with_message(&diag.message)
                .with_color(color),
        );

        // Related info as secondary labels (shows context breadcrumbs!)
        for related in &diag.related {
            let color = colors.next();
            report = report.with_label(
                Label::new(("<unknown>", related.span.0.clone()))
                    .with_message(&related.message)
                    .with_color(color),
            );
        }

        if let Some(help) = &diag.help {
            report = report.with_help(help);
        }

        // Render to the writer (need to reborrow to avoid moving)
        report.finish().write(("<unknown>", Source::from(source)), &mut *writer)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Expression;
    use serde_json::json;

    #[test]
    fn test_render_parse_error() {
        let source = "a.![b";
        let err = Expression::parse(source).unwrap_err();
        let output = render_error_to_string_no_color(&err);

        assert!(output.contains("Error"));
        assert!(output.contains("P002"));
        assert!(output.contains("a.![b"));
        assert!(output.contains("opened here"));
    }

    #[test]
    fn test_render_evaluation_error() {
        let expr = Expression::parse("user.name").unwrap();
        let err = expr.evaluate(&json!({})).unwrap_err();
        let output = render_error_to_string_no_color(&err);

        assert!(output.contains("cannot read property 'name' on null"));
        assert!(output.contains("E001"));
        assert!(output.contains("?."));
    }

    #[test]
    fn test_render_to_string_captures_output() {
        let err = Expression::parse("1 $ 2").unwrap_err();
        let output = render_error_to_string_no_color(&err);

        assert!(!output.is_empty());
        // Should be multi-line (ariadne adds formatting)
        assert!(output.lines().count() > 1);
    }

    #[test]
    fn test_render_to_writer() {
        let err = Expression::parse("   ").unwrap_err();
        let mut buf = Vec::new();
        render_error_to(&err, &mut buf).unwrap();
        assert!(String::from_utf8_lossy(&buf).contains("empty expression"));
    }
}
