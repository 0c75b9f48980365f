use std::io::Read;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use jel::{Expression, Value, render_error};
use miette::{IntoDiagnostic, Result, WrapErr};
use tracing::debug;

/// Jel - query and transform JSON documents with expressions
#[derive(Parser, Debug)]
#[command(name = "jel")]
#[command(about = "Evaluate a Jel expression against a JSON document", long_about = None)]
struct Args {
    /// Expression to evaluate
    expression: String,

    /// Read the document from a JSON file
    #[arg(long, short, conflicts_with = "json")]
    data: Option<PathBuf>,

    /// Use this JSON text as the document
    #[arg(long, short)]
    json: Option<String>,

    /// Print the parsed AST (for debugging)
    #[arg(long)]
    debug_parse: bool,

    /// Pretty-print the result
    #[arg(long, short)]
    pretty: bool,
}

/// Load the document from `--data`, `--json`, or stdin.
fn read_document(args: &Args) -> Result<Value> {
    let text = match (&args.data, &args.json) {
        (Some(path), _) => std::fs::read_to_string(path)
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to read {}", path.display()))?,
        (None, Some(json)) => json.clone(),
        (None, None) => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .into_diagnostic()
                .wrap_err("failed to read document from stdin")?;
            buf
        }
    };
    serde_json::from_str(&text)
        .into_diagnostic()
        .wrap_err("document is not valid JSON")
}

fn run(args: &Args) -> Result<ExitCode> {
    let expr = match Expression::parse(&args.expression) {
        Ok(expr) => expr,
        Err(e) => {
            render_error(&e);
            return Ok(ExitCode::FAILURE);
        }
    };

    if args.debug_parse {
        println!("=== Parsed AST ===");
        println!("{:#?}", expr.root());
        println!();
    }

    let document = read_document(args)?;
    debug!(kind = %jel::ValueKind::of(&document), "document loaded");

    let value = match expr.evaluate(&document) {
        Ok(value) => value,
        Err(e) => {
            render_error(&e);
            return Ok(ExitCode::FAILURE);
        }
    };

    let output = if args.pretty {
        serde_json::to_string_pretty(&value)
    } else {
        serde_json::to_string(&value)
    };
    println!("{}", output.into_diagnostic()?);
    Ok(ExitCode::SUCCESS)
}

fn main() -> Result<ExitCode> {
    let args = Args::parse();

    // Initialize logging subscriber
    use tracing_subscriber::{EnvFilter, fmt};

    // Use JEL_LOG or RUST_LOG environment variable to control log level
    // Default to WARN if not set
    let filter = EnvFilter::try_from_env("JEL_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    run(&args)
}
