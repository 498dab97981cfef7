//! docfilter CLI - compile a filter expression and evaluate it against a document.

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use clap::Parser;
use docfilter::{Document, Filter};

/// Compile a filter expression and evaluate it against a JSON document
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Filter expression, e.g. "age gt 30 and contains(name, 'ef')"
    expression: String,

    /// Path to a JSON document to filter (uses a built-in sample if omitted)
    #[arg(short, long)]
    document: Option<std::path::PathBuf>,

    /// Enable debug logging
    #[arg(short = 'v', long)]
    debug: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.debug { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();

    let document = match &args.document {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read document: {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Failed to parse document: {}", path.display()))?
        }
        None => sample_document(),
    };

    let filter = Filter::new(&args.expression).context("Failed to compile filter")?;
    let result = filter
        .evaluate(&document)
        .context("Failed to evaluate filter")?;

    println!("Document:   {}", document);
    println!("Expression: {}", args.expression);
    println!("Result:     {}", result);

    Ok(())
}

/// The built-in sample document used when no JSON file is given.
fn sample_document() -> Document {
    Document::new()
        .with("string", "Jeff")
        .with("int", 23)
        .with("float", 3.14)
        .with("bool", true)
        .with("time", Utc.with_ymd_and_hms(1990, 1, 1, 0, 0, 0).unwrap())
        .with(
            "child",
            Document::new()
                .with("childString", "child")
                .with("childBool", false)
                .with("childInt", 42),
        )
}
