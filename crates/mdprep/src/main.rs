//! mdprep CLI - Markdown preprocessing for diagrams and math.
//!
//! Provides commands for:
//! - `render`: Render markdown to HTML with diagram and math placeholders
//! - `extract`: Print extracted diagram and math records as JSON
//! - `autofix`: Clean up diagram fences in markdown files
//! - `sanitize-label`: Encode a single Mermaid label

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::filter::LevelFilter;

use commands::{AutofixArgs, ExtractArgs, RenderArgs, SanitizeLabelArgs};
use output::Output;

/// mdprep - Markdown preprocessing for diagrams and math.
#[derive(Parser)]
#[command(name = "mdprep", version, about)]
struct Cli {
    /// Enable verbose output (log extraction and autofix details).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render markdown to HTML with placeholders.
    Render(RenderArgs),
    /// Print extracted diagrams and math as JSON.
    Extract(ExtractArgs),
    /// Fix diagram fences in markdown files.
    Autofix(AutofixArgs),
    /// Sanitize a single Mermaid label.
    SanitizeLabel(SanitizeLabelArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    let filter = log_filter(cli.verbose, &rust_log);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(),
        Commands::Extract(args) => args.execute(),
        Commands::Autofix(args) => args.execute(&output),
        Commands::SanitizeLabel(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}

/// `--verbose` enables DEBUG level, otherwise `rust_log` applies with WARN as the default.
fn log_filter(verbose: bool, rust_log: &str) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    EnvFilter::builder()
        .with_default_directive(LevelFilter::WARN.into())
        .parse_lossy(rust_log)
}
