//! `mdprep render` command implementation.

use std::path::PathBuf;

use clap::Args;
use mdprep_config::{CliSettings, Config};
use mdprep_core::unwrap_markdown_container_fence;
use mdprep_renderer::{PulldownRenderer, parse_markdown_with_options};

use super::{read_input, render_options, write_stdout};
use crate::error::CliError;

/// Arguments for the render command.
#[derive(Args)]
pub(crate) struct RenderArgs {
    /// Markdown file to render (`-` for stdin).
    input: PathBuf,

    /// Print HTML and extracted records as JSON.
    #[arg(long)]
    json: bool,

    /// Strip a `markdown` fence wrapping the whole document first.
    #[arg(long)]
    unwrap: bool,

    /// Enable smart quotes and dashes (overrides config).
    #[arg(long)]
    typography: bool,

    /// Do not turn bare URLs into links (overrides config).
    #[arg(long)]
    no_autolink: bool,

    /// Path to configuration file (default: auto-discover mdprep.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl RenderArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            typography: self.typography.then_some(true),
            autolink: self.no_autolink.then_some(false),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let mut markdown = read_input(&self.input)?;
        if self.unwrap {
            markdown = unwrap_markdown_container_fence(&markdown);
        }

        let result = parse_markdown_with_options(
            &markdown,
            &PulldownRenderer,
            &render_options(&config.render),
        );
        tracing::info!(
            diagrams = result.diagrams.len(),
            math = result.math.len(),
            "Rendered markdown"
        );

        if self.json {
            write_stdout(&serde_json::to_string_pretty(&result)?)
        } else {
            write_stdout(&result.html)
        }
    }
}
