//! `mdprep sanitize-label` command implementation.

use std::path::PathBuf;

use clap::Args;
use mdprep_config::{CliSettings, Config};
use mdprep_mermaid::{LabelOptions, sanitize_label};

use super::{label_options, write_stdout};
use crate::error::CliError;

/// Arguments for the sanitize-label command.
#[derive(Args)]
pub(crate) struct SanitizeLabelArgs {
    /// Label text.
    label: String,

    /// Encode as a Mermaid markdown string.
    #[arg(long, conflicts_with = "relaxed")]
    markdown: bool,

    /// Encode only what breaks a quoted label.
    #[arg(long)]
    relaxed: bool,

    /// Line break between label lines (overrides config).
    #[arg(long)]
    line_break: Option<String>,

    /// Path to configuration file (default: auto-discover mdprep.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl SanitizeLabelArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            line_break: self.line_break.clone(),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;

        let options = LabelOptions {
            use_markdown_strings: self.markdown,
            relaxed: self.relaxed,
            ..label_options(&config.sanitize)
        };
        write_stdout(&sanitize_label(&self.label, &options))
    }
}
