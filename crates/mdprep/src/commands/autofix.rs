//! `mdprep autofix` command implementation.

use std::path::PathBuf;

use clap::Args;
use mdprep_autofix::autofix_with_options;
use mdprep_config::{CliSettings, Config};

use super::{read_file, source_options};
use crate::error::CliError;
use crate::output::Output;

/// Arguments for the autofix command.
#[derive(Args)]
pub(crate) struct AutofixArgs {
    /// Markdown files to fix in place.
    #[arg(required = true)]
    files: Vec<PathBuf>,

    /// Report files that need fixing without writing them.
    #[arg(long)]
    check: bool,

    /// Write plain quoted labels instead of markdown strings (overrides config).
    #[arg(long)]
    plain_labels: bool,

    /// Do not encode pipe-delimited edge labels (overrides config).
    #[arg(long)]
    no_wrap_edge_labels: bool,

    /// Path to configuration file (default: auto-discover mdprep.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl AutofixArgs {
    pub(crate) fn execute(self, output: &Output) -> Result<(), CliError> {
        let cli_settings = CliSettings {
            use_markdown_strings: self.plain_labels.then_some(false),
            wrap_edge_labels: self.no_wrap_edge_labels.then_some(false),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let options = source_options(&config.sanitize);

        let mut changed = 0;
        for path in &self.files {
            let markdown = read_file(path)?;
            let result = autofix_with_options(&markdown, &options);
            if !result.changed {
                continue;
            }

            changed += 1;
            if self.check {
                output.file_needs_fix(path);
            } else {
                std::fs::write(path, &result.fixed).map_err(|source| CliError::File {
                    path: path.display().to_string(),
                    source,
                })?;
                output.file_fixed(path);
            }
        }

        let total = self.files.len();
        if self.check && changed > 0 {
            return Err(CliError::Check(format!(
                "{changed} of {total} file(s) need diagram fixes"
            )));
        }
        output.summary(&format!("{changed} of {total} file(s) changed"));
        Ok(())
    }
}
