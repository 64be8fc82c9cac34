//! `mdprep extract` command implementation.

use std::path::PathBuf;

use clap::Args;
use mdprep_renderer::preprocess;

use super::{read_input, write_stdout};
use crate::error::CliError;

/// Arguments for the extract command.
#[derive(Args)]
pub(crate) struct ExtractArgs {
    /// Markdown file to scan (`-` for stdin).
    input: PathBuf,

    /// Include the placeholder markdown in the output.
    #[arg(long)]
    with_markdown: bool,
}

impl ExtractArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let markdown = read_input(&self.input)?;
        let extracted = preprocess(&markdown);
        tracing::info!(
            diagrams = extracted.diagrams.len(),
            math = extracted.math.len(),
            "Extracted records"
        );

        let mut json = serde_json::json!({
            "diagrams": extracted.diagrams,
            "math": extracted.math,
        });
        if self.with_markdown {
            json["markdown"] = extracted.markdown.into();
        }
        write_stdout(&serde_json::to_string_pretty(&json)?)
    }
}
