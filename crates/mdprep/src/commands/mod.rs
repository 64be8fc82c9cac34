//! CLI command implementations.

pub(crate) mod autofix;
pub(crate) mod extract;
pub(crate) mod render;
pub(crate) mod sanitize_label;

pub(crate) use autofix::AutofixArgs;
pub(crate) use extract::ExtractArgs;
pub(crate) use render::RenderArgs;
pub(crate) use sanitize_label::SanitizeLabelArgs;

use std::io::{self, Write};
use std::path::Path;

use mdprep_config::{RenderConfig, SanitizeConfig};
use mdprep_mermaid::{LabelOptions, SourceOptions};
use mdprep_renderer::RenderOptions;

use crate::error::CliError;

/// Read a markdown file, or stdin when `path` is `-`.
fn read_input(path: &Path) -> Result<String, CliError> {
    if path == Path::new("-") {
        return Ok(io::read_to_string(io::stdin())?);
    }
    read_file(path)
}

fn read_file(path: &Path) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::File {
        path: path.display().to_string(),
        source,
    })
}

/// Write command output to stdout.
fn write_stdout(text: &str) -> Result<(), CliError> {
    let mut stdout = io::stdout().lock();
    stdout.write_all(text.as_bytes())?;
    if !text.ends_with('\n') {
        stdout.write_all(b"\n")?;
    }
    stdout.flush()?;
    Ok(())
}

fn source_options(config: &SanitizeConfig) -> SourceOptions {
    SourceOptions {
        line_break: config.line_break.clone(),
        preserve_existing: config.preserve_existing,
        normalize_html_entities: config.normalize_html_entities,
        use_named_colon: config.use_named_colon,
        use_markdown_strings: config.use_markdown_strings,
        wrap_edge_labels: config.wrap_edge_labels,
        ..SourceOptions::default()
    }
}

fn label_options(config: &SanitizeConfig) -> LabelOptions {
    LabelOptions {
        line_break: config.line_break.clone(),
        preserve_existing: config.preserve_existing,
        normalize_html_entities: config.normalize_html_entities,
        use_named_colon: config.use_named_colon,
        ..LabelOptions::default()
    }
}

fn render_options(config: &RenderConfig) -> RenderOptions {
    RenderOptions {
        autolink: config.autolink,
        typography: config.typography,
        gfm: config.gfm,
        ..RenderOptions::default()
    }
}
