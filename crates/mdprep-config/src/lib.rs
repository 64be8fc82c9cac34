//! Configuration management for mdprep.
//!
//! Parses `mdprep.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ```toml
//! [sanitize]
//! line_break = "<br/>"
//! use_named_colon = true
//! wrap_edge_labels = true
//!
//! [render]
//! autolink = true
//! typography = false
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the label line break.
    pub line_break: Option<String>,
    /// Override markdown-string output for Mermaid labels.
    pub use_markdown_strings: Option<bool>,
    /// Override edge label wrapping.
    pub wrap_edge_labels: Option<bool>,
    /// Override bare URL linking.
    pub autolink: Option<bool>,
    /// Override smart punctuation.
    pub typography: Option<bool>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "mdprep.toml";

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Mermaid label sanitizer configuration.
    pub sanitize: SanitizeConfig,
    /// Markdown rendering configuration.
    pub render: RenderConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Mermaid label sanitizer configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SanitizeConfig {
    /// String joining the lines of a multi-line label.
    pub line_break: String,
    /// Keep well-formed `#…;` references untouched.
    pub preserve_existing: bool,
    /// Rewrite `&…;` entities into Mermaid's `#…;` form.
    pub normalize_html_entities: bool,
    /// Encode `:` as `#colon;` rather than `#58;`.
    pub use_named_colon: bool,
    /// Emit markdown-string labels where the diagram type allows.
    pub use_markdown_strings: bool,
    /// Encode pipe-delimited edge labels.
    pub wrap_edge_labels: bool,
}

impl Default for SanitizeConfig {
    fn default() -> Self {
        Self {
            line_break: "<br/>".to_owned(),
            preserve_existing: true,
            normalize_html_entities: true,
            use_named_colon: true,
            use_markdown_strings: true,
            wrap_edge_labels: true,
        }
    }
}

/// Markdown rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Turn bare URLs into links.
    pub autolink: bool,
    /// Smart quotes and dashes.
    pub typography: bool,
    /// Tables, strikethrough and task lists.
    pub gfm: bool,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            autolink: true,
            typography: false,
            gfm: true,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `mdprep.toml` in current directory and parents,
    /// falling back to defaults when none is found.
    ///
    /// CLI settings are applied after loading, so CLI arguments take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the resulting configuration is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_from(&cwd))
        {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(line_break) = &settings.line_break {
            self.sanitize.line_break.clone_from(line_break);
        }
        if let Some(use_markdown_strings) = settings.use_markdown_strings {
            self.sanitize.use_markdown_strings = use_markdown_strings;
        }
        if let Some(wrap_edge_labels) = settings.wrap_edge_labels {
            self.sanitize.wrap_edge_labels = wrap_edge_labels;
        }
        if let Some(autolink) = settings.autolink {
            self.render.autolink = autolink;
        }
        if let Some(typography) = settings.typography {
            self.render.typography = typography;
        }
    }

    /// Search for config file in `start` and its parents.
    fn discover_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.config_path = Some(path.to_path_buf());

        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file and after applying CLI
    /// settings.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.sanitize.line_break, "sanitize.line_break")?;
        Ok(())
    }
}
