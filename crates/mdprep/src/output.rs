//! Colored terminal output utilities.

use std::path::Path;

use console::{Style, Term};

/// Terminal output formatter, writing to stderr so stdout stays clean for
/// rendered HTML and JSON.
pub(crate) struct Output {
    term: Term,
    green: Style,
    yellow: Style,
    red: Style,
    dim: Style,
}

impl Output {
    /// Create a new output formatter.
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            term: Term::stderr(),
            green: Style::new().green(),
            yellow: Style::new().yellow(),
            red: Style::new().red(),
            dim: Style::new().dim(),
        }
    }

    /// Report a file rewritten by autofix (green).
    pub(crate) fn file_fixed(&self, path: &Path) {
        let msg = format!("Fixed {}", path.display());
        let _ = self.term.write_line(&self.green.apply_to(msg).to_string());
    }

    /// Report a file that autofix would change (yellow).
    pub(crate) fn file_needs_fix(&self, path: &Path) {
        let msg = format!("Would fix {}", path.display());
        let _ = self.term.write_line(&self.yellow.apply_to(msg).to_string());
    }

    /// Print a dimmed summary line.
    pub(crate) fn summary(&self, msg: &str) {
        let _ = self.term.write_line(&self.dim.apply_to(msg).to_string());
    }

    /// Print an error message (red).
    pub(crate) fn error(&self, msg: &str) {
        let _ = self.term.write_line(&self.red.apply_to(msg).to_string());
    }
}
