//! Text cleanup for sources pasted from rich-text editors.
//!
//! Word processors and chat tools sprinkle non-breaking spaces, zero-width
//! characters and typographic quotes into copied text. Diagram grammars treat
//! those as significant, so they are folded back to their ASCII forms.

use std::sync::LazyLock;

use regex::Regex;

static SPACE_ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)&nbsp;|&#160;|&#xa0;").unwrap());

/// Replace non-breaking spaces (literal or entity-encoded) with plain spaces
/// and drop zero-width characters.
#[must_use]
pub fn normalize_spaces(s: &str) -> String {
    let replaced = SPACE_ENTITY_RE.replace_all(s, " ");
    replaced
        .chars()
        .filter_map(|c| match c {
            '\u{00A0}' => Some(' '),
            '\u{200B}' | '\u{200C}' | '\u{200D}' | '\u{FEFF}' => None,
            other => Some(other),
        })
        .collect()
}

/// Replace curly quotes with straight ones.
#[must_use]
pub fn normalize_smart_quotes(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\u{201C}' | '\u{201D}' => '"',
            '\u{2018}' | '\u{2019}' => '\'',
            other => other,
        })
        .collect()
}

/// Apply all text normalization fixes.
#[must_use]
pub fn normalize_text(s: &str) -> String {
    normalize_smart_quotes(&normalize_spaces(s))
}
