//! Placeholder markers for deferred diagram and math rendering.
//!
//! A placeholder is a markdown image whose alt text carries `<kind>:<id>` and
//! whose source is a 1×1 transparent GIF. Any markdown renderer turns it into
//! an `<img>` with the alt text intact, and an un-hydrated placeholder renders
//! as nothing visible.

/// 1×1 transparent GIF.
pub const PLACEHOLDER_GIF: &str =
    "data:image/gif;base64,R0lGODlhAQABAIAAAAAAAP///ywAAAAAAQABAAACAUwAOw==";

/// Display mode of a math expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum MathMode {
    /// `$…$` inside running text.
    Inline,
    /// `$$…$$` display math.
    Block,
}

impl MathMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Inline => "inline",
            Self::Block => "block",
        }
    }
}

/// Kind of content a placeholder stands in for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaceholderKind {
    Diagram,
    Math(MathMode),
}

impl PlaceholderKind {
    /// Alt text prefix, including the trailing colon.
    #[must_use]
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Diagram => "diagram:",
            Self::Math(MathMode::Inline) => "math-inline:",
            Self::Math(MathMode::Block) => "math-block:",
        }
    }

    /// Split placeholder alt text into its kind and id.
    ///
    /// Returns `None` unless the alt text starts with a recognized prefix and
    /// carries a non-empty, single-line id.
    #[must_use]
    pub fn parse_alt(alt: &str) -> Option<(Self, &str)> {
        const KINDS: [PlaceholderKind; 3] = [
            PlaceholderKind::Diagram,
            PlaceholderKind::Math(MathMode::Inline),
            PlaceholderKind::Math(MathMode::Block),
        ];

        KINDS.into_iter().find_map(|kind| {
            let id = alt.strip_prefix(kind.prefix())?;
            let valid = !id.is_empty()
                && !id.contains(['\n', '\r', '\u{2028}', '\u{2029}']);
            valid.then_some((kind, id))
        })
    }
}

/// Create a markdown image placeholder for a diagram.
#[must_use]
pub fn diagram_placeholder(id: &str) -> String {
    format!("![diagram:{id}]({PLACEHOLDER_GIF})")
}

/// Create a markdown image placeholder for math.
#[must_use]
pub fn math_placeholder(id: &str, mode: MathMode) -> String {
    format!("![math-{}:{id}]({PLACEHOLDER_GIF})", mode.as_str())
}

/// Check if alt text belongs to a diagram placeholder.
#[must_use]
pub fn is_diagram_placeholder(alt: &str) -> bool {
    alt.starts_with(PlaceholderKind::Diagram.prefix())
}

/// Check if alt text belongs to a math placeholder (either mode).
#[must_use]
pub fn is_math_placeholder(alt: &str) -> bool {
    parse_math_mode(alt).is_some()
}

/// Extract the id from placeholder alt text.
#[must_use]
pub fn parse_placeholder_id(alt: &str) -> Option<&str> {
    PlaceholderKind::parse_alt(alt).map(|(_, id)| id)
}

/// Extract the math mode from placeholder alt text.
#[must_use]
pub fn parse_math_mode(alt: &str) -> Option<MathMode> {
    if alt.starts_with(PlaceholderKind::Math(MathMode::Inline).prefix()) {
        Some(MathMode::Inline)
    } else if alt.starts_with(PlaceholderKind::Math(MathMode::Block).prefix()) {
        Some(MathMode::Block)
    } else {
        None
    }
}
