//! Diagram languages recognized in fence info strings.

/// Supported diagram languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum DiagramLanguage {
    #[cfg_attr(feature = "serde", serde(rename = "mermaid"))]
    Mermaid,
    #[cfg_attr(feature = "serde", serde(rename = "dot"))]
    Dot,
    #[cfg_attr(feature = "serde", serde(rename = "wavedrom"))]
    WaveDrom,
    #[cfg_attr(feature = "serde", serde(rename = "vega-lite"))]
    VegaLite,
}

impl DiagramLanguage {
    /// All languages, in canonical order.
    pub const ALL: [Self; 4] = [Self::Mermaid, Self::Dot, Self::WaveDrom, Self::VegaLite];

    /// Parse a (lowercased) fence language token, resolving aliases.
    ///
    /// Returns None if the token is not a recognized diagram language.
    #[must_use]
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "mermaid" => Some(Self::Mermaid),
            "dot" | "graphviz" | "gv" => Some(Self::Dot),
            "wavedrom" | "wave" | "wavejson" => Some(Self::WaveDrom),
            "vega-lite" | "vl" => Some(Self::VegaLite),
            _ => None,
        }
    }

    /// Canonical name after alias resolution.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Mermaid => "mermaid",
            Self::Dot => "dot",
            Self::WaveDrom => "wavedrom",
            Self::VegaLite => "vega-lite",
        }
    }

    /// Alternative fence tokens that resolve to this language.
    #[must_use]
    pub fn aliases(self) -> &'static [&'static str] {
        match self {
            Self::Mermaid => &[],
            Self::Dot => &["graphviz", "gv"],
            Self::WaveDrom => &["wave", "wavejson"],
            Self::VegaLite => &["vl"],
        }
    }

    /// Whether labels in this language go through the Mermaid label sanitizer.
    #[must_use]
    pub fn has_label_sanitizer(self) -> bool {
        matches!(self, Self::Mermaid)
    }
}

impl std::fmt::Display for DiagramLanguage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
