//! Diagram fence extraction.

use mdprep_core::{DiagramLanguage, diagram_placeholder, normalize_newlines, scan_fenced_blocks};

/// A diagram cut out of a document.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct DiagramRecord {
    /// Placeholder id, dense per document (`"0"`, `"1"`, …).
    pub id: String,
    /// Fence language token as written (lowercased, aliases unresolved).
    pub lang: String,
    /// Canonical language.
    pub language: DiagramLanguage,
    /// Source between the fence delimiters.
    pub content: String,
    /// Second info-string token, if any.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub hint: Option<String>,
}

/// Output of [`extract_diagrams`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtractedDiagrams {
    /// Document with every diagram fence replaced by a placeholder line.
    pub markdown: String,
    pub diagrams: Vec<DiagramRecord>,
}

/// Replace recognized diagram fences with placeholder images.
///
/// Each diagram fence (opening line through closing line) becomes a single
/// line holding the fence indentation and a placeholder. Fences whose
/// language is not a diagram language are left untouched, as are unclosed
/// fences.
#[must_use]
pub fn extract_diagrams(text: &str) -> ExtractedDiagrams {
    let text = normalize_newlines(text);
    let mut markdown = String::with_capacity(text.len());
    let mut diagrams = Vec::new();
    let mut last = 0;

    for block in scan_fenced_blocks(&text) {
        let Some(language) = DiagramLanguage::parse(&block.opening.lang) else {
            continue;
        };

        let id = diagrams.len().to_string();
        markdown.push_str(&text[last..block.start]);
        markdown.push_str(&block.opening.indent);
        markdown.push_str(&diagram_placeholder(&id));
        markdown.push('\n');
        last = block.end;

        diagrams.push(DiagramRecord {
            id,
            lang: block.opening.lang,
            language,
            content: block.content,
            hint: block.opening.hint,
        });
    }
    markdown.push_str(&text[last..]);

    tracing::debug!(count = diagrams.len(), "Extracted diagrams");
    ExtractedDiagrams { markdown, diagrams }
}
