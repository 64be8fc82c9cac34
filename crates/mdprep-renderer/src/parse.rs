use mdprep_core::normalize_newlines;

use crate::diagram::{DiagramRecord, extract_diagrams};
use crate::html::{HtmlRenderer, RenderOptions};
use crate::math::{MathRecord, extract_math};

/// Markdown with diagrams and math swapped for placeholders.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Preprocessed {
    pub markdown: String,
    pub diagrams: Vec<DiagramRecord>,
    pub math: Vec<MathRecord>,
}

/// Rendered HTML plus the records its placeholders refer to.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ParseResult {
    pub html: String,
    pub diagrams: Vec<DiagramRecord>,
    pub math: Vec<MathRecord>,
}

/// Run both extraction passes: diagrams first, then math.
///
/// Diagram fences are gone by the time math is scanned, so `$` inside a
/// diagram is never treated as math.
#[must_use]
pub fn preprocess(markdown: &str) -> Preprocessed {
    let normalized = normalize_newlines(markdown);
    let diagrams = extract_diagrams(&normalized);
    let math = extract_math(&diagrams.markdown);

    Preprocessed {
        markdown: math.markdown,
        diagrams: diagrams.diagrams,
        math: math.math,
    }
}

/// Extract diagrams and math, then render the rest with default options.
pub fn parse_markdown<R>(markdown: &str, renderer: &R) -> ParseResult
where
    R: HtmlRenderer + ?Sized,
{
    parse_markdown_with_options(markdown, renderer, &RenderOptions::default())
}

/// Like [`parse_markdown`], with explicit renderer options.
pub fn parse_markdown_with_options<R>(
    markdown: &str,
    renderer: &R,
    options: &RenderOptions,
) -> ParseResult
where
    R: HtmlRenderer + ?Sized,
{
    let preprocessed = preprocess(markdown);
    let html = renderer.render(&preprocessed.markdown, options);

    ParseResult {
        html,
        diagrams: preprocessed.diagrams,
        math: preprocessed.math,
    }
}
