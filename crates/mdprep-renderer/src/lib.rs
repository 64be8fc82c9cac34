//! Diagram and math extraction for markdown rendering.
//!
//! Diagram fences and `$…$` / `$$…$$` math are cut out of a document and
//! replaced with placeholder images before the markdown is rendered, so the
//! markdown renderer never sees (or mangles) them. The extracted records are
//! rendered separately and swapped in for the placeholders afterwards.
//!
//! # Architecture
//!
//! - [`diagram`]: replaces recognized diagram fences with placeholders
//! - [`math`]: replaces math spans, skipping fenced and inline code
//! - [`html`]: the [`HtmlRenderer`] seam and its `pulldown-cmark` implementation
//! - [`registry`]: per-language render capabilities for extracted records
//!
//! # Example
//!
//! ```
//! use mdprep_renderer::{PulldownRenderer, parse_markdown};
//!
//! let result = parse_markdown("Euler: $e^{i\\pi} = -1$\n\n```mermaid\ngraph TD\n```\n", &PulldownRenderer);
//! assert_eq!(result.math.len(), 1);
//! assert_eq!(result.diagrams.len(), 1);
//! assert!(result.html.contains(r#"alt="math-inline:0""#));
//! assert!(result.html.contains(r#"alt="diagram:0""#));
//! ```

pub mod diagram;
pub mod html;
pub mod math;
mod parse;
pub mod registry;

pub use diagram::{DiagramRecord, ExtractedDiagrams, extract_diagrams};
pub use html::{HtmlRenderer, PulldownRenderer, RenderOptions};
pub use math::{ExtractedMath, MathRecord, extract_math, should_render_inline_math};
pub use parse::{ParseResult, Preprocessed, parse_markdown, parse_markdown_with_options, preprocess};
pub use registry::{
    DiagramRenderer, MathRenderer, RenderError, RenderErrorKind, RenderedOutput, RenderedRecord,
    RendererRegistry,
};
