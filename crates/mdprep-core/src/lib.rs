//! Leaf building blocks for markdown preprocessing.
//!
//! This crate holds the pieces every other mdprep crate shares:
//! - [`fence`]: fenced code block scanning (`FenceOpening`, `FenceBlock`, `FenceTracker`)
//! - [`text`]: whitespace and quote cleanup for pasted diagram sources
//! - [`language`]: the recognized diagram languages and their aliases
//! - [`placeholder`]: inert markdown image markers that survive HTML rendering
//!
//! Every function here is total: malformed input is passed through, never rejected.
//!
//! # Example
//!
//! ```
//! use mdprep_core::fence::scan_fenced_blocks;
//!
//! let blocks = scan_fenced_blocks("text\n```mermaid\ngraph TD\n```\n");
//! assert_eq!(blocks.len(), 1);
//! assert_eq!(blocks[0].opening.lang, "mermaid");
//! assert_eq!(blocks[0].content, "graph TD");
//! ```

pub mod fence;
pub mod language;
pub mod placeholder;
pub mod text;

pub use fence::{
    FenceBlock, FenceOpening, FenceTracker, is_fence_closing, normalize_newlines,
    parse_fence_opening, scan_fenced_blocks, unwrap_markdown_container_fence,
};
pub use language::DiagramLanguage;
pub use placeholder::{
    MathMode, PLACEHOLDER_GIF, PlaceholderKind, diagram_placeholder, is_diagram_placeholder,
    is_math_placeholder, math_placeholder, parse_math_mode, parse_placeholder_id,
};
pub use text::{normalize_smart_quotes, normalize_spaces, normalize_text};
