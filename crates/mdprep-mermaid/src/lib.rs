//! Mermaid label sanitizer.
//!
//! Mermaid's grammar is quote-sensitive: a stray `"`, `:` or `(` inside a node
//! or edge label ends the label early or breaks the parse. This crate rewrites
//! label bodies into forms Mermaid accepts, using its `#<code>;` character
//! reference syntax and markdown strings.
//!
//! - [`sanitize_label`]: encode one label body
//! - [`sanitize_source`]: find and encode every label in a diagram source
//!
//! # Example
//!
//! ```
//! use mdprep_mermaid::{SourceOptions, sanitize_source};
//!
//! let fixed = sanitize_source("graph TD\nA[Total: 5] --> B", &SourceOptions::default());
//! assert_eq!(fixed, "graph TD\nA[\"Total: 5\"] --> B");
//! ```

mod label;
mod source;

pub use label::{LabelOptions, sanitize_label};
pub use source::{DiagramType, SourceOptions, sanitize_source};
