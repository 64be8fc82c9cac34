//! Diagram fence autofix.
//!
//! Cleans up diagram fences pasted from chat tools and word processors
//! without touching anything else in the document. Mermaid fences get their
//! labels sanitized; every other diagram language only gets whitespace and
//! quote normalization. The fence lines themselves keep their marker run and
//! indentation.
//!
//! ```
//! use mdprep_autofix::autofix_markdown_diagrams;
//!
//! let result = autofix_markdown_diagrams("```mermaid\nA\u{00A0}B\n```");
//! assert!(result.changed);
//! assert_eq!(result.fixed, "``` mermaid\nA B\n```");
//! ```

use std::sync::LazyLock;

use mdprep_core::{DiagramLanguage, FenceBlock, normalize_newlines, normalize_text, scan_fenced_blocks};
use mdprep_mermaid::{SourceOptions, sanitize_source};
use regex::Regex;

static ER_DIAGRAM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*erDiagram\b").unwrap());

/// Result of an autofix pass.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AutofixResult {
    /// The fixed document (the input itself when nothing changed).
    pub fixed: String,
    /// Whether any diagram content was modified.
    pub changed: bool,
}

/// Fix diagram fences using the default sanitizer options.
#[must_use]
pub fn autofix_markdown_diagrams(markdown: &str) -> AutofixResult {
    autofix_with_options(markdown, &SourceOptions::default())
}

/// Fix diagram fences, sanitizing Mermaid sources with `options`.
///
/// Edge label wrapping is turned off for ER diagrams regardless of `options`.
#[must_use]
pub fn autofix_with_options(markdown: &str, options: &SourceOptions) -> AutofixResult {
    let text = normalize_newlines(markdown);
    let mut fixed = String::with_capacity(text.len());
    let mut changed = false;
    let mut last = 0;

    for block in scan_fenced_blocks(&text) {
        let Some(language) = DiagramLanguage::parse(&block.opening.lang) else {
            continue;
        };

        let content = fix_content(&block.content, language, options);
        if content == block.content {
            continue;
        }

        tracing::debug!(language = %language, offset = block.start, "Fixed diagram fence");
        changed = true;
        fixed.push_str(&text[last..block.start]);
        push_fence(&mut fixed, &block, &content, text[..block.end].ends_with('\n'));
        last = block.end;
    }

    if !changed {
        return AutofixResult {
            fixed: markdown.to_owned(),
            changed: false,
        };
    }

    fixed.push_str(&text[last..]);
    AutofixResult { fixed, changed }
}

fn fix_content(content: &str, language: DiagramLanguage, options: &SourceOptions) -> String {
    let normalized = normalize_text(content);
    if !language.has_label_sanitizer() {
        return normalized;
    }

    let options = SourceOptions {
        wrap_edge_labels: options.wrap_edge_labels && !ER_DIAGRAM_RE.is_match(&normalized),
        ..options.clone()
    };
    sanitize_source(&normalized, &options)
}

/// Rebuild a fence around new content with the original markers.
fn push_fence(out: &mut String, block: &FenceBlock, content: &str, trailing_newline: bool) {
    let opening = &block.opening;
    let marker = opening.marker();

    out.push_str(&opening.indent);
    out.push_str(&marker);
    if !opening.info.is_empty() {
        out.push(' ');
        out.push_str(&opening.info);
    }
    out.push('\n');
    out.push_str(content);
    out.push('\n');
    out.push_str(&opening.indent);
    out.push_str(&marker);
    if trailing_newline {
        out.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_no_fences_unchanged() {
        let md = "# Hello\n\nSome text";
        let result = autofix_markdown_diagrams(md);
        assert!(!result.changed);
        assert_eq!(result.fixed, md);
    }

    #[test]
    fn test_non_diagram_fence_unchanged() {
        let md = "```javascript\nconst a\u{00A0}= \u{201C}x\u{201D};\n```";
        let result = autofix_markdown_diagrams(md);
        assert!(!result.changed);
        assert_eq!(result.fixed, md);
    }

    #[test]
    fn test_nbsp_in_mermaid() {
        let result = autofix_markdown_diagrams("```mermaid\nA\u{00A0}B\n```");
        assert!(result.changed);
        assert_eq!(result.fixed, "``` mermaid\nA B\n```");
    }

    #[test]
    fn test_smart_quotes_in_mermaid() {
        let result = autofix_markdown_diagrams("```mermaid\nA[\"\u{201C}Hello\u{201D}\"]\n```");
        assert!(result.changed);
        assert!(result.fixed.contains("\"Hello\""), "{}", result.fixed);
    }

    #[test]
    fn test_other_languages_normalized_only() {
        for (md, expected) in [
            ("```dot\ndigraph\u{00A0}G { a [label=\"x:y\"] }\n```", "digraph G { a [label=\"x:y\"] }"),
            ("```wavedrom\n{ \"signal\"\u{00A0}: [] }\n```", "{ \"signal\" : [] }"),
            ("```vl\n{ \"data\"\u{00A0}: {} }\n```", "{ \"data\" : {} }"),
        ] {
            let result = autofix_markdown_diagrams(md);
            assert!(result.changed, "{md}");
            assert!(result.fixed.contains(expected), "{}", result.fixed);
        }
    }

    #[test]
    fn test_tilde_fence_preserved() {
        let result = autofix_markdown_diagrams("~~~~mermaid\nA\u{00A0}B\n~~~~\n");
        assert_eq!(result.fixed, "~~~~ mermaid\nA B\n~~~~\n");
    }

    #[test]
    fn test_indentation_preserved() {
        let result = autofix_markdown_diagrams("  ```mermaid\n  A\u{00A0}B\n  ```");
        assert_eq!(result.fixed, "  ``` mermaid\n  A B\n  ```");
    }

    #[test]
    fn test_labels_sanitized() {
        let md = "Intro\n\n```mermaid\ngraph TD\n  A[Total: 5] --> B\n```\n\nOutro\n";
        let result = autofix_markdown_diagrams(md);
        assert!(result.changed);
        assert_eq!(
            result.fixed,
            "Intro\n\n``` mermaid\ngraph TD\n  A[\"Total: 5\"] --> B\n```\n\nOutro\n"
        );
    }

    #[test]
    fn test_markdown_strings_follow_options() {
        let md = "```mermaid\nmindmap\n  root((\"Big idea\"))\n```\n";

        let default = autofix_markdown_diagrams(md);
        assert_eq!(
            default.fixed,
            "``` mermaid\nmindmap\n  root((\"`Big idea`\"))\n```\n"
        );

        let options = SourceOptions {
            use_markdown_strings: false,
            ..SourceOptions::default()
        };
        let plain = autofix_with_options(md, &options);
        assert_eq!(
            plain.fixed,
            "``` mermaid\nmindmap\n  root((\"Big#32;idea\"))\n```\n"
        );
    }

    #[test]
    fn test_er_diagram_pipes_untouched() {
        let md = "```mermaid\nerDiagram\n  CUSTOMER ||--o{ ORDER : places\n```\n";
        let result = autofix_markdown_diagrams(md);
        assert!(!result.changed);
        assert_eq!(result.fixed, md);
    }

    #[test]
    fn test_only_changed_blocks_rebuilt() {
        let md = "```mermaid\ngraph TD\n  A[\"ok\"]\n```\n```dot\na\u{00A0}b\n```\n";
        let result = autofix_markdown_diagrams(md);
        assert!(result.changed);
        assert_eq!(
            result.fixed,
            "```mermaid\ngraph TD\n  A[\"ok\"]\n```\n``` dot\na b\n```\n"
        );
    }

    #[test]
    fn test_idempotent() {
        let md = "```mermaid\nsequenceDiagram\n  A->>B: Hello: world\n```\n";
        let once = autofix_markdown_diagrams(md);
        assert!(once.changed);

        let twice = autofix_markdown_diagrams(&once.fixed);
        assert!(!twice.changed);
        assert_eq!(twice.fixed, once.fixed);
    }

    #[test]
    fn test_crlf_input_unchanged_returned_verbatim() {
        let md = "```mermaid\r\ngraph TD\r\n  A[\"x\"]\r\n```\r\n";
        let result = autofix_markdown_diagrams(md);
        assert!(!result.changed);
        assert_eq!(result.fixed, md);
    }
}
