//! Whole-source label rewriting.
//!
//! The diagram type decides how labels are found:
//!
//! - sequence and state diagrams carry labels after a `:`; each one is
//!   re-emitted as `: "<label>"`
//! - every other type is scanned left to right for delimiter pairs
//!   (`["…"]`, `("…")`, `{{…}}`, …); flowcharts additionally get their bare
//!   `[…]`, `(…)`, `{…}` node labels quoted, and pipe edge labels after an
//!   arrow are encoded as well

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::label::{LabelOptions, sanitize_label};

static SPACE_ENTITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)&nbsp(?:;|\b)|&#160(?:;|\b)|&#xa0(?:;|\b)").unwrap());
static COLON_LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#":[ \t]*(?:`([^`]*?)`|"([^"]*?)"|'([^']*?)'|([^\n]*))"#).unwrap()
});

/// Delimiter pairs, in priority order. The first opener matching at the
/// current position wins.
const LABEL_PAIRS: [(&str, &str); 9] = [
    ("([\"", "\"])"),
    ("(['", "'])"),
    ("([", "])"),
    ("{\"", "\"}"),
    ("{'", "'}"),
    ("[\"", "\"]"),
    ("('", "')"),
    ("(\"", "\")"),
    ("{{", "}}"),
];

/// Mermaid diagram type, detected from the first token of the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagramType {
    /// `flowchart` or `graph`.
    Flowchart,
    /// `sequenceDiagram`.
    Sequence,
    /// `stateDiagram` or `stateDiagram-v2`.
    State,
    /// `erDiagram`, where pipes express cardinality rather than labels.
    EntityRelationship,
    /// Anything else (class, mindmap, gantt, …).
    Other,
}

impl DiagramType {
    /// Detect the type from the first token of the first non-blank line.
    #[must_use]
    pub fn detect(source: &str) -> Self {
        let token = source
            .lines()
            .find(|line| !line.trim().is_empty())
            .and_then(|line| line.split_whitespace().next())
            .unwrap_or_default()
            .to_lowercase();

        match token.as_str() {
            "flowchart" | "graph" => Self::Flowchart,
            "sequencediagram" => Self::Sequence,
            "statediagram" | "statediagram-v2" => Self::State,
            "erdiagram" => Self::EntityRelationship,
            _ => Self::Other,
        }
    }

    /// Whether labels follow a `:` instead of sitting inside delimiters.
    #[must_use]
    pub fn uses_colon_labels(self) -> bool {
        matches!(self, Self::Sequence | Self::State)
    }
}

/// Options for [`sanitize_source`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceOptions {
    /// Line break used inside markdown-string labels (default: `<br/>`).
    pub line_break: String,
    /// Keep well-formed `#…;` references untouched (default: true).
    pub preserve_existing: bool,
    /// Rewrite `&…;` entities into `#…;` form (default: true).
    pub normalize_html_entities: bool,
    /// Encode `:` as `#colon;` in default-mode labels (default: true).
    pub use_named_colon: bool,
    /// Emit labels as Mermaid markdown strings where the diagram supports it
    /// (default: true).
    pub use_markdown_strings: bool,
    /// Encode pipe-delimited edge labels (default: true).
    pub wrap_edge_labels: bool,
    /// Turn `&nbsp;`-style entities and U+00A0 into spaces first (default: true).
    pub normalize_space_entities: bool,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            line_break: "<br/>".to_owned(),
            preserve_existing: true,
            normalize_html_entities: true,
            use_named_colon: true,
            use_markdown_strings: true,
            wrap_edge_labels: true,
            normalize_space_entities: true,
        }
    }
}

impl SourceOptions {
    fn label_options(&self, use_markdown_strings: bool, relaxed: bool) -> LabelOptions {
        LabelOptions {
            line_break: if use_markdown_strings {
                self.line_break.clone()
            } else {
                "<br/>".to_owned()
            },
            preserve_existing: self.preserve_existing,
            normalize_html_entities: self.normalize_html_entities,
            use_named_colon: self.use_named_colon,
            use_markdown_strings,
            relaxed,
        }
    }
}

/// Rewrite every label in a Mermaid source.
///
/// Text outside labels is copied unchanged. An unterminated delimiter stops
/// the scan and the rest of the source is copied verbatim.
#[must_use]
pub fn sanitize_source(source: &str, opts: &SourceOptions) -> String {
    let src = if opts.normalize_space_entities {
        SPACE_ENTITY_RE
            .replace_all(source, " ")
            .replace('\u{00A0}', " ")
    } else {
        source.to_owned()
    };

    let diagram_type = DiagramType::detect(&src);
    tracing::debug!(?diagram_type, "Sanitizing mermaid labels");

    if diagram_type.uses_colon_labels() {
        return sanitize_colon_labels(&src, opts);
    }

    LabelScanner::new(&src, diagram_type, opts).run()
}

/// Rewrite `: label` tails as `: "label"`.
fn sanitize_colon_labels(src: &str, opts: &SourceOptions) -> String {
    let label_opts = opts.label_options(true, false);

    COLON_LABEL_RE
        .replace_all(src, |caps: &Captures| {
            let text = (1..=4)
                .find_map(|group| caps.get(group))
                .map_or("", |m| m.as_str());
            let (core, _) = unwrap_backticks(text.trim());
            let cleaned = sanitize_label(core, &label_opts).replace('"', "#quot;");
            format!(": \"{cleaned}\"")
        })
        .into_owned()
}

/// Split a label already written as a markdown string (one pair of
/// backticks, none inside) into its body.
fn unwrap_backticks(text: &str) -> (&str, bool) {
    if text.len() >= 2 && text.starts_with('`') && text.ends_with('`') {
        let inner = &text[1..text.len() - 1];
        if !inner.contains('`') {
            return (inner, true);
        }
    }
    (text, false)
}

/// Left-to-right label scanner for delimiter-based diagram types.
struct LabelScanner<'a> {
    src: &'a str,
    opts: &'a SourceOptions,
    /// Flowcharts render labels as plain quoted strings, not markdown strings.
    prefer_plain: bool,
    allow_unquoted_nodes: bool,
    allow_edge_labels: bool,
}

impl<'a> LabelScanner<'a> {
    fn new(src: &'a str, diagram_type: DiagramType, opts: &'a SourceOptions) -> Self {
        let flowchart = diagram_type == DiagramType::Flowchart;
        Self {
            src,
            opts,
            prefer_plain: flowchart,
            allow_unquoted_nodes: flowchart,
            allow_edge_labels: opts.wrap_edge_labels
                && diagram_type != DiagramType::EntityRelationship,
        }
    }

    fn run(&self) -> String {
        let src = self.src;
        let bytes = src.as_bytes();
        let mut out = String::with_capacity(src.len());
        let mut i = 0;

        while i < src.len() {
            if let Some((open, close)) = LABEL_PAIRS
                .iter()
                .find(|(open, _)| src[i..].starts_with(open))
            {
                let start = i + open.len();
                let Some(end) = find_from(src, start, close) else {
                    out.push_str(&src[i..]);
                    break;
                };
                out.push_str(open);
                out.push_str(&self.sanitize_inner(&src[start..end], self.prefer_plain));
                out.push_str(close);
                i = end + close.len();
                continue;
            }

            let b = bytes[i];
            if self.allow_unquoted_nodes
                && matches!(b, b'[' | b'(' | b'{')
                && self.follows_node_id(i)
            {
                // `((`, `[[`, `{{` are shape syntax, never a label start.
                if bytes.get(i + 1) == Some(&b) {
                    out.push(char::from(b));
                    i += 1;
                    continue;
                }
                let close = match b {
                    b'[' => "]",
                    b'(' => ")",
                    _ => "}",
                };
                let start = i + 1;
                let Some(end) = find_from(src, start, close) else {
                    out.push_str(&src[i..]);
                    break;
                };
                let inner = src[start..end].replace('"', "'");
                out.push(char::from(b));
                out.push('"');
                out.push_str(&self.sanitize_inner(&inner, self.prefer_plain));
                out.push('"');
                out.push_str(close);
                i = end + 1;
                continue;
            }

            if self.allow_edge_labels && b == b'|' && self.follows_edge(i) {
                let start = i + 1;
                let Some(end) = find_from(src, start, "|") else {
                    out.push_str(&src[i..]);
                    break;
                };
                out.push('|');
                out.push_str(&self.sanitize_inner(&src[start..end], false));
                out.push('|');
                i = end + 1;
                continue;
            }

            let Some(ch) = src[i..].chars().next() else {
                break;
            };
            out.push(ch);
            i += ch.len_utf8();
        }

        out
    }

    fn sanitize_inner(&self, inner: &str, relaxed: bool) -> String {
        let (core, wrapped) = unwrap_backticks(inner);
        let use_markdown = self.opts.use_markdown_strings
            && !self.prefer_plain
            && (wrapped || !core.contains('`'));

        let cleaned = sanitize_label(core, &self.opts.label_options(use_markdown, relaxed));
        if use_markdown || wrapped {
            format!("`{cleaned}`")
        } else {
            cleaned
        }
    }

    /// Last non-blank byte before `pos`, if any.
    fn previous_significant(&self, pos: usize) -> Option<u8> {
        self.src.as_bytes()[..pos]
            .iter()
            .rev()
            .copied()
            .find(|&b| b != b' ' && b != b'\t')
    }

    fn follows_edge(&self, pos: usize) -> bool {
        matches!(
            self.previous_significant(pos),
            Some(b'-' | b'=' | b'.' | b'>')
        )
    }

    fn follows_node_id(&self, pos: usize) -> bool {
        matches!(
            self.previous_significant(pos),
            Some(b) if b.is_ascii_alphanumeric() || matches!(b, b']' | b'_' | b'}' | b')')
        )
    }
}

fn find_from(src: &str, start: usize, needle: &str) -> Option<usize> {
    src[start..].find(needle).map(|offset| start + offset)
}
