//! Per-label encoding.
//!
//! Mermaid writes character references as `#<decimal>;` or `#<name>;` (no
//! leading ampersand). A label is encoded in one of three modes:
//!
//! - default: letters and digits pass, everything else becomes `#<cp>;`
//! - relaxed: only control characters and `"` are encoded
//! - markdown string: only control characters and `` ` `` are encoded
//!
//! Relaxed and markdown modes first decode references that are already
//! present, so re-encoding a sanitized label does not grow it.

use std::sync::LazyLock;

use regex::{Captures, Regex};

static BR_TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)<br\s*/?>").unwrap());
static MARKER_DEC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#(\d{1,7});").unwrap());
static MARKER_NAMED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#([A-Za-z][A-Za-z0-9]{1,31});").unwrap());
static AMP_DEC_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"&#(\d+);").unwrap());
static AMP_HEX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"&#x([0-9a-fA-F]+);").unwrap());
static AMP_NAMED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"&([A-Za-z][A-Za-z0-9]+);").unwrap());
static EXISTING_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#(?:\d{1,7}|[A-Za-z][A-Za-z0-9]{1,31});").unwrap());
static LETTER_OR_NUMBER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\p{L}\p{N}]$").unwrap());

/// Options for [`sanitize_label`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LabelOptions {
    /// String used to join label lines (default: `<br/>`).
    pub line_break: String,
    /// Keep well-formed `#…;` references untouched (default: true).
    pub preserve_existing: bool,
    /// Rewrite `&…;` entities into `#…;` form in default mode (default: true).
    pub normalize_html_entities: bool,
    /// Encode `:` as `#colon;` instead of `#58;` in default mode (default: true).
    pub use_named_colon: bool,
    /// Encode for a Mermaid markdown string (default: false).
    pub use_markdown_strings: bool,
    /// Encode only what breaks a quoted label (default: false).
    pub relaxed: bool,
}

impl Default for LabelOptions {
    fn default() -> Self {
        Self {
            line_break: "<br/>".to_owned(),
            preserve_existing: true,
            normalize_html_entities: true,
            use_named_colon: true,
            use_markdown_strings: false,
            relaxed: false,
        }
    }
}

/// Encode a single label body so it survives Mermaid's parser.
///
/// Literal `\n` escapes and `<br>` tags become line breaks, which are joined
/// back with [`LabelOptions::line_break`] after encoding.
#[must_use]
pub fn sanitize_label(raw: &str, opts: &LabelOptions) -> String {
    let s = raw.replace("\\n", "\n");
    let s = BR_TAG_RE.replace_all(&s, "\n");
    let s = s.replace("\r\n", "\n").replace('\r', "\n");

    let s = if opts.use_markdown_strings || opts.relaxed {
        decode_references(&s)
    } else if opts.normalize_html_entities {
        let s = AMP_DEC_RE.replace_all(&s, "#$1;");
        AMP_NAMED_RE.replace_all(&s, "#$1;").into_owned()
    } else {
        s
    };

    s.split('\n')
        .map(|line| encode_line(line, opts))
        .collect::<Vec<_>>()
        .join(&opts.line_break)
}

/// Decode references that a previous sanitizing pass (or the author) wrote.
///
/// References that do not name a valid character are left as written.
fn decode_references(s: &str) -> String {
    // Ampersand forms first. Decoding `#…;` markers first would turn `&#66;`
    // into `&B` instead of `B`.
    let s = AMP_DEC_RE.replace_all(s, |caps: &Captures| {
        decode_decimal(&caps[1]).unwrap_or_else(|| caps[0].to_owned())
    });
    let s = AMP_HEX_RE.replace_all(&s, |caps: &Captures| {
        decode_hex(&caps[1]).unwrap_or_else(|| caps[0].to_owned())
    });
    let s = AMP_NAMED_RE.replace_all(&s, |caps: &Captures| {
        decode_named(&caps[1]).map_or_else(|| caps[0].to_owned(), str::to_owned)
    });
    let s = MARKER_DEC_RE.replace_all(&s, |caps: &Captures| {
        decode_decimal(&caps[1]).unwrap_or_else(|| caps[0].to_owned())
    });
    let s = MARKER_NAMED_RE.replace_all(&s, |caps: &Captures| {
        decode_named(&caps[1]).map_or_else(|| caps[0].to_owned(), str::to_owned)
    });
    s.into_owned()
}

fn decode_named(name: &str) -> Option<&'static str> {
    match name {
        "quot" => Some("\""),
        "amp" => Some("&"),
        "lt" => Some("<"),
        "gt" => Some(">"),
        "apos" => Some("'"),
        "nbsp" => Some(" "),
        "colon" => Some(":"),
        _ => None,
    }
}

fn decode_decimal(digits: &str) -> Option<String> {
    decode_code_point(digits.parse().ok()?)
}

fn decode_hex(digits: &str) -> Option<String> {
    decode_code_point(u32::from_str_radix(digits, 16).ok()?)
}

fn decode_code_point(cp: u32) -> Option<String> {
    if cp == 0 {
        return None;
    }
    char::from_u32(cp).map(String::from)
}

fn is_letter_or_number(ch: char) -> bool {
    let mut buf = [0; 4];
    LETTER_OR_NUMBER_RE.is_match(ch.encode_utf8(&mut buf))
}

fn push_reference(out: &mut String, ch: char) {
    out.push('#');
    out.push_str(&u32::from(ch).to_string());
    out.push(';');
}

/// Encode one line of a label, code point by code point.
fn encode_line(line: &str, opts: &LabelOptions) -> String {
    let mut out = String::with_capacity(line.len());
    let mut i = 0;

    while let Some(ch) = line[i..].chars().next() {
        if opts.preserve_existing
            && ch == '#'
            && let Some(m) = EXISTING_MARKER_RE.find(&line[i..])
        {
            out.push_str(m.as_str());
            i += m.end();
            continue;
        }
        i += ch.len_utf8();

        let is_control = u32::from(ch) < 32;
        if opts.use_markdown_strings {
            if ch == '`' || is_control {
                push_reference(&mut out, ch);
            } else {
                out.push(ch);
            }
        } else if opts.relaxed {
            if ch == '"' || is_control {
                push_reference(&mut out, ch);
            } else {
                out.push(ch);
            }
        } else if opts.use_named_colon && ch == ':' {
            out.push_str("#colon;");
        } else if is_letter_or_number(ch) {
            out.push(ch);
        } else {
            push_reference(&mut out, ch);
        }
    }

    out
}
