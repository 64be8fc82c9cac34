//! Math span extraction.
//!
//! `$$…$$` is display math and `$…$` is inline math. Dollar signs inside
//! fenced code blocks and inline code spans are never math, and inline spans
//! that read like money (`$5$`, `$1,200 to 1,500 USD$`) stay literal text.

use std::sync::LazyLock;

use mdprep_core::{FenceTracker, MathMode, math_placeholder};
use regex::Regex;

/// A plain or ranged money amount with optional magnitude and currency code.
static CURRENCY_RE: LazyLock<Regex> = LazyLock::new(|| {
    const AMOUNT: &str = r"[0-9][0-9,]*(?:\.[0-9]+)?(?:\s*(?:k|m|b|bn|mm|t))?(?:\s*(?:usd|eur|gbp|cad|aud|jpy|inr))?";
    Regex::new(&format!(r"(?i)^{AMOUNT}(?:\s*(?:to|–|-)\s*{AMOUNT})?$")).unwrap()
});
static TEX_SYNTAX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\\^_{}=]").unwrap());

/// A math expression cut out of a document.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MathRecord {
    /// Placeholder id, dense per document (`"0"`, `"1"`, …).
    pub id: String,
    pub mode: MathMode,
    /// TeX source. Display math is trimmed; inline math is kept as written.
    pub tex: String,
}

/// Output of [`extract_math`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ExtractedMath {
    /// Document with every math span replaced by a placeholder.
    pub markdown: String,
    pub math: Vec<MathRecord>,
}

/// Decide whether the body of a `$…$` span is math.
///
/// Empty bodies and money amounts are not math. Otherwise a body is math if
/// it contains TeX syntax (`\ ^ _ { } =`) or at least one ASCII letter.
#[must_use]
pub fn should_render_inline_math(expr: &str) -> bool {
    let trimmed = expr.trim();
    if trimmed.is_empty() || CURRENCY_RE.is_match(trimmed) {
        return false;
    }
    TEX_SYNTAX_RE.is_match(trimmed) || trimmed.bytes().any(|b| b.is_ascii_alphabetic())
}

/// Find `needle` at or after `from`, skipping any character escaped by `\`.
fn find_closing(text: &str, from: usize, needle: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let needle = needle.as_bytes();
    let mut pos = from;

    while pos < bytes.len() {
        if bytes[pos] == b'\\' {
            pos += 2;
            continue;
        }
        if bytes[pos..].starts_with(needle) {
            return Some(pos);
        }
        pos += 1;
    }
    None
}

/// Replace math spans with placeholder images.
///
/// Scanning is character by character. At each line start outside inline
/// code, fence delimiters are tracked and fenced lines are copied verbatim.
/// A run of backticks opens inline code, which closes at the next run at
/// least as long. An unmatched `$` or `$$` is copied as a single `$`.
#[must_use]
pub fn extract_math(text: &str) -> ExtractedMath {
    let bytes = text.as_bytes();
    let mut markdown = String::with_capacity(text.len());
    let mut math = Vec::new();
    let mut fences = FenceTracker::new();
    let mut inline_code: Option<usize> = None;
    let mut i = 0;

    while i < bytes.len() {
        let at_line_start = i == 0 || bytes[i - 1] == b'\n';
        if at_line_start && inline_code.is_none() {
            let line_end = text[i..].find('\n').map_or(text.len(), |n| i + n);
            let was_fenced = fences.in_fence();
            if fences.update(&text[i..line_end]) || was_fenced {
                let next = (line_end + 1).min(text.len());
                markdown.push_str(&text[i..next]);
                i = next;
                continue;
            }
        }

        if bytes[i] == b'`' {
            let run = bytes[i..].iter().take_while(|&&b| b == b'`').count();
            inline_code = match inline_code {
                None => Some(run),
                Some(open) if run >= open => None,
                still_open => still_open,
            };
            markdown.push_str(&text[i..i + run]);
            i += run;
            continue;
        }

        if inline_code.is_some() || bytes[i] != b'$' {
            let ch_len = text[i..].chars().next().map_or(1, char::len_utf8);
            markdown.push_str(&text[i..i + ch_len]);
            i += ch_len;
            continue;
        }

        if bytes.get(i + 1) == Some(&b'$') {
            let Some(end) = find_closing(text, i + 2, "$$") else {
                markdown.push('$');
                i += 1;
                continue;
            };
            let tex = text[i + 2..end].trim();
            if tex.is_empty() {
                markdown.push_str(&text[i..end + 2]);
            } else {
                push_math(&mut markdown, &mut math, MathMode::Block, tex);
            }
            i = end + 2;
            continue;
        }

        let Some(end) = find_closing(text, i + 1, "$") else {
            markdown.push('$');
            i += 1;
            continue;
        };
        let expr = &text[i + 1..end];
        if should_render_inline_math(expr) {
            push_math(&mut markdown, &mut math, MathMode::Inline, expr);
        } else {
            markdown.push_str(&text[i..=end]);
        }
        i = end + 1;
    }

    tracing::debug!(count = math.len(), "Extracted math");
    ExtractedMath { markdown, math }
}

fn push_math(markdown: &mut String, math: &mut Vec<MathRecord>, mode: MathMode, tex: &str) {
    let id = math.len().to_string();
    markdown.push_str(&math_placeholder(&id, mode));
    math.push(MathRecord {
        id,
        mode,
        tex: tex.to_owned(),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdprep_core::PLACEHOLDER_GIF;
    use pretty_assertions::assert_eq;

    fn inline(id: &str) -> String {
        format!("![math-inline:{id}]({PLACEHOLDER_GIF})")
    }

    fn block(id: &str) -> String {
        format!("![math-block:{id}]({PLACEHOLDER_GIF})")
    }

    fn record(id: &str, mode: MathMode, tex: &str) -> MathRecord {
        MathRecord {
            id: id.to_owned(),
            mode,
            tex: tex.to_owned(),
        }
    }

    #[test]
    fn test_currency_is_not_math() {
        for expr in [
            "100", "1,000", "99.99", "5k", "2.5 M", "1bn", "3mm", "100 USD", "10 eur",
            "10-20", "1,000 to 2,000", "5k – 10k", " 42 ",
        ] {
            assert!(!should_render_inline_math(expr), "treated as math: {expr:?}");
        }
    }

    #[test]
    fn test_tex_and_letters_are_math() {
        for expr in ["x", "x^2", "a_i", "\\pi", "{1}", "1 = 1", "E = mc^2", "2x"] {
            assert!(should_render_inline_math(expr), "not treated as math: {expr:?}");
        }
    }

    #[test]
    fn test_symbols_only_not_math() {
        assert!(!should_render_inline_math(""));
        assert!(!should_render_inline_math("   "));
        assert!(!should_render_inline_math("1 + 2"));
        assert!(!should_render_inline_math("日本"));
    }

    #[test]
    fn test_inline_and_block() {
        let out = extract_math("Inline $x^2$ and\n\n$$\n\\int_0^1 f\n$$\n");
        assert_eq!(
            out.markdown,
            format!("Inline {} and\n\n{}\n", inline("0"), block("1"))
        );
        assert_eq!(
            out.math,
            vec![
                record("0", MathMode::Inline, "x^2"),
                record("1", MathMode::Block, "\\int_0^1 f"),
            ]
        );
    }

    #[test]
    fn test_price_between_dollars_left_alone() {
        let text = "It costs $100$ today.";
        let out = extract_math(text);
        assert_eq!(out.markdown, text);
        assert!(out.math.is_empty());
    }

    #[test]
    fn test_inline_tex_kept_untrimmed() {
        let out = extract_math("$ a + b $");
        assert_eq!(out.math, vec![record("0", MathMode::Inline, " a + b ")]);
    }

    #[test]
    fn test_fenced_code_ignored() {
        let text = "```\n$x$\n```\n~~~~\n$$y$$\n~~~~\n";
        let out = extract_math(text);
        assert_eq!(out.markdown, text);
        assert!(out.math.is_empty());
    }

    #[test]
    fn test_inline_code_ignored() {
        let text = "Use `$x$` or ``a ` $y$`` here";
        let out = extract_math(text);
        assert_eq!(out.markdown, text);
        assert!(out.math.is_empty());
    }

    #[test]
    fn test_math_after_inline_code() {
        let out = extract_math("`code` then $z$");
        assert_eq!(out.markdown, format!("`code` then {}", inline("0")));
    }

    #[test]
    fn test_escaped_dollar_does_not_close() {
        let out = extract_math("$a \\$ b$");
        assert_eq!(out.math, vec![record("0", MathMode::Inline, "a \\$ b")]);
    }

    #[test]
    fn test_unmatched_dollar_is_literal() {
        let text = "Pay $5 now";
        let out = extract_math(text);
        assert_eq!(out.markdown, text);
        assert!(out.math.is_empty());

        let text = "Open $$ block";
        assert_eq!(extract_math(text).markdown, text);
    }

    #[test]
    fn test_unmatched_double_dollar_rescans_second() {
        let out = extract_math("a $$ b $c$");
        assert_eq!(out.markdown, format!("a ${}c$", inline("0")));
        assert_eq!(out.math, vec![record("0", MathMode::Inline, " b ")]);
    }

    #[test]
    fn test_empty_block_is_literal() {
        let text = "$$  $$";
        let out = extract_math(text);
        assert_eq!(out.markdown, text);
        assert!(out.math.is_empty());
    }

    #[test]
    fn test_ids_are_dense_in_document_order() {
        let out = extract_math("$a$ $$b$$ $5$ $c$");
        let ids: Vec<_> = out.math.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, ["0", "1", "2"]);
        assert_eq!(out.math[2].tex, "c");
    }

    #[test]
    fn test_multibyte_text_preserved() {
        let text = "Größe – $α$ ok";
        let out = extract_math(text);
        assert_eq!(out.markdown, text);
    }
}
