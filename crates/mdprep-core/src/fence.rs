//! Fenced code block scanning.
//!
//! A fence opens on a line whose first non-blank characters are three or more
//! identical backticks or tildes, and closes on a line consisting solely of the
//! same character repeated at least as many times. Fences never nest: while a
//! fence is open, opening syntax (including the other marker character) is
//! plain content.
//!
//! Offsets in [`FenceBlock`] are byte offsets into the scanned text, which is
//! expected to be newline-normalized (see [`normalize_newlines`]).

/// Parsed opening line of a fenced code block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FenceOpening {
    /// Leading spaces and tabs before the marker run.
    pub indent: String,
    /// Marker character (backtick or tilde).
    pub marker_char: char,
    /// Length of the marker run.
    pub marker_len: usize,
    /// Trimmed info string following the marker run.
    pub info: String,
    /// First info token, lowercased (empty when there is no info string).
    pub lang: String,
    /// Second info token, if any.
    pub hint: Option<String>,
}

impl FenceOpening {
    /// The marker run as written (e.g. `` ``` `` or `~~~~`).
    #[must_use]
    pub fn marker(&self) -> String {
        std::iter::repeat_n(self.marker_char, self.marker_len).collect()
    }
}

/// A closed fenced code block located in a document.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FenceBlock {
    /// The opening line this block was started by.
    pub opening: FenceOpening,
    /// Offset of the opening line.
    pub start: usize,
    /// Offset just past the closing line (including its newline, if any).
    pub end: usize,
    /// Offset of the opening line (same as `start`).
    pub open_line_start: usize,
    /// Offset of the closing line.
    pub close_line_start: usize,
    /// Text between the delimiter lines, without the final newline.
    pub content: String,
}

/// Convert `\r\n` and lone `\r` line endings to `\n`.
#[must_use]
pub fn normalize_newlines(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_owned();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}

/// Parse a single line as a fence opening.
///
/// Returns `None` unless the line, after its leading spaces and tabs, starts
/// with at least three backticks or three tildes.
#[must_use]
pub fn parse_fence_opening(line: &str) -> Option<FenceOpening> {
    let rest = line.trim_start_matches([' ', '\t']);
    let indent = &line[..line.len() - rest.len()];

    let marker_char = match rest.chars().next()? {
        c @ ('`' | '~') => c,
        _ => return None,
    };
    // Marker characters are ASCII, so the char count is also the byte length.
    let marker_len = rest.chars().take_while(|&c| c == marker_char).count();
    if marker_len < 3 {
        return None;
    }

    let info = rest[marker_len..].trim();
    let mut tokens = info.split_whitespace();
    let lang = tokens.next().map(str::to_lowercase).unwrap_or_default();
    let hint = tokens.next().map(str::to_owned);

    Some(FenceOpening {
        indent: indent.to_owned(),
        marker_char,
        marker_len,
        info: info.to_owned(),
        lang,
        hint,
    })
}

/// Check whether `line` closes a fence opened with `marker_len` × `marker_char`.
///
/// The trimmed line must consist solely of the marker character and be at
/// least as long as the opening run.
#[must_use]
pub fn is_fence_closing(line: &str, marker_char: char, marker_len: usize) -> bool {
    let trimmed = line.trim();
    if trimmed.len() < marker_len {
        return false;
    }
    trimmed.chars().all(|c| c == marker_char)
}

/// Find all closed fenced code blocks, in document order.
///
/// An opening without a matching closer before the end of the text produces
/// no block.
#[must_use]
pub fn scan_fenced_blocks(text: &str) -> Vec<FenceBlock> {
    let mut blocks = Vec::new();
    let mut open: Option<(FenceOpening, usize, usize)> = None;
    let mut line_start = 0;

    loop {
        let newline = text[line_start..].find('\n').map(|off| line_start + off);
        let line = &text[line_start..newline.unwrap_or(text.len())];
        let line_end = newline.map_or(text.len(), |n| n + 1);

        match open.take() {
            None => {
                if let Some(opening) = parse_fence_opening(line) {
                    open = Some((opening, line_start, line_end));
                }
            }
            Some((opening, open_line_start, content_start)) => {
                if is_fence_closing(line, opening.marker_char, opening.marker_len) {
                    let raw = &text[content_start..line_start];
                    let content = raw.strip_suffix('\n').unwrap_or(raw);
                    blocks.push(FenceBlock {
                        opening,
                        start: open_line_start,
                        end: line_end,
                        open_line_start,
                        close_line_start: line_start,
                        content: content.to_owned(),
                    });
                } else {
                    open = Some((opening, open_line_start, content_start));
                }
            }
        }

        match newline {
            Some(n) => line_start = n + 1,
            None => break,
        }
    }

    blocks
}

/// Strip a document-wide `markdown`/`md` container fence.
///
/// Chat tools often wrap a whole answer in a markdown fence. When the trimmed
/// document is exactly one such fence, its content (plus a trailing newline)
/// is returned; otherwise the newline-normalized input is returned.
#[must_use]
pub fn unwrap_markdown_container_fence(text: &str) -> String {
    let normalized = normalize_newlines(text);
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        return normalized;
    }

    let blocks = scan_fenced_blocks(trimmed);
    let [block] = blocks.as_slice() else {
        return normalized;
    };
    if block.start != 0 || block.end != trimmed.len() {
        return normalized;
    }
    if block.opening.lang != "markdown" && block.opening.lang != "md" {
        return normalized;
    }

    format!("{}\n", block.content)
}

/// Tracks code fence state during line-by-line processing.
///
/// Applies the same opening and closing rules as [`scan_fenced_blocks`], for
/// scanners that walk a document incrementally.
#[derive(Debug, Default)]
pub struct FenceTracker {
    /// Character used for the current fence (backtick or tilde).
    fence_char: Option<char>,
    /// Length of the opening fence (minimum length for closing).
    fence_len: usize,
}

impl FenceTracker {
    /// Create a new fence tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if currently inside a fenced code block.
    #[must_use]
    pub fn in_fence(&self) -> bool {
        self.fence_char.is_some()
    }

    /// Update fence state based on a line.
    ///
    /// Returns `true` if the line is a fence delimiter (opening or closing).
    pub fn update(&mut self, line: &str) -> bool {
        if let Some(fence_char) = self.fence_char {
            if is_fence_closing(line, fence_char, self.fence_len) {
                self.fence_char = None;
                self.fence_len = 0;
                return true;
            }
            false
        } else if let Some(opening) = parse_fence_opening(line) {
            self.fence_char = Some(opening.marker_char);
            self.fence_len = opening.marker_len;
            true
        } else {
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_opening_with_info_and_hint() {
        let opening = parse_fence_opening("  ```Mermaid  dark extra").unwrap();
        assert_eq!(opening.indent, "  ");
        assert_eq!(opening.marker_char, '`');
        assert_eq!(opening.marker_len, 3);
        assert_eq!(opening.info, "Mermaid  dark extra");
        assert_eq!(opening.lang, "mermaid");
        assert_eq!(opening.hint.as_deref(), Some("dark"));
        assert_eq!(opening.marker(), "```");
    }

    #[test]
    fn test_parse_opening_tilde_without_info() {
        let opening = parse_fence_opening("~~~~").unwrap();
        assert_eq!(opening.marker_char, '~');
        assert_eq!(opening.marker_len, 4);
        assert_eq!(opening.info, "");
        assert_eq!(opening.lang, "");
        assert_eq!(opening.hint, None);
    }

    #[test]
    fn test_parse_opening_rejects_short_runs() {
        assert!(parse_fence_opening("``js").is_none());
        assert!(parse_fence_opening("text ```").is_none());
        assert!(parse_fence_opening("").is_none());
    }

    #[test]
    fn test_closing_rules() {
        assert!(is_fence_closing("```", '`', 3));
        assert!(is_fence_closing("  `````  ", '`', 3));
        assert!(!is_fence_closing("``", '`', 3));
        assert!(!is_fence_closing("~~~", '`', 3));
        assert!(!is_fence_closing("```js", '`', 3));
        assert!(!is_fence_closing("```", '`', 4));
    }

    #[test]
    fn test_scan_single_block() {
        let text = "intro\n```mermaid\ngraph TD\nA-->B\n```\noutro";
        let blocks = scan_fenced_blocks(text);
        assert_eq!(blocks.len(), 1);
        let block = &blocks[0];
        assert_eq!(block.opening.lang, "mermaid");
        assert_eq!(block.content, "graph TD\nA-->B");
        assert_eq!(&text[block.start..block.end], "```mermaid\ngraph TD\nA-->B\n```\n");
        assert_eq!(block.close_line_start, text.find("```\nout").unwrap());
    }

    #[test]
    fn test_scan_block_at_end_without_newline() {
        let text = "```dot\ndigraph {}\n```";
        let blocks = scan_fenced_blocks(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].end, text.len());
        assert_eq!(blocks[0].content, "digraph {}");
    }

    #[test]
    fn test_scan_empty_block() {
        let blocks = scan_fenced_blocks("```\n```\n");
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].content, "");
    }

    #[test]
    fn test_unterminated_fence_yields_nothing() {
        let blocks = scan_fenced_blocks("```mermaid\ngraph TD\nA-->B\n");
        assert!(blocks.is_empty());
    }

    #[test]
    fn test_other_marker_is_inert_inside_fence() {
        let text = "~~~md\n```js\ncode\n```\n~~~\n";
        let blocks = scan_fenced_blocks(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].opening.lang, "md");
        assert_eq!(blocks[0].content, "```js\ncode\n```");
    }

    #[test]
    fn test_longer_outer_fence_contains_shorter() {
        let text = "````markdown\n```\ninner\n```\n````\n";
        let blocks = scan_fenced_blocks(text);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].content, "```\ninner\n```");
    }

    #[test]
    fn test_blocks_are_ordered_and_disjoint() {
        let text = "```a\n1\n```\ntext\n~~~b\n2\n~~~\n```c\n3\n```\n";
        let blocks = scan_fenced_blocks(text);
        assert_eq!(blocks.len(), 3);
        for pair in blocks.windows(2) {
            assert!(pair[0].end <= pair[1].start);
        }
        for block in &blocks {
            assert!(block.end > block.start);
            for line in block.content.lines() {
                assert!(!is_fence_closing(
                    line,
                    block.opening.marker_char,
                    block.opening.marker_len
                ));
            }
        }
    }

    #[test]
    fn test_normalize_newlines() {
        assert_eq!(normalize_newlines("a\r\nb\rc\n"), "a\nb\nc\n");
        assert_eq!(normalize_newlines("plain"), "plain");
    }

    #[test]
    fn test_unwrap_markdown_container() {
        let wrapped = "\n```markdown\n# Title\n\nBody\n```\n\n";
        assert_eq!(unwrap_markdown_container_fence(wrapped), "# Title\n\nBody\n");
    }

    #[test]
    fn test_unwrap_ignores_other_documents() {
        let code = "```rust\nfn main() {}\n```";
        assert_eq!(unwrap_markdown_container_fence(code), code);

        let mixed = "intro\n```md\nx\n```";
        assert_eq!(unwrap_markdown_container_fence(mixed), mixed);
    }

    #[test]
    fn test_tracker_backtick_fence() {
        let mut tracker = FenceTracker::new();
        assert!(!tracker.in_fence());

        assert!(tracker.update("```rust"));
        assert!(tracker.in_fence());

        assert!(!tracker.update("fn main() {}"));
        assert!(tracker.in_fence());

        assert!(tracker.update("```"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_tracker_shorter_fence_not_closing() {
        let mut tracker = FenceTracker::new();

        assert!(tracker.update("````"));
        assert!(!tracker.update("```"));
        assert!(tracker.in_fence());

        assert!(tracker.update("````"));
        assert!(!tracker.in_fence());
    }

    #[test]
    fn test_tracker_mixed_fence_chars() {
        let mut tracker = FenceTracker::new();

        assert!(tracker.update("```"));
        assert!(!tracker.update("~~~"));
        assert!(tracker.in_fence());
        assert!(tracker.update("  ```  "));
        assert!(!tracker.in_fence());
    }
}
