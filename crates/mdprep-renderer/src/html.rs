//! Markdown to HTML rendering.
//!
//! Extraction works on any markdown renderer that keeps image alt text
//! intact; [`HtmlRenderer`] is the seam. [`PulldownRenderer`] is the built-in
//! CommonMark implementation.

use std::sync::LazyLock;

use pulldown_cmark::{
    CowStr, Event, LinkType, Options, Parser, Tag, TagEnd, TextMergeStream, html,
};
use regex::Regex;

static URL_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"https?://[^\s<>"]+"#).unwrap());

/// Options passed to an [`HtmlRenderer`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RenderOptions {
    /// Pass raw HTML through instead of escaping it (default: false).
    pub raw_html: bool,
    /// Turn bare `http(s)://` URLs into links (default: true).
    pub autolink: bool,
    /// Smart quotes and dashes (default: false).
    pub typography: bool,
    /// Tables, strikethrough and task lists (default: true).
    pub gfm: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            raw_html: false,
            autolink: true,
            typography: false,
            gfm: true,
        }
    }
}

/// Converts markdown to HTML.
pub trait HtmlRenderer {
    fn render(&self, markdown: &str, options: &RenderOptions) -> String;
}

impl<F> HtmlRenderer for F
where
    F: Fn(&str, &RenderOptions) -> String,
{
    fn render(&self, markdown: &str, options: &RenderOptions) -> String {
        self(markdown, options)
    }
}

/// CommonMark renderer backed by `pulldown-cmark`.
#[derive(Clone, Copy, Debug, Default)]
pub struct PulldownRenderer;

impl HtmlRenderer for PulldownRenderer {
    fn render(&self, markdown: &str, options: &RenderOptions) -> String {
        let mut parser_options = Options::empty();
        if options.gfm {
            parser_options.insert(Options::ENABLE_TABLES);
            parser_options.insert(Options::ENABLE_STRIKETHROUGH);
            parser_options.insert(Options::ENABLE_TASKLISTS);
        }
        if options.typography {
            parser_options.insert(Options::ENABLE_SMART_PUNCTUATION);
        }

        let raw_html = options.raw_html;
        let events = TextMergeStream::new(Parser::new_ext(markdown, parser_options)).map(
            |event| match event {
                Event::Html(raw) | Event::InlineHtml(raw) if !raw_html => Event::Text(raw),
                other => other,
            },
        );

        let mut out = String::with_capacity(markdown.len() * 3 / 2);
        if options.autolink {
            html::push_html(&mut out, linkify(events).into_iter());
        } else {
            html::push_html(&mut out, events);
        }
        out
    }
}

/// Wrap bare URLs in text events with link events.
///
/// Text inside links, images and code blocks is left alone.
fn linkify<'a>(events: impl Iterator<Item = Event<'a>>) -> Vec<Event<'a>> {
    let mut out = Vec::new();
    let mut link_depth = 0_usize;
    let mut in_code_block = false;

    for event in events {
        match &event {
            Event::Start(Tag::Link { .. } | Tag::Image { .. }) => link_depth += 1,
            Event::End(TagEnd::Link | TagEnd::Image) => link_depth = link_depth.saturating_sub(1),
            Event::Start(Tag::CodeBlock(_)) => in_code_block = true,
            Event::End(TagEnd::CodeBlock) => in_code_block = false,
            _ => {}
        }

        match event {
            Event::Text(text) if link_depth == 0 && !in_code_block => {
                push_linkified(&mut out, text);
            }
            other => out.push(other),
        }
    }

    out
}

fn push_linkified<'a>(out: &mut Vec<Event<'a>>, text: CowStr<'a>) {
    let mut last = 0;

    for m in URL_RE.find_iter(&text) {
        let url = m
            .as_str()
            .trim_end_matches(['.', ',', ';', ':', '!', '?', ')', '\'']);
        if url.ends_with("://") {
            continue;
        }

        if m.start() > last {
            out.push(Event::Text(text[last..m.start()].to_owned().into()));
        }
        out.push(Event::Start(Tag::Link {
            link_type: LinkType::Autolink,
            dest_url: url.to_owned().into(),
            title: CowStr::Borrowed(""),
            id: CowStr::Borrowed(""),
        }));
        out.push(Event::Text(url.to_owned().into()));
        out.push(Event::End(TagEnd::Link));
        last = m.start() + url.len();
    }

    if last == 0 {
        out.push(Event::Text(text));
    } else if last < text.len() {
        out.push(Event::Text(text[last..].to_owned().into()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn render(markdown: &str) -> String {
        PulldownRenderer.render(markdown, &RenderOptions::default())
    }

    #[test]
    fn test_basic_paragraph() {
        assert_eq!(render("Hello *world*"), "<p>Hello <em>world</em></p>\n");
    }

    #[test]
    fn test_raw_html_escaped_by_default() {
        let html = render("a <b>bold</b> move");
        assert!(html.contains("&lt;b&gt;bold&lt;/b&gt;"), "{html}");
    }

    #[test]
    fn test_raw_html_passthrough() {
        let options = RenderOptions {
            raw_html: true,
            ..RenderOptions::default()
        };
        let html = PulldownRenderer.render("a <b>bold</b> move", &options);
        assert!(html.contains("<b>bold</b>"), "{html}");
    }

    #[test]
    fn test_bare_url_linkified() {
        let html = render("See https://example.com/docs.");
        assert_eq!(
            html,
            "<p>See <a href=\"https://example.com/docs\">https://example.com/docs</a>.</p>\n"
        );
    }

    #[test]
    fn test_autolink_disabled() {
        let options = RenderOptions {
            autolink: false,
            ..RenderOptions::default()
        };
        let html = PulldownRenderer.render("See https://example.com", &options);
        assert_eq!(html, "<p>See https://example.com</p>\n");
    }

    #[test]
    fn test_urls_in_code_and_links_untouched() {
        let html = render("`https://a.dev` [x](https://b.dev)\n\n```\nhttps://c.dev\n```\n");
        assert_eq!(html.matches("<a ").count(), 1, "{html}");
        assert!(html.contains("<code>https://a.dev</code>"));
        assert!(html.contains("https://c.dev\n</code>"));
    }

    #[test]
    fn test_typography() {
        let options = RenderOptions {
            typography: true,
            ..RenderOptions::default()
        };
        let html = PulldownRenderer.render("\"quoted\" -- dash", &options);
        assert!(html.contains('\u{201C}'), "{html}");
        assert!(html.contains('\u{2013}'), "{html}");
    }

    #[test]
    fn test_gfm_table() {
        let html = render("| a | b |\n|---|---|\n| 1 | 2 |\n");
        assert!(html.contains("<table>"), "{html}");
    }

    #[test]
    fn test_placeholder_image_keeps_alt() {
        let html = render(&mdprep_core::diagram_placeholder("0"));
        assert!(html.contains(r#"alt="diagram:0""#), "{html}");
        assert!(html.contains(mdprep_core::PLACEHOLDER_GIF), "{html}");
    }

    #[test]
    fn test_closure_renderer() {
        let renderer = |markdown: &str, _: &RenderOptions| markdown.to_uppercase();
        assert_eq!(renderer.render("abc", &RenderOptions::default()), "ABC");
    }
}
