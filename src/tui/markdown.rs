//! Post content → ratatui `Text`.
//!
//! Post bodies are markdown that may carry raw HTML (`<p>`, `<em>`, `<br>`),
//! since many static blogs export HTML straight into `posts.json`. Markdown
//! goes through `pulldown_cmark`; HTML tags that matter for reading
//! (paragraphs, line breaks, list items, emphasis, headings) are mapped onto
//! the same styles, every other tag is dropped and its text kept. Fenced code
//! blocks are highlighted with syntect.

use std::sync::LazyLock;

use pulldown_cmark::{CodeBlockKind, Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use syntect::easy::HighlightLines;
use syntect::highlighting::ThemeSet;
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;

static SYNTAX_SET: LazyLock<SyntaxSet> = LazyLock::new(SyntaxSet::load_defaults_newlines);
static THEME_SET: LazyLock<ThemeSet> = LazyLock::new(ThemeSet::load_defaults);

const CODE_THEME: &str = "base16-ocean.dark";

/// Render post content with `base_fg` as the body colour.
pub fn render(content: &str, base_fg: Color) -> Text<'static> {
    let mut opts = Options::empty();
    opts.insert(Options::ENABLE_STRIKETHROUGH);

    let mut w = Writer::new(base_fg);
    for event in Parser::new_ext(content, opts) {
        w.handle(event);
    }
    w.text
}

struct Writer {
    text: Text<'static>,
    base_fg: Color,
    /// Inline styles; each entry is already patched onto its parent.
    styles: Vec<Style>,
    /// Per-line prefix spans (blockquote bar, code block border).
    line_prefixes: Vec<Span<'static>>,
    /// None = unordered, Some(n) = next number of an ordered list.
    list_indices: Vec<Option<u64>>,
    highlighter: Option<HighlightLines<'static>>,
    in_code: bool,
    link_url: Option<String>,
    needs_blank: bool,
}

impl Writer {
    fn new(base_fg: Color) -> Self {
        Self {
            text: Text::default(),
            base_fg,
            styles: vec![],
            line_prefixes: vec![],
            list_indices: vec![],
            highlighter: None,
            in_code: false,
            link_url: None,
            needs_blank: false,
        }
    }

    fn style(&self) -> Style {
        self.styles
            .last()
            .copied()
            .unwrap_or_else(|| Style::default().fg(self.base_fg))
    }

    fn push_style(&mut self, overlay: Style) {
        self.styles.push(self.style().patch(overlay));
    }

    fn pop_style(&mut self) {
        self.styles.pop();
    }

    fn push_line(&mut self, line: Line<'static>) {
        let mut out = line;
        for pfx in self.line_prefixes.iter().rev().cloned() {
            out.spans.insert(0, pfx);
        }
        self.text.lines.push(out);
    }

    fn push_span(&mut self, span: Span<'static>) {
        match self.text.lines.last_mut() {
            Some(line) => line.push_span(span),
            None => self.push_line(Line::from(vec![span])),
        }
    }

    /// Start a new block: blank separator if the previous block asked for one.
    fn start_block(&mut self) {
        if self.needs_blank {
            self.push_line(Line::default());
            self.needs_blank = false;
        }
        self.push_line(Line::default());
    }

    fn end_block(&mut self) {
        self.needs_blank = true;
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(tag) => self.close(tag),
            Event::Text(t) => self.text(&t),
            Event::Code(c) => {
                let style = Style::default().fg(Color::White).bg(Color::DarkGray);
                self.push_span(Span::styled(c.to_string(), style));
            }
            Event::Html(html) | Event::InlineHtml(html) => self.html(&html),
            Event::SoftBreak => self.push_span(Span::raw(" ")),
            Event::HardBreak => self.push_line(Line::default()),
            Event::Rule => {
                self.start_block();
                self.push_span(Span::styled(
                    "─".repeat(40),
                    Style::default().fg(Color::DarkGray),
                ));
                self.end_block();
            }
            _ => {}
        }
    }

    fn open(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Paragraph => self.start_block(),
            Tag::Heading { level, .. } => {
                self.start_block();
                self.push_style(heading_style(level));
            }
            Tag::BlockQuote(_) => {
                if self.needs_blank {
                    self.push_line(Line::default());
                    self.needs_blank = false;
                }
                self.line_prefixes
                    .push(Span::styled("│ ", Style::default().fg(Color::DarkGray)));
                self.push_style(Style::default().add_modifier(Modifier::ITALIC));
            }
            Tag::CodeBlock(kind) => {
                self.start_block();
                let lang = match &kind {
                    CodeBlockKind::Fenced(l) => l.to_string(),
                    CodeBlockKind::Indented => String::new(),
                };
                let border = Style::default().fg(Color::DarkGray);
                self.push_span(Span::styled(format!("╭── {lang}").trim_end().to_string(), border));
                self.line_prefixes.push(Span::styled("│ ", border));
                if let Some(syntax) = SYNTAX_SET.find_syntax_by_token(&lang)
                    && !lang.is_empty()
                {
                    self.highlighter =
                        Some(HighlightLines::new(syntax, &THEME_SET.themes[CODE_THEME]));
                }
                self.in_code = true;
            }
            Tag::List(start) => {
                if self.list_indices.is_empty() && self.needs_blank {
                    self.push_line(Line::default());
                    self.needs_blank = false;
                }
                self.list_indices.push(start);
            }
            Tag::Item => self.list_item(),
            Tag::Emphasis => self.push_style(Style::default().add_modifier(Modifier::ITALIC)),
            Tag::Strong => self.push_style(Style::default().add_modifier(Modifier::BOLD)),
            Tag::Strikethrough => {
                self.push_style(Style::default().add_modifier(Modifier::CROSSED_OUT))
            }
            Tag::Link { dest_url, .. } => {
                self.link_url = Some(dest_url.to_string());
                self.push_style(link_style());
            }
            _ => {}
        }
    }

    fn close(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => self.end_block(),
            TagEnd::Heading(_) => {
                self.pop_style();
                self.end_block();
            }
            TagEnd::BlockQuote(_) => {
                self.line_prefixes.pop();
                self.pop_style();
                self.end_block();
            }
            TagEnd::CodeBlock => {
                self.highlighter = None;
                self.in_code = false;
                self.line_prefixes.pop();
                self.push_line(Line::from(Span::styled(
                    "╰──",
                    Style::default().fg(Color::DarkGray),
                )));
                self.end_block();
            }
            TagEnd::List(_) => {
                self.list_indices.pop();
                self.end_block();
            }
            TagEnd::Emphasis | TagEnd::Strong | TagEnd::Strikethrough => self.pop_style(),
            TagEnd::Link => {
                self.pop_style();
                if let Some(url) = self.link_url.take() {
                    self.push_span(Span::styled(format!(" ({url})"), link_style()));
                }
            }
            _ => {}
        }
    }

    fn list_item(&mut self) {
        self.push_line(Line::default());
        let indent = "  ".repeat(self.list_indices.len().saturating_sub(1));
        let marker = match self.list_indices.last_mut() {
            Some(Some(n)) => {
                let marker = format!("{indent}{n}. ");
                *n += 1;
                marker
            }
            _ => format!("{indent}• "),
        };
        self.push_span(Span::styled(marker, Style::default().fg(Color::DarkGray)));
    }

    fn text(&mut self, raw: &str) {
        // ratatui renders \t as zero-width
        let text = raw.replace('\t', "    ");

        if self.in_code {
            self.code_text(&text);
            return;
        }
        let style = self.style();
        self.push_span(Span::styled(decode_entities(&text), style));
    }

    fn code_text(&mut self, text: &str) {
        // Take the highlighter out: highlight_line borrows it while push_line borrows self
        let Some(mut hl) = self.highlighter.take() else {
            let style = Style::default().fg(Color::White);
            for line in text.lines() {
                self.push_line(Line::from(Span::styled(line.to_owned(), style)));
            }
            return;
        };
        for line in LinesWithEndings::from(text) {
            let Ok(ranges) = hl.highlight_line(line, &SYNTAX_SET) else {
                continue;
            };
            let spans: Vec<Span<'static>> = ranges
                .into_iter()
                .filter_map(|(hl_style, frag)| {
                    let content = frag.trim_end_matches('\n');
                    if content.is_empty() {
                        return None;
                    }
                    let fg = Color::Rgb(
                        hl_style.foreground.r,
                        hl_style.foreground.g,
                        hl_style.foreground.b,
                    );
                    Some(Span::styled(content.to_owned(), Style::default().fg(fg)))
                })
                .collect();
            self.push_line(Line::from(spans));
        }
        self.highlighter = Some(hl);
    }

    /// Raw HTML: map structural tags, keep text between tags.
    fn html(&mut self, html: &str) {
        let mut rest = html;
        while !rest.is_empty() {
            match rest.find('<') {
                Some(0) => {
                    let Some(end) = rest.find('>') else {
                        self.text(rest);
                        return;
                    };
                    self.html_tag(&rest[1..end]);
                    rest = &rest[end + 1..];
                }
                Some(start) => {
                    self.html_text(&rest[..start]);
                    rest = &rest[start..];
                }
                None => {
                    self.html_text(rest);
                    return;
                }
            }
        }
    }

    fn html_text(&mut self, text: &str) {
        // Whitespace between block tags carries no content
        if text.trim().is_empty() {
            if !text.is_empty() && !text.contains('\n') {
                self.push_span(Span::raw(" "));
            }
            return;
        }
        let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
        let lead = if text.starts_with(char::is_whitespace) { " " } else { "" };
        let trail = if text.ends_with(char::is_whitespace) { " " } else { "" };
        self.text(&format!("{lead}{collapsed}{trail}"));
    }

    fn html_tag(&mut self, inner: &str) {
        let inner = inner.trim().trim_end_matches('/').trim();
        let closing = inner.starts_with('/');
        let name = inner
            .trim_start_matches('/')
            .split(|c: char| c.is_whitespace())
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();

        match (name.as_str(), closing) {
            ("p" | "div" | "section" | "article", false) => self.start_block(),
            ("p" | "div" | "section" | "article", true) => self.end_block(),
            ("br", _) => self.push_line(Line::default()),
            ("h1" | "h2" | "h3" | "h4" | "h5" | "h6", false) => {
                self.start_block();
                self.push_style(heading_style(HeadingLevel::H2));
            }
            ("h1" | "h2" | "h3" | "h4" | "h5" | "h6", true) => {
                self.pop_style();
                self.end_block();
            }
            ("ul" | "ol", false) => self.list_indices.push(None),
            ("ul" | "ol", true) => {
                self.list_indices.pop();
                self.end_block();
            }
            ("li", false) => self.list_item(),
            ("em" | "i" | "cite", false) => {
                self.push_style(Style::default().add_modifier(Modifier::ITALIC))
            }
            ("strong" | "b", false) => {
                self.push_style(Style::default().add_modifier(Modifier::BOLD))
            }
            ("em" | "i" | "cite" | "strong" | "b", true) => self.pop_style(),
            _ => {}
        }
    }
}

fn heading_style(level: HeadingLevel) -> Style {
    match level {
        HeadingLevel::H1 => Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        HeadingLevel::H2 => Style::default().add_modifier(Modifier::BOLD),
        _ => Style::default().add_modifier(Modifier::BOLD | Modifier::ITALIC),
    }
}

fn link_style() -> Style {
    Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::UNDERLINED)
}

/// The handful of entities that show up in hand-written HTML.
fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    text.replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&rarr;", "→")
        .replace("&larr;", "←")
        .replace("&mdash;", "—")
        .replace("&amp;", "&")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain_lines(text: &Text) -> Vec<String> {
        text.lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn plain_text_uses_base_color() {
        let text = render("hello", Color::Green);
        let span = &text.lines[0].spans[0];
        assert_eq!(span.content, "hello");
        assert_eq!(span.style.fg, Some(Color::Green));
    }

    #[test]
    fn bold_text_is_bold() {
        let text = render("Some **bold** text", Color::White);
        let bold = text.lines[0].spans.iter().find(|s| s.content == "bold").unwrap();
        assert!(bold.style.add_modifier.contains(Modifier::BOLD));
    }

    #[test]
    fn paragraphs_are_separated_by_blank_line() {
        let text = render("first\n\nsecond", Color::White);
        assert_eq!(plain_lines(&text), vec!["first", "", "second"]);
    }

    #[test]
    fn html_paragraphs_render_as_text() {
        let text = render("<p>One &amp; two.</p>\n<p>Three<br>four</p>", Color::White);
        let lines = plain_lines(&text);
        assert!(lines.iter().any(|l| l == "One & two."), "{lines:?}");
        assert!(lines.iter().any(|l| l == "Three"), "{lines:?}");
        assert!(lines.iter().any(|l| l == "four"), "{lines:?}");
        assert!(!lines.iter().any(|l| l.contains('<')), "{lines:?}");
    }

    #[test]
    fn inline_html_emphasis_is_styled() {
        let text = render("A <em>fine</em> book", Color::White);
        let em = text.lines[0].spans.iter().find(|s| s.content == "fine").unwrap();
        assert!(em.style.add_modifier.contains(Modifier::ITALIC));
        let after = text.lines[0].spans.iter().find(|s| s.content.contains("book")).unwrap();
        assert!(!after.style.add_modifier.contains(Modifier::ITALIC));
    }

    #[test]
    fn lists_get_markers() {
        let lines = plain_lines(&render("- one\n- two", Color::White));
        assert_eq!(lines, vec!["• one", "• two"]);
        let lines = plain_lines(&render("1. first\n2. second", Color::White));
        assert!(lines.contains(&"1. first".to_string()), "{lines:?}");
        assert!(lines.contains(&"2. second".to_string()), "{lines:?}");
    }

    #[test]
    fn code_block_has_border_structure() {
        let text = render("```\nline1\n\tline2\n```", Color::White);
        let lines = plain_lines(&text);
        assert!(lines[0].starts_with('╭'), "{lines:?}");
        assert_eq!(lines[1], "│ line1");
        assert_eq!(lines[2], "│     line2");
        assert!(lines.last().unwrap().starts_with('╰'));
    }

    #[test]
    fn links_show_their_url() {
        let text = render("[home](https://blog.example)", Color::White);
        let lines = plain_lines(&text);
        assert_eq!(lines[0], "home (https://blog.example)");
    }

    #[test]
    fn entities_decode() {
        assert_eq!(decode_entities("a &lt;b&gt; &amp;amp;"), "a <b> &amp;");
        assert_eq!(decode_entities("plain"), "plain");
    }
}
