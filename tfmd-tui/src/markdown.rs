//! Markdown to styled terminal lines
//!
//! A small pulldown-cmark driven renderer. It knows nothing about front
//! matter, tables of contents or paging; it takes Markdown text and produces
//! lines of styled spans for a given width.

use pulldown_cmark::{Alignment, CodeBlockKind, Event, Options, Parser, Tag, TagEnd};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::highlight::Highlighter;
use crate::theme::Theme;
use crate::wrap::{spans_width, wrap_spans};

const BULLETS: [&str; 3] = ["•", "◦", "▪"];
const QUOTE_BAR: &str = "▌ ";
const CODE_INDENT: &str = "  ";

/// Settings for one call to [`render_markdown`].
pub struct RenderOptions<'a> {
    pub width: u16,
    /// Word-wrap prose to `width`; otherwise source line breaks are kept
    pub soft_wrap: bool,
    pub theme: &'a Theme,
    pub highlighter: &'a Highlighter,
}

/// Render Markdown text into styled lines.
pub fn render_markdown(text: &str, options: &RenderOptions<'_>) -> Vec<Line<'static>> {
    let mut md_options = Options::empty();
    md_options.insert(Options::ENABLE_TABLES);
    md_options.insert(Options::ENABLE_STRIKETHROUGH);
    md_options.insert(Options::ENABLE_TASKLISTS);
    md_options.insert(Options::ENABLE_FOOTNOTES);

    let mut renderer = Renderer::new(options);
    for event in Parser::new_ext(text, md_options) {
        renderer.handle(event);
    }
    renderer.finish()
}

struct ListState {
    /// Next number for ordered lists
    next_index: Option<u64>,
    /// Columns taken by the current item's marker
    marker_width: usize,
}

#[derive(Default)]
struct TableState {
    alignments: Vec<Alignment>,
    header: Vec<String>,
    rows: Vec<Vec<String>>,
    row: Vec<String>,
    cell: String,
    in_cell: bool,
}

struct Renderer<'a> {
    options: &'a RenderOptions<'a>,
    lines: Vec<Line<'static>>,
    current: Vec<Span<'static>>,

    emphasis: usize,
    strong: usize,
    strikethrough: usize,
    heading: Option<u8>,
    link: Option<String>,
    link_text: String,
    image: Option<(String, String)>,

    quote_depth: usize,
    lists: Vec<ListState>,
    item_marker: Option<String>,
    code_block: Option<(Option<String>, String)>,
    table: Option<TableState>,
}

impl<'a> Renderer<'a> {
    fn new(options: &'a RenderOptions<'a>) -> Self {
        Self {
            options,
            lines: Vec::new(),
            current: Vec::new(),
            emphasis: 0,
            strong: 0,
            strikethrough: 0,
            heading: None,
            link: None,
            link_text: String::new(),
            image: None,
            quote_depth: 0,
            lists: Vec::new(),
            item_marker: None,
            code_block: None,
            table: None,
        }
    }

    fn theme(&self) -> &'a Theme {
        self.options.theme
    }

    fn width(&self) -> usize {
        usize::from(self.options.width).max(1)
    }

    fn handle(&mut self, event: Event<'_>) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(tag) => self.end(tag),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.inline_code(&code),
            Event::Html(html) => {
                for line in html.lines() {
                    self.push(line, Style::default());
                    self.flush();
                }
            }
            Event::InlineHtml(html) => self.push(&html, Style::default()),
            Event::FootnoteReference(label) => {
                self.push(&format!("[^{label}]"), dim());
            }
            Event::SoftBreak => {
                if self.code_block.is_some() {
                    return;
                }
                if self.options.soft_wrap {
                    self.push(" ", self.inline_style());
                } else {
                    self.flush();
                }
            }
            Event::HardBreak => self.flush(),
            Event::Rule => {
                self.flush();
                let rule = "─".repeat(self.width());
                self.lines.push(Line::from(Span::styled(rule, self.theme().rule)));
                self.blank_line();
            }
            Event::TaskListMarker(done) => {
                let marker = if done { "[x] " } else { "[ ] " };
                self.push(marker, dim());
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag<'_>) {
        match tag {
            Tag::Heading { level, .. } => {
                self.flush();
                self.heading = Some(level as u8);
            }
            Tag::BlockQuote(_) => {
                self.flush();
                self.quote_depth += 1;
            }
            Tag::CodeBlock(kind) => {
                self.flush();
                let lang = match kind {
                    CodeBlockKind::Fenced(info) => {
                        info.split_whitespace().next().map(str::to_string)
                    }
                    CodeBlockKind::Indented => None,
                };
                self.code_block = Some((lang, String::new()));
            }
            Tag::List(start) => {
                self.flush();
                self.lists.push(ListState {
                    next_index: start,
                    marker_width: 0,
                });
            }
            Tag::Item => {
                self.flush();
                let depth = self.lists.len().saturating_sub(1);
                if let Some(list) = self.lists.last_mut() {
                    let marker = match list.next_index {
                        Some(n) => {
                            list.next_index = Some(n + 1);
                            format!("{n}. ")
                        }
                        None => format!("{} ", BULLETS[depth % BULLETS.len()]),
                    };
                    list.marker_width = marker.width();
                    self.item_marker = Some(marker);
                }
            }
            Tag::FootnoteDefinition(label) => {
                self.flush();
                self.push(&format!("[^{label}]: "), dim());
            }
            Tag::Table(alignments) => {
                self.flush();
                self.table = Some(TableState {
                    alignments,
                    ..TableState::default()
                });
            }
            Tag::TableCell => {
                if let Some(table) = self.table.as_mut() {
                    table.in_cell = true;
                }
            }
            Tag::Emphasis => self.emphasis += 1,
            Tag::Strong => self.strong += 1,
            Tag::Strikethrough => self.strikethrough += 1,
            Tag::Link { dest_url, .. } => {
                self.link = Some(dest_url.to_string());
                self.link_text.clear();
            }
            Tag::Image { dest_url, .. } => {
                self.image = Some((dest_url.to_string(), String::new()));
            }
            _ => {}
        }
    }

    fn end(&mut self, tag: TagEnd) {
        match tag {
            TagEnd::Paragraph => {
                self.flush();
                if self.lists.is_empty() {
                    self.blank_line();
                }
            }
            TagEnd::Heading(_) => {
                let level = self.heading.take();
                self.flush();
                if level == Some(1) {
                    let underline = "═".repeat(self.width());
                    let style = self.theme().heading_style(1);
                    self.lines.push(Line::from(Span::styled(underline, style)));
                }
                self.blank_line();
            }
            TagEnd::BlockQuote(_) => {
                self.flush();
                self.quote_depth = self.quote_depth.saturating_sub(1);
                self.blank_line();
            }
            TagEnd::CodeBlock => {
                if let Some((lang, code)) = self.code_block.take() {
                    self.code_lines(lang.as_deref(), &code);
                }
                self.blank_line();
            }
            TagEnd::List(_) => {
                self.flush();
                self.lists.pop();
                if self.lists.is_empty() {
                    self.blank_line();
                }
            }
            TagEnd::Item => {
                self.flush();
                self.item_marker = None;
            }
            TagEnd::FootnoteDefinition => {
                self.flush();
                self.blank_line();
            }
            TagEnd::Table => {
                if let Some(table) = self.table.take() {
                    self.table_lines(&table);
                }
                self.blank_line();
            }
            TagEnd::TableHead => {
                if let Some(table) = self.table.as_mut() {
                    table.header = std::mem::take(&mut table.row);
                }
            }
            TagEnd::TableRow => {
                if let Some(table) = self.table.as_mut() {
                    let row = std::mem::take(&mut table.row);
                    table.rows.push(row);
                }
            }
            TagEnd::TableCell => {
                if let Some(table) = self.table.as_mut() {
                    let cell = std::mem::take(&mut table.cell);
                    table.row.push(cell.trim().to_string());
                    table.in_cell = false;
                }
            }
            TagEnd::Emphasis => self.emphasis = self.emphasis.saturating_sub(1),
            TagEnd::Strong => self.strong = self.strong.saturating_sub(1),
            TagEnd::Strikethrough => self.strikethrough = self.strikethrough.saturating_sub(1),
            TagEnd::Link => {
                if let Some(url) = self.link.take() {
                    let redundant =
                        url.is_empty() || url == self.link_text || url.starts_with('#');
                    if !redundant {
                        self.push(&format!(" ({url})"), dim());
                    }
                }
            }
            TagEnd::Image => {
                if let Some((url, alt)) = self.image.take() {
                    let alt = if alt.trim().is_empty() { url } else { alt };
                    let style = self.inline_style().patch(dim());
                    self.push(&format!("[image: {}]", alt.trim()), style);
                }
            }
            _ => {}
        }
    }

    fn text(&mut self, text: &str) {
        if let Some((_, code)) = self.code_block.as_mut() {
            code.push_str(text);
            return;
        }
        if let Some(table) = self.table.as_mut().filter(|t| t.in_cell) {
            table.cell.push_str(text);
            return;
        }
        if let Some((_, alt)) = self.image.as_mut() {
            alt.push_str(text);
            return;
        }

        if self.link.is_some() {
            self.link_text.push_str(text);
        }
        self.push(text, self.inline_style());
    }

    fn inline_code(&mut self, code: &str) {
        if let Some(table) = self.table.as_mut().filter(|t| t.in_cell) {
            table.cell.push_str(code);
            return;
        }

        let mut style = self.theme().inline_code;
        if self.link.is_some() {
            self.link_text.push_str(code);
            style = style.patch(self.theme().link);
        }
        self.push(code, style);
    }

    /// Style for prose at the current nesting of emphasis, headings and links
    fn inline_style(&self) -> Style {
        let mut style = match self.heading {
            Some(level) => self.theme().heading_style(level),
            None => Style::default(),
        };
        if self.emphasis > 0 {
            style = style.add_modifier(Modifier::ITALIC);
        }
        if self.strong > 0 {
            style = style.add_modifier(Modifier::BOLD);
        }
        if self.strikethrough > 0 {
            style = style.add_modifier(Modifier::CROSSED_OUT);
        }
        if self.link.is_some() {
            style = style.patch(self.theme().link);
        }
        style
    }

    fn push(&mut self, text: &str, style: Style) {
        if text.is_empty() {
            return;
        }
        match self.current.last_mut() {
            Some(last) if last.style == style => last.content.to_mut().push_str(text),
            _ => self.current.push(Span::styled(text.to_string(), style)),
        }
    }

    /// Prefixes for the first and the following rows of the current line:
    /// quote bars, list indentation and a pending item marker.
    fn prefixes(&mut self) -> (Vec<Span<'static>>, Vec<Span<'static>>) {
        let mut first = Vec::new();
        let mut rest = Vec::new();

        if self.quote_depth > 0 {
            let bars = Span::styled(QUOTE_BAR.repeat(self.quote_depth), self.theme().rule);
            first.push(bars.clone());
            rest.push(bars);
        }

        let indent: usize = self.lists.iter().map(|l| l.marker_width).sum();
        match self.item_marker.take() {
            Some(marker) => {
                let outer = indent.saturating_sub(marker.width());
                if outer > 0 {
                    first.push(Span::raw(" ".repeat(outer)));
                }
                first.push(Span::raw(marker));
            }
            None if indent > 0 => first.push(Span::raw(" ".repeat(indent))),
            None => {}
        }
        if indent > 0 {
            rest.push(Span::raw(" ".repeat(indent)));
        }

        (first, rest)
    }

    /// Finish the current line, wrapping it when soft wrap is on.
    fn flush(&mut self) {
        if self.current.is_empty() {
            return;
        }
        let content = std::mem::take(&mut self.current);
        let (first, rest) = self.prefixes();

        if !self.options.soft_wrap {
            self.lines.push(join(first, content));
            return;
        }

        let available = self.width().saturating_sub(spans_width(&first)).max(1);
        for (idx, row) in wrap_spans(&content, available).into_iter().enumerate() {
            let prefix = if idx == 0 { first.clone() } else { rest.clone() };
            self.lines.push(join(prefix, row));
        }
    }

    fn blank_line(&mut self) {
        if self.lines.last().is_some_and(|line| line.spans.is_empty()) || self.lines.is_empty() {
            return;
        }
        self.lines.push(Line::default());
    }

    fn code_lines(&mut self, lang: Option<&str>, code: &str) {
        let highlighted = self.options.highlighter.highlight(lang, code);
        let (first, rest) = self.prefixes();
        for (idx, line) in highlighted.into_iter().enumerate() {
            let mut prefix = if idx == 0 { first.clone() } else { rest.clone() };
            prefix.push(Span::raw(CODE_INDENT));
            self.lines.push(join(prefix, line.spans));
        }
    }

    fn table_lines(&mut self, table: &TableState) {
        let columns = table
            .rows
            .iter()
            .chain(std::iter::once(&table.header))
            .map(Vec::len)
            .max()
            .unwrap_or(0);
        if columns == 0 {
            return;
        }

        let mut widths = vec![3usize; columns];
        for row in table.rows.iter().chain(std::iter::once(&table.header)) {
            for (idx, cell) in row.iter().enumerate() {
                widths[idx] = widths[idx].max(cell.width());
            }
        }

        let border = self.theme().rule;
        let header_style = Style::default().add_modifier(Modifier::BOLD);

        let mut out = vec![self.table_row(&table.header, &widths, &table.alignments, header_style)];
        let separator: Vec<String> = widths.iter().map(|w| "─".repeat(w + 2)).collect();
        out.push(Line::from(Span::styled(
            format!("├{}┤", separator.join("┼")),
            border,
        )));
        for row in &table.rows {
            out.push(self.table_row(row, &widths, &table.alignments, Style::default()));
        }

        let (first, rest) = self.prefixes();
        for (idx, line) in out.into_iter().enumerate() {
            let prefix = if idx == 0 { first.clone() } else { rest.clone() };
            self.lines.push(join(prefix, line.spans));
        }
    }

    fn table_row(
        &self,
        row: &[String],
        widths: &[usize],
        alignments: &[Alignment],
        style: Style,
    ) -> Line<'static> {
        let border = self.theme().rule;
        let mut spans = vec![Span::styled("│", border)];
        for (idx, width) in widths.iter().enumerate() {
            let cell = row.get(idx).map(String::as_str).unwrap_or("");
            let align = alignments.get(idx).copied().unwrap_or(Alignment::None);
            spans.push(Span::styled(format!(" {} ", pad(cell, *width, align)), style));
            spans.push(Span::styled("│", border));
        }
        Line::from(spans)
    }

    fn finish(mut self) -> Vec<Line<'static>> {
        self.flush();
        while self.lines.last().is_some_and(|line| line.spans.is_empty()) {
            self.lines.pop();
        }
        self.lines
    }
}

fn dim() -> Style {
    Style::default().add_modifier(Modifier::DIM)
}

fn join(mut prefix: Vec<Span<'static>>, content: Vec<Span<'static>>) -> Line<'static> {
    prefix.extend(content);
    Line::from(prefix)
}

fn pad(cell: &str, width: usize, align: Alignment) -> String {
    let fill = width.saturating_sub(cell.width());
    match align {
        Alignment::Right => format!("{}{}", " ".repeat(fill), cell),
        Alignment::Center => {
            let left = fill / 2;
            format!("{}{}{}", " ".repeat(left), cell, " ".repeat(fill - left))
        }
        Alignment::Left | Alignment::None => format!("{}{}", cell, " ".repeat(fill)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;
    use tfmd_core::CodeTheme;

    fn render_with(text: &str, theme: &Theme, width: u16, soft_wrap: bool) -> Vec<Line<'static>> {
        let highlighter = Highlighter::new(&CodeTheme::new("github-dark"), false);
        let options = RenderOptions {
            width,
            soft_wrap,
            theme,
            highlighter: &highlighter,
        };
        render_markdown(text, &options)
    }

    fn render(text: &str) -> Vec<Line<'static>> {
        render_with(text, &Theme::github_dark(), 40, false)
    }

    fn plain(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    fn find_span<'l>(lines: &'l [Line<'static>], text: &str) -> &'l Span<'static> {
        lines
            .iter()
            .flat_map(|l| l.spans.iter())
            .find(|s| s.content.contains(text))
            .expect("span present")
    }

    #[test]
    fn heading_and_paragraph() {
        let lines = render("# Hi\nBody");
        let text = plain(&lines);
        assert_eq!(text[0], "Hi");
        assert_eq!(text[1], "═".repeat(40));
        assert_eq!(text[2], "");
        assert_eq!(text[3], "Body");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn heading_uses_theme_style() {
        let theme = Theme::github_dark();
        let lines = render_with("## Second\n", &theme, 40, false);
        assert_eq!(find_span(&lines, "Second").style, theme.heading[1]);
    }

    #[test]
    fn link_styled_and_url_shown() {
        let theme = Theme::github_light();
        let lines = render_with("see [docs](https://example.com)\n", &theme, 80, false);
        assert_eq!(find_span(&lines, "docs").style.fg, Some(Color::Blue));
        assert_eq!(plain(&lines), ["see docs (https://example.com)"]);
    }

    #[test]
    fn autolink_does_not_repeat_url() {
        let lines = render("<https://example.com>\n");
        assert_eq!(plain(&lines), ["https://example.com"]);
    }

    #[test]
    fn inline_code_uses_theme_style() {
        let theme = Theme::github_dark();
        let lines = render_with("run `cargo`\n", &theme, 40, false);
        assert_eq!(find_span(&lines, "cargo").style, theme.inline_code);
    }

    #[test]
    fn rule_spans_width() {
        let theme = Theme::default_preset();
        let lines = render_with("a\n\n---\n\nb\n", &theme, 12, false);
        let rule = lines
            .iter()
            .find(|l| plain(std::slice::from_ref(*l))[0].starts_with('─'))
            .expect("rule line");
        assert_eq!(rule.spans[0].content.as_ref(), "─".repeat(12));
        assert_eq!(rule.spans[0].style, theme.rule);
    }

    #[test]
    fn bullet_and_ordered_lists() {
        let text = plain(&render("- one\n- two\n  - nested\n\n1. first\n2. second\n"));
        assert_eq!(
            text,
            ["• one", "• two", "  ◦ nested", "", "1. first", "2. second"]
        );
    }

    #[test]
    fn task_list_markers() {
        let text = plain(&render("- [x] done\n- [ ] todo\n"));
        assert_eq!(text, ["• [x] done", "• [ ] todo"]);
    }

    #[test]
    fn block_quote_prefix() {
        let text = plain(&render("> quoted\n"));
        assert_eq!(text, ["▌ quoted"]);
    }

    #[test]
    fn code_block_is_indented_and_not_wrapped() {
        let code = "```rust\nlet a_rather_long_identifier = 1;\n```\n";
        let text = plain(&render_with(code, &Theme::builtin(), 10, true));
        assert_eq!(text, ["  let a_rather_long_identifier = 1;"]);
    }

    #[test]
    fn soft_break_kept_without_wrap() {
        let text = plain(&render("one\ntwo\n"));
        assert_eq!(text, ["one", "two"]);
    }

    #[test]
    fn soft_wrap_joins_and_wraps() {
        let text = plain(&render_with(
            "alpha beta\ngamma delta\n",
            &Theme::builtin(),
            11,
            true,
        ));
        assert_eq!(text, ["alpha beta", "gamma delta"]);

        let text = plain(&render_with("alpha beta gamma\n", &Theme::builtin(), 11, true));
        assert_eq!(text, ["alpha beta", "gamma"]);
    }

    #[test]
    fn soft_wrap_indents_list_continuations() {
        let text = plain(&render_with(
            "- alpha beta gamma\n",
            &Theme::builtin(),
            12,
            true,
        ));
        assert_eq!(text, ["• alpha beta", "  gamma"]);
    }

    #[test]
    fn long_lines_untouched_without_soft_wrap() {
        let long = "word ".repeat(20);
        let lines = render_with(&long, &Theme::builtin(), 10, false);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn table_layout() {
        let text = plain(&render("| a | bb |\n|---|---:|\n| 1 | 2 |\n"));
        assert_eq!(
            text,
            ["│ a   │  bb │", "├─────┼─────┤", "│ 1   │   2 │"]
        );
    }

    #[test]
    fn image_placeholder() {
        let text = plain(&render("![a cat](cat.png)\n"));
        assert_eq!(text, ["[image: a cat]"]);
    }

    #[test]
    fn emphasis_modifiers() {
        let lines = render("*it* **bold** ~~gone~~\n");
        assert!(find_span(&lines, "it").style.add_modifier.contains(Modifier::ITALIC));
        assert!(find_span(&lines, "bold").style.add_modifier.contains(Modifier::BOLD));
        assert!(find_span(&lines, "gone")
            .style
            .add_modifier
            .contains(Modifier::CROSSED_OUT));
    }

    #[test]
    fn empty_input_renders_nothing() {
        assert!(render("").is_empty());
    }
}
