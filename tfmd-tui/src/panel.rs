//! Bordered panels sized to their content

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

use crate::wrap::{spans_width, wrap_spans};

const ELLIPSIS: &str = "…";

/// A titled box around some lines, fitted to the widest line.
pub struct Panel {
    title: Option<Span<'static>>,
    body: Vec<Line<'static>>,
    border: Style,
    wrap: bool,
}

impl Panel {
    pub fn new(body: Vec<Line<'static>>) -> Self {
        Self {
            title: None,
            body,
            border: Style::default().add_modifier(Modifier::DIM),
            wrap: false,
        }
    }

    pub fn title(mut self, title: Span<'static>) -> Self {
        self.title = Some(title);
        self
    }

    /// Wrap long lines instead of cropping them
    pub fn wrap(mut self, wrap: bool) -> Self {
        self.wrap = wrap;
        self
    }

    /// Lay the panel out within `max_width` columns.
    pub fn render(&self, max_width: u16) -> Vec<Line<'static>> {
        // Borders and one column of padding on each side
        let max_inner = usize::from(max_width).saturating_sub(4).max(1);

        let title_width = self.title.as_ref().map_or(0, |t| t.content.width() + 2);
        let content_width = self
            .body
            .iter()
            .map(|line| spans_width(&line.spans))
            .max()
            .unwrap_or(0);
        let inner = content_width.max(title_width).clamp(1, max_inner);

        let mut rows: Vec<Vec<Span<'static>>> = Vec::new();
        for line in &self.body {
            let spans = styled_spans(line);
            if spans_width(&spans) <= inner {
                rows.push(spans);
            } else if self.wrap {
                rows.extend(wrap_spans(&spans, inner));
            } else {
                rows.push(crop(&spans, inner));
            }
        }

        let mut out = Vec::with_capacity(rows.len() + 2);
        out.push(self.top_border(inner));
        for row in rows {
            let pad = inner.saturating_sub(spans_width(&row));
            let mut spans = vec![Span::styled("│ ", self.border)];
            spans.extend(row);
            spans.push(Span::raw(" ".repeat(pad)));
            spans.push(Span::styled(" │", self.border));
            out.push(Line::from(spans));
        }
        out.push(Line::from(Span::styled(
            format!("╰{}╯", "─".repeat(inner + 2)),
            self.border,
        )));
        out
    }

    /// Top border with the title centred in it
    fn top_border(&self, inner: usize) -> Line<'static> {
        let span = inner + 2;
        let Some(title) = &self.title else {
            return Line::from(Span::styled(format!("╭{}╮", "─".repeat(span)), self.border));
        };

        let title_text = crop_str(&title.content, span.saturating_sub(2));
        let title_width = title_text.width() + 2;
        let left = (span.saturating_sub(title_width)) / 2;
        let right = span.saturating_sub(title_width + left);

        Line::from(vec![
            Span::styled(format!("╭{} ", "─".repeat(left)), self.border),
            Span::styled(title_text, title.style),
            Span::styled(format!(" {}╮", "─".repeat(right)), self.border),
        ])
    }
}

/// Fold the line's own style into each span
fn styled_spans(line: &Line<'static>) -> Vec<Span<'static>> {
    line.spans
        .iter()
        .map(|span| Span::styled(span.content.clone(), line.style.patch(span.style)))
        .collect()
}

/// Cut spans down to `width` columns, ending with an ellipsis.
fn crop(spans: &[Span<'static>], width: usize) -> Vec<Span<'static>> {
    let budget = width.saturating_sub(ELLIPSIS.width());
    let mut used = 0;
    let mut out = Vec::new();
    let mut last_style = Style::default();

    for span in spans {
        last_style = span.style;
        let remaining = budget - used;
        if span.content.width() <= remaining {
            used += span.content.width();
            out.push(span.clone());
            continue;
        }
        let cut = crop_str(&span.content, remaining);
        used += cut.width();
        if !cut.is_empty() {
            out.push(Span::styled(cut, span.style));
        }
        break;
    }

    out.push(Span::styled(ELLIPSIS, last_style));
    out
}

/// Longest prefix of `text` that fits in `width` columns.
fn crop_str(text: &str, width: usize) -> String {
    let mut used = 0;
    text.chars()
        .take_while(|ch| {
            used += unicode_width::UnicodeWidthChar::width(*ch).unwrap_or(0);
            used <= width
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plain(lines: &[Line<'_>]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect()
    }

    #[test]
    fn fits_to_content() {
        let panel = Panel::new(vec![Line::from("abc"), Line::from("a")]);
        assert_eq!(
            plain(&panel.render(80)),
            ["╭─────╮", "│ abc │", "│ a   │", "╰─────╯"]
        );
    }

    #[test]
    fn title_is_centred() {
        let panel = Panel::new(vec![Line::from("0123456789")]).title(Span::raw("toc"));
        let lines = plain(&panel.render(80));
        assert_eq!(lines[0], "╭─── toc ────╮");
        assert_eq!(lines[1], "│ 0123456789 │");
    }

    #[test]
    fn wide_title_widens_panel() {
        let panel = Panel::new(vec![Line::from("x")]).title(Span::raw("front-matter"));
        let lines = plain(&panel.render(80));
        assert_eq!(lines[0], "╭─ front-matter ─╮");
        assert_eq!(lines[1], "│ x              │");
    }

    #[test]
    fn long_lines_are_cropped() {
        let panel = Panel::new(vec![Line::from("abcdefghij")]);
        let lines = plain(&panel.render(10));
        assert_eq!(lines[1], "│ abcde… │");
    }

    #[test]
    fn long_lines_wrap_when_asked() {
        let panel = Panel::new(vec![Line::from("aaa bbb ccc")]).wrap(true);
        let lines = plain(&panel.render(11));
        assert_eq!(lines[1..4], ["│ aaa bbb │", "│ ccc     │", "╰─────────╯"]);
    }

    #[test]
    fn every_row_has_same_width() {
        let panel = Panel::new(vec![Line::from("• Hi"), Line::from("  • nested entry")])
            .title(Span::raw("Table of Contents"));
        let widths: Vec<usize> = plain(&panel.render(80)).iter().map(|l| l.width()).collect();
        assert!(widths.windows(2).all(|w| w[0] == w[1]), "{widths:?}");
    }
}
