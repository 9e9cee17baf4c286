//! Word wrapping of styled spans by display width

use ratatui::style::Style;
use ratatui::text::Span;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Display width of a run of spans
pub fn spans_width(spans: &[Span<'_>]) -> usize {
    spans.iter().map(|span| span.content.width()).sum()
}

/// Greedy word wrap. Whitespace at a break is dropped; words wider than
/// `width` are split by character. Always returns at least one (possibly
/// empty) row.
pub fn wrap_spans(spans: &[Span<'static>], width: usize) -> Vec<Vec<Span<'static>>> {
    let width = width.max(1);
    let mut rows: Vec<Vec<Span<'static>>> = vec![Vec::new()];
    let mut row_width = 0;

    for (token, style) in tokens(spans) {
        let is_space = token.starts_with(char::is_whitespace);
        let token_width = token.width();

        if is_space {
            if row_width > 0 && row_width + token_width <= width {
                push(rows.last_mut(), token, style);
                row_width += token_width;
            } else if row_width > 0 {
                rows.push(Vec::new());
                row_width = 0;
            }
            continue;
        }

        if row_width + token_width > width && row_width > 0 {
            trim_trailing_space(rows.last_mut());
            rows.push(Vec::new());
            row_width = 0;
        }

        if token_width <= width {
            push(rows.last_mut(), token, style);
            row_width += token_width;
            continue;
        }

        // Hard-split an overlong word
        for ch in token.chars() {
            let ch_width = ch.width().unwrap_or(0);
            if row_width + ch_width > width && row_width > 0 {
                rows.push(Vec::new());
                row_width = 0;
            }
            push(rows.last_mut(), ch, style);
            row_width += ch_width;
        }
    }

    trim_trailing_space(rows.last_mut());
    rows
}

/// Split spans into alternating whitespace / non-whitespace tokens.
fn tokens(spans: &[Span<'static>]) -> Vec<(String, Style)> {
    let mut out = Vec::new();
    for span in spans {
        let mut current = String::new();
        let mut current_space = None;
        for ch in span.content.chars() {
            let space = ch.is_whitespace();
            if current_space.is_some_and(|s| s != space) {
                out.push((std::mem::take(&mut current), span.style));
            }
            current_space = Some(space);
            current.push(ch);
        }
        if !current.is_empty() {
            out.push((current, span.style));
        }
    }
    out
}

fn push(row: Option<&mut Vec<Span<'static>>>, text: impl ToString, style: Style) {
    let Some(row) = row else {
        return;
    };
    let text = text.to_string();
    match row.last_mut() {
        Some(last) if last.style == style => last.content.to_mut().push_str(&text),
        _ => row.push(Span::styled(text, style)),
    }
}

fn trim_trailing_space(row: Option<&mut Vec<Span<'static>>>) {
    let Some(row) = row else {
        return;
    };
    while let Some(last) = row.last_mut() {
        let trimmed = last.content.trim_end().len();
        if trimmed == 0 {
            row.pop();
        } else {
            last.content.to_mut().truncate(trimmed);
            break;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Modifier;

    fn text(row: &[Span<'_>]) -> String {
        row.iter().map(|s| s.content.as_ref()).collect()
    }

    fn rows(spans: &[Span<'static>], width: usize) -> Vec<String> {
        wrap_spans(spans, width).iter().map(|r| text(r)).collect()
    }

    #[test]
    fn short_line_is_untouched() {
        assert_eq!(rows(&[Span::raw("hello world")], 20), ["hello world"]);
    }

    #[test]
    fn breaks_at_whitespace() {
        assert_eq!(
            rows(&[Span::raw("the quick brown fox")], 10),
            ["the quick", "brown fox"]
        );
    }

    #[test]
    fn splits_overlong_words() {
        assert_eq!(rows(&[Span::raw("abcdefghij")], 4), ["abcd", "efgh", "ij"]);
    }

    #[test]
    fn keeps_styles_across_breaks() {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let wrapped = wrap_spans(
            &[Span::raw("plain "), Span::styled("bold words here", bold)],
            11,
        );
        assert_eq!(wrapped.len(), 2);
        assert_eq!(text(&wrapped[0]), "plain bold");
        assert_eq!(wrapped[0][1].style, bold);
        assert_eq!(text(&wrapped[1]), "words here");
        assert!(wrapped[1].iter().all(|s| s.style == bold));
    }

    #[test]
    fn wide_characters_count_double() {
        assert_eq!(rows(&[Span::raw("日本語 日本語")], 6), ["日本語", "日本語"]);
    }

    #[test]
    fn empty_input_gives_one_empty_row() {
        assert_eq!(wrap_spans(&[], 10), vec![Vec::<Span>::new()]);
    }

    #[test]
    fn width_counts_display_columns() {
        assert_eq!(spans_width(&[Span::raw("ab"), Span::raw("日")]), 4);
    }
}
