//! Table of Contents extraction from Markdown

use crate::doc::Heading;

/// Indentation added per heading level below 1
pub const INDENT_UNIT: &str = "  ";
pub const BULLET: &str = "•";
pub const NO_HEADINGS: &str = "No headings found";

/// Extract ATX headings, one physical line at a time. `\n`, `\r\n` and a
/// lone `\r` all end a line.
///
/// Fenced code blocks are not tracked, so a `# comment` inside one is
/// reported as a heading too.
pub fn extract_headings(body: &str) -> Vec<Heading> {
    body.split(['\n', '\r'])
        .filter(|line| line.starts_with('#'))
        .filter_map(|line| {
            let (level, text) = parse_atx_heading(line)?;
            Some(Heading::new(level, text))
        })
        .collect()
}

/// Parse ATX heading (returns level and trimmed text if valid)
fn parse_atx_heading(line: &str) -> Option<(u8, &str)> {
    let hash_count = line.chars().take_while(|&c| c == '#').count();
    if hash_count == 0 || hash_count > 6 {
        return None;
    }

    // Must be followed by whitespace, then some text
    let rest = &line[hash_count..];
    if !rest.starts_with(char::is_whitespace) {
        return None;
    }

    let text = rest.trim();
    if text.is_empty() {
        return None;
    }

    Some((hash_count as u8, text))
}

/// One row of the table of contents display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TocRow {
    Entry { depth: usize, text: String },
    /// Shown instead of entries when the document has no headings
    Empty,
}

impl TocRow {
    /// Indentation plus bullet marker, e.g. `"  • "` for depth 1.
    pub fn prefix(&self) -> String {
        match self {
            TocRow::Entry { depth, .. } => format!("{}{} ", INDENT_UNIT.repeat(*depth), BULLET),
            TocRow::Empty => String::new(),
        }
    }

    pub fn text(&self) -> &str {
        match self {
            TocRow::Entry { text, .. } => text,
            TocRow::Empty => NO_HEADINGS,
        }
    }
}

/// Turn the heading sequence into display rows. Never returns an empty list.
pub fn build_toc(headings: &[Heading]) -> Vec<TocRow> {
    if headings.is_empty() {
        return vec![TocRow::Empty];
    }

    headings
        .iter()
        .map(|heading| TocRow::Entry {
            depth: usize::from(heading.level.saturating_sub(1)),
            text: heading.text.clone(),
        })
        .collect()
}
