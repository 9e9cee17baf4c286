//! Front matter detection helpers.

use regex::Regex;
use std::sync::OnceLock;

/// A leading YAML block: `---` line, content, `---` line, then a line break.
/// Blank lines directly after the closing marker belong to the block.
const YAML_FRONT_MATTER: &str = r"(?s)\A\x{FEFF}?\s*---\r?\n.*?\n---\s*\n";

fn front_matter_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(YAML_FRONT_MATTER).expect("front matter pattern is valid"))
}

/// A document split into its optional front matter and the remaining body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Split<'a> {
    /// The matched block, both delimiter lines included
    pub front_matter: Option<&'a str>,
    pub body: &'a str,
}

impl<'a> Split<'a> {
    /// Front matter with surrounding whitespace removed, ready for display.
    pub fn front_matter_trimmed(&self) -> Option<&'a str> {
        self.front_matter.map(str::trim)
    }
}

/// Detects front matter at the top of a document and splits it off.
///
/// An unterminated block is not front matter; the whole input is returned as body.
pub fn split_front_matter(text: &str) -> Split<'_> {
    match front_matter_regex().find(text) {
        Some(m) => Split {
            front_matter: Some(m.as_str()),
            body: &text[m.end()..],
        },
        None => Split {
            front_matter: None,
            body: text,
        },
    }
}
