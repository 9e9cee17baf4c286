//! Syntax highlighting for code blocks.
//!
//! Uses syntect with its bundled syntaxes and themes. Palette names given on
//! the command line are mapped onto syntect theme names first.

use std::sync::OnceLock;

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Theme, ThemeSet};
use syntect::parsing::SyntaxSet;
use syntect::util::LinesWithEndings;
use tfmd_core::CodeTheme;

const DARK_FALLBACK: &str = "base16-ocean.dark";
const LIGHT_FALLBACK: &str = "InspiredGitHub";

/// Friendly palette names accepted by `--code-theme`
const PALETTE_ALIASES: [(&str, &str); 8] = [
    ("github-dark", "base16-ocean.dark"),
    ("github-light", "InspiredGitHub"),
    ("solarized-dark", "Solarized (dark)"),
    ("solarized-light", "Solarized (light)"),
    ("ocean-dark", "base16-ocean.dark"),
    ("ocean-light", "base16-ocean.light"),
    ("eighties", "base16-eighties.dark"),
    ("mocha", "base16-mocha.dark"),
];

fn syntax_set() -> &'static SyntaxSet {
    static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme_set() -> &'static ThemeSet {
    static THEME_SET: OnceLock<ThemeSet> = OnceLock::new();
    THEME_SET.get_or_init(ThemeSet::load_defaults)
}

/// Map a palette name to the syntect theme it stands for, if any.
pub fn syntect_theme_name(palette: &str) -> Option<&'static str> {
    if let Some((_, name)) = PALETTE_ALIASES.iter().find(|(alias, _)| *alias == palette) {
        return Some(*name);
    }

    theme_set()
        .themes
        .keys()
        .find(|name| name.as_str() == palette)
        .map(String::as_str)
}

/// Highlights code with one resolved palette.
pub struct Highlighter {
    theme: &'static Theme,
}

impl Highlighter {
    /// Unknown palettes fall back to a light or dark default.
    pub fn new(code_theme: &CodeTheme, prefer_light: bool) -> Self {
        let fallback = if prefer_light {
            LIGHT_FALLBACK
        } else {
            DARK_FALLBACK
        };

        let name = match syntect_theme_name(code_theme.name()) {
            Some(name) => name,
            None => {
                log::warn!(
                    "unknown code theme '{}', using '{}'",
                    code_theme,
                    fallback
                );
                fallback
            }
        };
        log::debug!("code theme {} -> {}", code_theme, name);

        let themes = &theme_set().themes;
        let theme = themes
            .get(name)
            .or_else(|| themes.get(fallback))
            .or_else(|| themes.values().next());

        Self {
            theme: theme.unwrap_or_else(default_theme),
        }
    }

    /// Highlight `code` as `language`; unknown languages render as plain text.
    pub fn highlight(&self, language: Option<&str>, code: &str) -> Vec<Line<'static>> {
        let syntax_set = syntax_set();
        let syntax = language
            .map(str::trim)
            .filter(|lang| !lang.is_empty())
            .and_then(|lang| {
                syntax_set
                    .find_syntax_by_token(lang)
                    .or_else(|| syntax_set.find_syntax_by_name(lang))
            });

        let Some(syntax) = syntax else {
            return code
                .lines()
                .map(|line| Line::from(line.to_string()))
                .collect();
        };

        let mut highlighter = HighlightLines::new(syntax, self.theme);
        LinesWithEndings::from(code)
            .map(|line| {
                let ranges = highlighter
                    .highlight_line(line, syntax_set)
                    .unwrap_or_default();
                let spans: Vec<Span<'static>> = ranges
                    .into_iter()
                    .filter_map(|(style, text)| {
                        let text = text.trim_end_matches(['\n', '\r']);
                        (!text.is_empty()).then(|| Span::styled(text.to_string(), to_style(style)))
                    })
                    .collect();
                Line::from(spans)
            })
            .collect()
    }
}

fn default_theme() -> &'static Theme {
    static THEME: OnceLock<Theme> = OnceLock::new();
    THEME.get_or_init(Theme::default)
}

/// Foreground and font style only; the terminal background is left alone.
fn to_style(style: syntect::highlighting::Style) -> Style {
    let fg = style.foreground;
    let mut out = Style::default().fg(Color::Rgb(fg.r, fg.g, fg.b));
    if style.font_style.contains(FontStyle::BOLD) {
        out = out.add_modifier(Modifier::BOLD);
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        out = out.add_modifier(Modifier::ITALIC);
    }
    if style.font_style.contains(FontStyle::UNDERLINE) {
        out = out.add_modifier(Modifier::UNDERLINED);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dark() -> Highlighter {
        Highlighter::new(&CodeTheme::new("github-dark"), false)
    }

    #[test]
    fn aliases_map_to_bundled_themes() {
        for (alias, _) in PALETTE_ALIASES {
            let name = syntect_theme_name(alias).expect("alias resolves");
            assert!(theme_set().themes.contains_key(name), "{alias} -> {name}");
        }
    }

    #[test]
    fn exact_syntect_names_are_accepted() {
        assert_eq!(
            syntect_theme_name("Solarized (dark)"),
            Some("Solarized (dark)")
        );
        assert_eq!(syntect_theme_name("monokai-ultra"), None);
    }

    #[test]
    fn highlight_rust_produces_colored_spans() {
        let lines = dark().highlight(Some("rust"), "fn main() {\n    let x = 1;\n}\n");

        assert_eq!(lines.len(), 3);
        let has_color = lines
            .iter()
            .flat_map(|line| line.spans.iter())
            .any(|span| span.style.fg.is_some());
        assert!(has_color);
    }

    #[test]
    fn highlight_unknown_language_falls_back_to_plain() {
        let lines = dark().highlight(Some("nope"), "just text");
        assert_eq!(lines, vec![Line::from("just text")]);
    }

    #[test]
    fn highlight_strips_line_endings() {
        let lines = dark().highlight(Some("yaml"), "title: X\r\nother: Y\n");
        assert_eq!(lines.len(), 2);
        let text: String = lines[0].spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(text, "title: X");
    }

    #[test]
    fn highlight_does_not_set_background_color() {
        let lines = dark().highlight(Some("rust"), "fn main() {}");
        let has_bg = lines
            .iter()
            .flat_map(|line| line.spans.iter())
            .any(|span| span.style.bg.is_some());
        assert!(!has_bg);
    }

    #[test]
    fn unknown_palette_still_highlights() {
        let highlighter = Highlighter::new(&CodeTheme::new("does-not-exist"), true);
        let lines = highlighter.highlight(Some("rust"), "let x = 1;");
        assert_eq!(lines.len(), 1);
    }
}
