//! Style sets for the built-in presets

use ratatui::style::{Color, Modifier, Style};
use tfmd_core::ThemePreset;

/// Concrete styles for every semantic key the renderer uses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Theme {
    /// Heading levels 1-3; deeper levels reuse the level 3 style
    pub heading: [Style; 3],
    pub link: Style,
    pub inline_code: Style,
    pub rule: Style,
    pub toc_header: Style,
    pub toc_item: Style,
}

impl Theme {
    /// Create a theme for the given preset
    pub fn for_preset(preset: ThemePreset) -> Self {
        match preset {
            ThemePreset::Default => Self::default_preset(),
            ThemePreset::GithubLight => Self::github_light(),
            ThemePreset::GithubDark => Self::github_dark(),
        }
    }

    /// Resolve an optional preset; `None` means styling is disabled.
    pub fn resolve(preset: Option<ThemePreset>) -> Self {
        preset.map(Self::for_preset).unwrap_or_else(Self::builtin)
    }

    /// Style for a heading of any level
    pub fn heading_style(&self, level: u8) -> Style {
        let idx = usize::from(level.clamp(1, 3)) - 1;
        self.heading[idx]
    }

    /// Renderer defaults, used when custom styling is turned off
    pub fn builtin() -> Self {
        Self {
            heading: [
                Style::default().add_modifier(Modifier::BOLD),
                Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                Style::default().add_modifier(Modifier::BOLD),
            ],
            link: Style::default().fg(Color::LightBlue),
            inline_code: Style::default()
                .fg(Color::Cyan)
                .bg(Color::Black)
                .add_modifier(Modifier::BOLD),
            rule: Style::default().fg(Color::Yellow),
            toc_header: Style::default(),
            toc_item: Style::default(),
        }
    }

    /// The `default` preset: attributes only, no colors
    pub fn default_preset() -> Self {
        Self {
            heading: [
                Style::default().add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
                Style::default().add_modifier(Modifier::BOLD),
                Style::default().add_modifier(Modifier::BOLD),
            ],
            link: Style::default().add_modifier(Modifier::UNDERLINED),
            inline_code: Style::default(),
            rule: Style::default().add_modifier(Modifier::DIM),
            toc_header: Style::default().add_modifier(Modifier::BOLD),
            toc_item: Style::default().add_modifier(Modifier::DIM),
        }
    }

    /// GitHub-like dark preset
    pub fn github_dark() -> Self {
        let heading = Style::default().fg(Color::White).add_modifier(Modifier::BOLD);
        Self {
            heading: [heading; 3],
            link: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::UNDERLINED),
            inline_code: Style::default().fg(Color::White).bg(Color::Indexed(234)),
            rule: Style::default().fg(Color::Indexed(240)),
            toc_header: Style::default().add_modifier(Modifier::BOLD),
            toc_item: Style::default().add_modifier(Modifier::DIM),
        }
    }

    /// GitHub-like light preset
    pub fn github_light() -> Self {
        let heading = Style::default().fg(Color::Black).add_modifier(Modifier::BOLD);
        Self {
            heading: [heading; 3],
            link: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::UNDERLINED),
            inline_code: Style::default()
                .fg(Color::Black)
                .bg(Color::Rgb(0xf2, 0xf2, 0xf2)),
            rule: Style::default().fg(Color::Indexed(246)),
            toc_header: Style::default().add_modifier(Modifier::BOLD),
            toc_item: Style::default().add_modifier(Modifier::DIM),
        }
    }
}
