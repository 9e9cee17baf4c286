//! Style presets and code-block palette resolution.
//!
//! The prose theme and the code palette are separate axes: a dark preset can be
//! combined with a light code palette and vice versa.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Built-in style presets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemePreset {
    #[default]
    Default,
    #[serde(alias = "light")]
    GithubLight,
    #[serde(alias = "dark")]
    GithubDark,
}

impl ThemePreset {
    pub const ALL: [ThemePreset; 3] = [
        ThemePreset::Default,
        ThemePreset::GithubLight,
        ThemePreset::GithubDark,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemePreset::Default => "default",
            ThemePreset::GithubLight => "github-light",
            ThemePreset::GithubDark => "github-dark",
        }
    }

    pub fn is_light(&self) -> bool {
        matches!(self, ThemePreset::GithubLight)
    }

    /// Palette used for code blocks when none is given explicitly.
    pub fn default_code_theme(&self) -> CodeTheme {
        if self.is_light() {
            CodeTheme::new(CodeTheme::GITHUB_LIGHT)
        } else {
            CodeTheme::new(CodeTheme::GITHUB_DARK)
        }
    }
}

impl fmt::Display for ThemePreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name of a syntax-highlighting palette for fenced code blocks.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CodeTheme(String);

impl CodeTheme {
    pub const GITHUB_DARK: &'static str = "github-dark";
    pub const GITHUB_LIGHT: &'static str = "github-light";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CodeTheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of theme resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThemeSelection {
    /// `None` when styling is disabled; the renderer then uses its own defaults
    pub preset: Option<ThemePreset>,
    pub code_theme: CodeTheme,
}

/// Resolve the prose preset and the code palette.
///
/// An explicit code palette is used verbatim. Otherwise it follows the preset,
/// including when styling is disabled.
pub fn resolve_theme(
    preset: ThemePreset,
    no_style: bool,
    code_theme: Option<&str>,
) -> ThemeSelection {
    let code_theme = match code_theme {
        Some(name) => CodeTheme::new(name),
        None => preset.default_code_theme(),
    };

    log::debug!(
        "theme: preset={} styled={} code_theme={}",
        preset,
        !no_style,
        code_theme
    );

    ThemeSelection {
        preset: (!no_style).then_some(preset),
        code_theme,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::de::{value, IntoDeserializer};

    fn preset_named(name: &str) -> Result<ThemePreset, value::Error> {
        ThemePreset::deserialize(name.into_deserializer())
    }

    fn by_name(name: &str, no_style: bool, code: Option<&str>) -> ThemeSelection {
        let preset = preset_named(name).expect("known preset");
        resolve_theme(preset, no_style, code)
    }

    #[test]
    fn aliases_resolve_identically() {
        assert_eq!(by_name("light", false, None), by_name("github-light", false, None));
        assert_eq!(by_name("dark", false, None), by_name("github-dark", false, None));
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert!(preset_named("solarized").is_err());
        assert!(preset_named("Light").is_err());
    }

    #[test]
    fn no_style_disables_every_preset() {
        for name in ["default", "light", "dark", "github-dark", "github-light"] {
            assert_eq!(by_name(name, true, None).preset, None, "{name}");
        }
    }

    #[test]
    fn code_theme_follows_light_family() {
        assert_eq!(by_name("light", false, None).code_theme.name(), "github-light");
        assert_eq!(
            by_name("github-light", false, None).code_theme.name(),
            "github-light"
        );
        assert_eq!(by_name("default", false, None).code_theme.name(), "github-dark");
        assert_eq!(by_name("dark", false, None).code_theme.name(), "github-dark");
    }

    #[test]
    fn code_theme_derived_even_without_style() {
        assert_eq!(by_name("light", true, None).code_theme.name(), "github-light");
    }

    #[test]
    fn explicit_code_theme_wins() {
        let selection = by_name("dark", false, Some("github-light"));
        assert_eq!(selection.preset, Some(ThemePreset::GithubDark));
        assert_eq!(selection.code_theme.name(), "github-light");

        let selection = by_name("light", true, Some("monokai"));
        assert_eq!(selection.code_theme.name(), "monokai");
    }

    #[test]
    fn serde_accepts_aliases() {
        #[derive(Deserialize)]
        struct Wrapper {
            theme: ThemePreset,
        }
        let parsed: Wrapper = toml::from_str("theme = \"light\"").expect("parse");
        assert_eq!(parsed.theme, ThemePreset::GithubLight);
        let parsed: Wrapper = toml::from_str("theme = \"github-dark\"").expect("parse");
        assert_eq!(parsed.theme, ThemePreset::GithubDark);
    }
}
