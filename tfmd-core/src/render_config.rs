//! The resolved settings for one render, built once from CLI input and config

use crate::pager::PagingDecision;
use crate::theme::{CodeTheme, ThemePreset, ThemeSelection};

/// Width used when no override is given and stdout is not a terminal
pub const FALLBACK_WIDTH: u16 = 80;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderConfig {
    pub width: u16,
    pub soft_wrap: bool,
    pub show_toc: bool,
    pub show_front_matter: bool,
    pub theme: ThemeSelection,
    pub paging: PagingDecision,
}

impl RenderConfig {
    pub fn preset(&self) -> Option<ThemePreset> {
        self.theme.preset
    }

    pub fn code_theme(&self) -> &CodeTheme {
        &self.theme.code_theme
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: FALLBACK_WIDTH,
            soft_wrap: false,
            show_toc: false,
            show_front_matter: false,
            theme: crate::theme::resolve_theme(ThemePreset::Default, false, None),
            paging: PagingDecision::NoPaging,
        }
    }
}
