//! tfmd TUI - terminal rendering and paging
//!
//! This crate contains all ratatui/crossterm integration:
//! - Markdown rendering into styled lines
//! - Panels for the table of contents and front matter
//! - Syntax highlighting for code blocks
//! - ANSI output, the line pager and the full-screen viewer
//! - Theme styles

pub mod highlight;
pub mod markdown;
pub mod output;
pub mod pager;
pub mod panel;
pub mod render;
pub mod theme;
pub mod wrap;

#[cfg(feature = "viewer")]
pub mod input;
#[cfg(feature = "viewer")]
pub mod terminal;
#[cfg(feature = "viewer")]
pub mod viewer;

// Re-export main types
pub use highlight::Highlighter;
pub use markdown::{render_markdown, RenderOptions};
pub use pager::{open_pager, viewer_availability, Pager, ViewerAvailability};
pub use render::{render_document, render_paged};
pub use theme::Theme;
