//! tfmd core - document model, front matter, headings and paging policy
//!
//! This crate contains the logic of tfmd that is independent of the terminal:
//! - Document loading with lossy decoding
//! - Front matter splitting
//! - Heading extraction and TOC rows
//! - Theme preset and code palette resolution
//! - Paging policy and pager environment defaults
//! - Configuration management

pub mod config;
pub mod doc;
pub mod front_matter;
pub mod pager;
pub mod render_config;
pub mod theme;
pub mod toc;

// Re-export commonly used types
pub use config::Config;
pub use doc::{Document, Heading};
pub use front_matter::{split_front_matter, Split};
pub use pager::{PagerBackend, PagerMode, PagerOptions, PagingDecision};
pub use render_config::RenderConfig;
pub use theme::{resolve_theme, CodeTheme, ThemePreset, ThemeSelection};
pub use toc::{build_toc, extract_headings, TocRow};
