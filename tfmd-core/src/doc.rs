//! Document model: the raw Markdown text and where it came from

use anyhow::{Context, Result};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// A heading in the markdown document
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Heading {
    pub level: u8,
    pub text: String,
}

impl Heading {
    pub fn new(level: u8, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

/// The input document. Immutable once read.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Document {
    /// Source file, `None` when read from a stream
    pub path: Option<PathBuf>,
    pub text: String,
}

impl Document {
    /// Wrap already-loaded text
    pub fn from_text(text: impl Into<String>, path: Option<PathBuf>) -> Self {
        Self {
            path,
            text: text.into(),
        }
    }

    /// Load a document from a file path
    pub fn load(path: &Path) -> Result<Self> {
        let bytes =
            fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))?;

        Ok(Self {
            path: Some(path.to_path_buf()),
            text: decode_lossy(bytes),
        })
    }

    /// Read a whole document from a stream (usually stdin)
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .context("Failed to read markdown from stdin")?;

        Ok(Self {
            path: None,
            text: decode_lossy(bytes),
        })
    }

    /// Display name used in titles and log lines
    pub fn display_name(&self) -> String {
        self.path
            .as_deref()
            .and_then(|p| p.file_name())
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "<stdin>".to_string())
    }
}

/// Invalid UTF-8 is not fatal: undecodable sequences become U+FFFD.
fn decode_lossy(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(err) => {
            log::debug!(
                "input is not valid UTF-8 (at byte {}), decoding lossily",
                err.utf8_error().valid_up_to()
            );
            String::from_utf8_lossy(err.as_bytes()).into_owned()
        }
    }
}
