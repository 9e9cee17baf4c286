//! Pager backends: direct output, the external line pager, and the viewer.

use anyhow::{Context, Result};
use ratatui::text::Line;
use std::io::{self, IsTerminal};
use std::process::{Child, ChildStdin, Command, Stdio};
use tfmd_core::pager::LessSetup;
use tfmd_core::PagingDecision;

use crate::output::write_lines;

/// Hint printed when the viewer backend cannot be used
pub const VIEWER_INSTALL_HINT: &str = "cargo install tfmd --features viewer";

/// Destination for rendered lines.
///
/// `emit` may be called any number of times; `finish` flushes and releases
/// whatever the backend holds. Dropping without `finish` still releases it.
pub trait Pager {
    fn emit(&mut self, lines: &[Line<'static>]) -> Result<()>;
    fn finish(self: Box<Self>) -> Result<()>;
}

/// Whether the line pager quit before reading everything
fn is_broken_pipe(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::BrokenPipe
}

/// Writes straight to stdout.
pub struct DirectPager {
    color: bool,
    closed: bool,
}

impl DirectPager {
    pub fn new(color: bool) -> Self {
        Self {
            color,
            closed: false,
        }
    }

    /// Color only when stdout is a terminal
    pub fn for_stdout() -> Self {
        Self::new(io::stdout().is_terminal())
    }
}

impl Pager for DirectPager {
    fn emit(&mut self, lines: &[Line<'static>]) -> Result<()> {
        if self.closed {
            return Ok(());
        }
        let mut out = io::stdout().lock();
        match write_lines(&mut out, lines, self.color) {
            Err(err) if is_broken_pipe(&err) => {
                log::debug!("stdout closed, dropping remaining output");
                self.closed = true;
                Ok(())
            }
            other => other.context("Failed to write to stdout"),
        }
    }

    fn finish(self: Box<Self>) -> Result<()> {
        Ok(())
    }
}

/// Streams lines into a child `less` (or whatever `PAGER` names).
pub struct LessPager {
    command_line: String,
    child: Child,
    stdin: Option<ChildStdin>,
    waited: bool,
}

impl LessPager {
    pub fn spawn(setup: &LessSetup) -> Result<Self> {
        let (program, args) = setup.command();
        let command_line = setup.command_line();
        log::debug!("spawning pager: {command_line}");

        let mut child = Command::new(&program)
            .args(&args)
            .envs(setup.env.iter())
            .stdin(Stdio::piped())
            .spawn()
            .with_context(|| format!("Failed to start pager '{command_line}'"))?;
        let stdin = child.stdin.take();

        Ok(Self {
            command_line,
            child,
            stdin,
            waited: false,
        })
    }

    fn close_and_wait(&mut self) -> Result<()> {
        // Closing stdin lets the pager see end of input
        drop(self.stdin.take());
        self.waited = true;
        let status = self.child.wait().context("Failed to wait for pager")?;
        match status.code() {
            // The shell could not run the command
            Some(127) => log::warn!("pager '{}' could not be run", self.command_line),
            _ if !status.success() => log::debug!("pager exited with {status}"),
            _ => {}
        }
        Ok(())
    }
}

impl Pager for LessPager {
    fn emit(&mut self, lines: &[Line<'static>]) -> Result<()> {
        let Some(stdin) = self.stdin.as_mut() else {
            return Ok(());
        };
        match write_lines(stdin, lines, true) {
            Err(err) if is_broken_pipe(&err) => {
                log::debug!("pager closed its input");
                self.stdin = None;
                Ok(())
            }
            other => other.context("Failed to write to pager"),
        }
    }

    fn finish(mut self: Box<Self>) -> Result<()> {
        self.close_and_wait()
    }
}

impl Drop for LessPager {
    fn drop(&mut self) {
        if !self.waited {
            let _ = self.close_and_wait();
        }
    }
}

/// Buffers everything, then shows it in the full-screen viewer on `finish`.
#[cfg(feature = "viewer")]
pub struct ViewerPager {
    title: String,
    lines: Vec<Line<'static>>,
}

#[cfg(feature = "viewer")]
impl ViewerPager {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            lines: Vec::new(),
        }
    }
}

#[cfg(feature = "viewer")]
impl Pager for ViewerPager {
    fn emit(&mut self, lines: &[Line<'static>]) -> Result<()> {
        self.lines.extend_from_slice(lines);
        Ok(())
    }

    fn finish(self: Box<Self>) -> Result<()> {
        crate::viewer::run(&self.lines, &self.title)
    }
}

/// Whether the viewer backend can run here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerAvailability {
    Available,
    /// Built without the `viewer` feature
    NotCompiled,
    /// stdout is not an interactive terminal
    NoTerminal,
}

impl ViewerAvailability {
    /// Message for the user when the viewer cannot be used
    pub fn message(self) -> Option<String> {
        match self {
            ViewerAvailability::Available => None,
            ViewerAvailability::NotCompiled => Some(format!(
                "The tui pager backend is not available in this build.\n\
                 Install it with: {VIEWER_INSTALL_HINT}"
            )),
            ViewerAvailability::NoTerminal => Some(
                "The tui pager backend needs an interactive terminal.\n\
                 Use --backend less or --pager never when piping."
                    .to_string(),
            ),
        }
    }
}

/// Check whether the viewer can run, given whether we are on a terminal.
pub fn viewer_availability(interactive: bool) -> ViewerAvailability {
    if !cfg!(feature = "viewer") {
        ViewerAvailability::NotCompiled
    } else if !interactive {
        ViewerAvailability::NoTerminal
    } else {
        ViewerAvailability::Available
    }
}

/// Open the backend the paging decision asks for.
///
/// A line pager that cannot be started degrades to direct output.
pub fn open_pager(decision: &PagingDecision, title: &str) -> Result<Box<dyn Pager>> {
    match decision {
        PagingDecision::NoPaging => Ok(Box::new(DirectPager::for_stdout())),
        PagingDecision::Less(setup) => match LessPager::spawn(setup) {
            Ok(pager) => Ok(Box::new(pager)),
            Err(err) => {
                log::warn!("{err:#}; writing to stdout instead");
                Ok(Box::new(DirectPager::new(true)))
            }
        },
        PagingDecision::Viewer => open_viewer(title),
    }
}

#[cfg(feature = "viewer")]
fn open_viewer(title: &str) -> Result<Box<dyn Pager>> {
    Ok(Box::new(ViewerPager::new(title)))
}

#[cfg(not(feature = "viewer"))]
fn open_viewer(_title: &str) -> Result<Box<dyn Pager>> {
    anyhow::bail!(
        "{}",
        ViewerAvailability::NotCompiled
            .message()
            .unwrap_or_default()
    )
}
