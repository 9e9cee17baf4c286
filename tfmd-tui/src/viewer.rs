//! Full-screen scrolling viewer, the `tui` pager backend.

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyEventKind};
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;
use std::ops::Range;
use std::time::Duration;

use crate::input::{self, Action, CONTROLS};
use crate::terminal::{TerminalGuard, Tui};

/// Rows taken by the controls header and the status line
const CHROME_ROWS: u16 = 2;

/// Scroll position over a fixed number of lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    height: u16,
    offset: usize,
    total_lines: usize,
}

impl Viewport {
    pub const fn new(height: u16, total_lines: usize) -> Self {
        Self {
            height,
            offset: 0,
            total_lines,
        }
    }

    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Lines currently on screen, clamped to the document
    pub fn visible_range(&self) -> Range<usize> {
        let start = self.offset.min(self.total_lines);
        let end = (self.offset + self.height as usize).min(self.total_lines);
        start..end
    }

    /// Position as a percentage, 100 when everything fits
    pub fn scroll_percent(&self) -> u8 {
        let max_offset = self.max_offset();
        if max_offset == 0 {
            return 100;
        }
        ((self.offset * 100 + max_offset / 2) / max_offset).min(100) as u8
    }

    pub fn scroll_up(&mut self, n: usize) {
        self.offset = self.offset.saturating_sub(n);
    }

    pub fn scroll_down(&mut self, n: usize) {
        self.offset = self.offset.saturating_add(n).min(self.max_offset());
    }

    pub fn page_up(&mut self) {
        self.scroll_up(self.page());
    }

    pub fn page_down(&mut self) {
        self.scroll_down(self.page());
    }

    pub fn go_to_top(&mut self) {
        self.offset = 0;
    }

    pub fn go_to_bottom(&mut self) {
        self.offset = self.max_offset();
    }

    pub fn resize(&mut self, height: u16) {
        self.height = height;
        self.offset = self.offset.min(self.max_offset());
    }

    /// Apply a movement action; returns false for actions that are not movements
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::LineUp => self.scroll_up(1),
            Action::LineDown => self.scroll_down(1),
            Action::PageUp => self.page_up(),
            Action::PageDown => self.page_down(),
            Action::Top => self.go_to_top(),
            Action::Bottom => self.go_to_bottom(),
            Action::Scroll(n) if n < 0 => self.scroll_up(n.unsigned_abs()),
            Action::Scroll(n) => self.scroll_down(n.unsigned_abs()),
            Action::Quit | Action::None => return false,
        }
        true
    }

    fn page(&self) -> usize {
        usize::from(self.height.max(1))
    }

    fn max_offset(&self) -> usize {
        self.total_lines.saturating_sub(self.height as usize)
    }
}

/// Show `lines` until the user quits. The terminal is restored on every path.
pub fn run(lines: &[Line<'static>], title: &str) -> Result<()> {
    let mut guard = TerminalGuard::enter().context("Failed to initialize terminal")?;
    let result = run_loop(guard.terminal(), lines, title);
    guard.leave().context("Failed to restore terminal")?;
    result
}

fn run_loop(terminal: &mut Tui, lines: &[Line<'static>], title: &str) -> Result<()> {
    let height = terminal.size()?.height.saturating_sub(CHROME_ROWS);
    let mut viewport = Viewport::new(height, lines.len());

    loop {
        terminal
            .draw(|frame| draw(frame, lines, title, &viewport))
            .context("Failed to draw frame")?;

        if !event::poll(Duration::from_millis(250)).context("Failed to poll events")? {
            continue;
        }
        let action = match event::read().context("Failed to read event")? {
            // Only handle key press events, ignore release
            Event::Key(key) if key.kind == KeyEventKind::Press => input::action_for_key(key),
            Event::Mouse(mouse) => input::action_for_mouse(mouse),
            Event::Resize(_, rows) => {
                viewport.resize(rows.saturating_sub(CHROME_ROWS));
                Action::None
            }
            _ => Action::None,
        };

        if action == Action::Quit {
            log::debug!("viewer quit at offset {}", viewport.offset());
            return Ok(());
        }
        viewport.apply(action);
    }
}

fn draw(frame: &mut Frame, lines: &[Line<'static>], title: &str, viewport: &Viewport) {
    let [header, body, status] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let dim = Style::default().add_modifier(Modifier::DIM);
    frame.render_widget(Paragraph::new(Line::from(Span::styled(CONTROLS, dim))), header);

    let visible = lines[viewport.visible_range()].to_vec();
    frame.render_widget(Paragraph::new(visible), body);

    let status_line = Line::from(vec![
        Span::styled(format!(" {title} "), Style::default().add_modifier(Modifier::REVERSED)),
        Span::styled(format!(" {}%", viewport.scroll_percent()), dim),
    ]);
    frame.render_widget(Paragraph::new(status_line), status);
}
