//! Writing styled lines to a byte stream as ANSI escape sequences

use crossterm::{
    queue,
    style::{
        Attribute, Color as CtColor, Print, ResetColor, SetAttribute, SetBackgroundColor,
        SetForegroundColor,
    },
};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use std::io::{self, Write};

/// Write `lines`, one per row. Without `color` only the text is written.
pub fn write_lines<W: Write>(out: &mut W, lines: &[Line<'_>], color: bool) -> io::Result<()> {
    for line in lines {
        for span in &line.spans {
            if color {
                let style = line.style.patch(span.style);
                apply_style(out, style)?;
                queue!(out, Print(span.content.as_ref()))?;
                if style != Style::default() {
                    queue!(out, SetAttribute(Attribute::Reset), ResetColor)?;
                }
            } else {
                out.write_all(span.content.as_bytes())?;
            }
        }
        out.write_all(b"\n")?;
    }
    out.flush()
}

fn apply_style<W: Write>(out: &mut W, style: Style) -> io::Result<()> {
    if let Some(fg) = style.fg.and_then(to_crossterm_color) {
        queue!(out, SetForegroundColor(fg))?;
    }
    if let Some(bg) = style.bg.and_then(to_crossterm_color) {
        queue!(out, SetBackgroundColor(bg))?;
    }
    for (modifier, attribute) in ATTRIBUTES {
        if style.add_modifier.contains(modifier) {
            queue!(out, SetAttribute(attribute))?;
        }
    }
    Ok(())
}

const ATTRIBUTES: [(Modifier, Attribute); 7] = [
    (Modifier::BOLD, Attribute::Bold),
    (Modifier::DIM, Attribute::Dim),
    (Modifier::ITALIC, Attribute::Italic),
    (Modifier::UNDERLINED, Attribute::Underlined),
    (Modifier::REVERSED, Attribute::Reverse),
    (Modifier::CROSSED_OUT, Attribute::CrossedOut),
    (Modifier::SLOW_BLINK, Attribute::SlowBlink),
];

/// ratatui names the bright colors `Light*`; crossterm names the dim ones `Dark*`.
fn to_crossterm_color(color: Color) -> Option<CtColor> {
    let mapped = match color {
        Color::Reset => return None,
        Color::Black => CtColor::Black,
        Color::Red => CtColor::DarkRed,
        Color::Green => CtColor::DarkGreen,
        Color::Yellow => CtColor::DarkYellow,
        Color::Blue => CtColor::DarkBlue,
        Color::Magenta => CtColor::DarkMagenta,
        Color::Cyan => CtColor::DarkCyan,
        Color::Gray => CtColor::Grey,
        Color::DarkGray => CtColor::DarkGrey,
        Color::LightRed => CtColor::Red,
        Color::LightGreen => CtColor::Green,
        Color::LightYellow => CtColor::Yellow,
        Color::LightBlue => CtColor::Blue,
        Color::LightMagenta => CtColor::Magenta,
        Color::LightCyan => CtColor::Cyan,
        Color::White => CtColor::White,
        Color::Rgb(r, g, b) => CtColor::Rgb { r, g, b },
        Color::Indexed(idx) => CtColor::AnsiValue(idx),
    };
    Some(mapped)
}
