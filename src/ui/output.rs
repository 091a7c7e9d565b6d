//! Printing a frame to a plain writer for one-shot mode.

use std::io::{self, Write};

use crossterm::{
    queue,
    style::{Attribute, Color as TermColor, ContentStyle, PrintStyledContent, StyledContent},
};
use ratatui::{
    style::{Color, Modifier, Style},
    text::Line,
};

/// Write `lines` to `out`, one per row.
///
/// With `styled` set, span colours and bold/dim are emitted as ANSI
/// sequences; otherwise only the text is written (for pipes and files).
pub fn write_lines<W: Write>(out: &mut W, lines: &[Line<'_>], styled: bool) -> io::Result<()> {
    for line in lines {
        for span in &line.spans {
            if styled && span.style != Style::default() {
                queue!(
                    out,
                    PrintStyledContent(StyledContent::new(
                        content_style(span.style),
                        span.content.as_ref()
                    ))
                )?;
            } else {
                out.write_all(span.content.as_bytes())?;
            }
        }
        writeln!(out)?;
    }
    out.flush()
}

fn content_style(style: Style) -> ContentStyle {
    let mut content = ContentStyle::new();
    content.foreground_color = style.fg.map(term_color);
    content.background_color = style.bg.map(term_color);
    if style.add_modifier.contains(Modifier::BOLD) {
        content.attributes.set(Attribute::Bold);
    }
    if style.add_modifier.contains(Modifier::DIM) {
        content.attributes.set(Attribute::Dim);
    }
    content
}

fn term_color(color: Color) -> TermColor {
    match color {
        Color::Reset => TermColor::Reset,
        Color::Black => TermColor::Black,
        Color::Red => TermColor::DarkRed,
        Color::Green => TermColor::DarkGreen,
        Color::Yellow => TermColor::DarkYellow,
        Color::Blue => TermColor::DarkBlue,
        Color::Magenta => TermColor::DarkMagenta,
        Color::Cyan => TermColor::DarkCyan,
        Color::Gray => TermColor::Grey,
        Color::DarkGray => TermColor::DarkGrey,
        Color::LightRed => TermColor::Red,
        Color::LightGreen => TermColor::Green,
        Color::LightYellow => TermColor::Yellow,
        Color::LightBlue => TermColor::Blue,
        Color::LightMagenta => TermColor::Magenta,
        Color::LightCyan => TermColor::Cyan,
        Color::White => TermColor::White,
        Color::Rgb(r, g, b) => TermColor::Rgb { r, g, b },
        Color::Indexed(i) => TermColor::AnsiValue(i),
    }
}
