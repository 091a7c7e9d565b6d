//! Building blocks shared by every section: box borders, padded box rows,
//! section rules, and the header and status bars.

use chrono::Local;
use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use super::Theme;
use crate::app::App;
use crate::data::format::format_count;

/// Width of a summary box between its vertical borders.
pub const BOX_WIDTH: usize = 65;

pub fn box_top(theme: &Theme) -> Line<'static> {
    box_rule('╔', '╗', theme)
}

pub fn box_divider(theme: &Theme) -> Line<'static> {
    box_rule('╠', '╣', theme)
}

pub fn box_bottom(theme: &Theme) -> Line<'static> {
    box_rule('╚', '╝', theme)
}

fn box_rule(left: char, right: char, theme: &Theme) -> Line<'static> {
    Line::from(Span::styled(
        format!("{}{}{}", left, "═".repeat(BOX_WIDTH), right),
        theme.border_style(),
    ))
}

/// A box row: `║  <content><padding>║`, padded to [`BOX_WIDTH`] by display width.
///
/// Content wider than the box is not truncated; the right border moves out.
pub fn boxed(spans: Vec<Span<'static>>, theme: &Theme) -> Line<'static> {
    let content = Line::from(spans);
    let pad = BOX_WIDTH.saturating_sub(content.width() + 2);

    let mut row = Vec::with_capacity(content.spans.len() + 4);
    row.push(Span::styled("║", theme.border_style()));
    row.push(Span::raw("  "));
    row.extend(content.spans);
    row.push(Span::raw(" ".repeat(pad)));
    row.push(Span::styled("║", theme.border_style()));
    Line::from(row)
}

/// A bold label followed by a plain value, with trailing space for columns.
pub fn field(label: &str, value: String, width: usize) -> Vec<Span<'static>> {
    let used = label.chars().count() + 2 + value.chars().count();
    vec![
        Span::styled(format!("{}: ", label), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(value),
        Span::raw(" ".repeat(width.saturating_sub(used))),
    ]
}

/// Section heading: `━━━ TITLE ━━━`.
pub fn section(title: impl Into<String>, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled("━━━ ", theme.border_style()),
        Span::styled(title.into(), theme.header),
        Span::styled(" ━━━", theme.border_style()),
    ])
}

/// Top line of a frame: broker identity, source, and last update time.
///
/// When the last refresh failed the line ends with a STALE marker carrying
/// the error so the frame below is never mistaken for fresh data.
pub fn header_line(app: &App) -> Line<'static> {
    let theme = &app.theme;
    let mut spans = vec![Span::styled(
        " QUEUEWATCH ",
        Style::default().add_modifier(Modifier::BOLD),
    )];

    match app.monitor.latest() {
        Some(snapshot) => {
            if let Some(broker) = &snapshot.broker {
                let mut identity = broker.product.clone();
                if !broker.version.is_empty() {
                    identity.push(' ');
                    identity.push_str(&broker.version);
                }
                if !broker.cluster.is_empty() {
                    identity.push_str(&format!(" @ {}", broker.cluster));
                }
                spans.push(Span::raw("│ "));
                spans.push(Span::styled(identity, Style::default().fg(theme.highlight)));
                spans.push(Span::raw(" "));
            }
            spans.push(Span::raw("│ "));
            spans.push(Span::raw(format!(
                "Updated {}",
                snapshot.taken_at.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S")
            )));
        }
        None => {
            spans.push(Span::raw("│ "));
            spans.push(Span::styled(
                format!("Waiting for {}", app.source_description()),
                theme.muted_style(),
            ));
        }
    }

    if let Some(err) = &app.last_error {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            format!("│ ⚠ STALE: {} ", err),
            Style::default().fg(theme.warning).add_modifier(Modifier::BOLD),
        ));
    }

    Line::from(spans)
}

/// Bottom line in watch mode: cycle counter and key hints.
pub fn status_line(app: &App) -> Line<'static> {
    let mut text = format!(" {} │ cycle {}", app.source_description(), format_count(app.cycles));
    if let Some(limit) = app.iterations {
        text.push_str(&format!("/{}", limit));
    }
    if let Some(at) = app.last_attempt {
        text.push_str(&format!(" │ polled {}", at.format("%H:%M:%S")));
    }
    text.push_str(" │ r:refresh ↑↓ PgUp PgDn:scroll q:quit");
    Line::from(Span::styled(text, app.theme.muted_style()))
}
