//! Dashboard rendering.
//!
//! Every section renders to a list of styled [`Line`]s. One-shot mode prints
//! those lines once ([`output`]); watch mode hands them to a ratatui frame
//! ([`draw`]), whose buffer diffing rewrites only the cells that changed, so
//! the display updates in place without clearing the screen.

pub mod activity;
pub mod common;
pub mod output;
pub mod peers;
pub mod queues;
pub mod summary;
pub mod theme;

use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub use theme::Theme;

use crate::app::App;
use crate::data::{Event, QueueActivity, Snapshot, Summary, Thresholds};

/// Minimum terminal size for a usable watch-mode frame.
const MIN_WIDTH: u16 = 40;
const MIN_HEIGHT: u16 = 6;

/// Borrowed view of everything one frame shows.
#[derive(Debug)]
pub struct DashboardView<'a> {
    pub snapshot: &'a Snapshot,
    pub summary: &'a Summary,
    pub activity: &'a [QueueActivity],
    /// Most recent last.
    pub events: Vec<&'a Event>,
    pub thresholds: &'a Thresholds,
}

/// Lay out the dashboard body: summary box, optional resource box, queue
/// cards, consumers, connections, then recent activity.
pub fn render(view: &DashboardView<'_>, theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = summary::summary_box(view.summary, theme);
    if let Some(resources) = &view.snapshot.resources {
        lines.extend(summary::resource_box(resources, theme));
    }
    lines.push(Line::default());

    lines.extend(queues::queue_section(
        &view.snapshot.queues,
        view.activity,
        view.thresholds,
        theme,
    ));
    lines.extend(peers::consumer_section(&view.snapshot.consumers, theme));
    lines.extend(peers::connection_section(&view.snapshot.connections, theme));
    lines.extend(activity::activity_section(&view.events, theme));
    lines
}

/// Body lines for the app's current state.
pub fn body_lines(app: &App) -> Vec<Line<'static>> {
    match app.dashboard() {
        Some(view) => render(&view, &app.theme),
        None => {
            let message = match &app.last_error {
                Some(err) => format!("No data yet: {}", err),
                None => "Waiting for first snapshot...".to_string(),
            };
            vec![Line::from(Span::styled(message, app.theme.muted_style()))]
        }
    }
}

/// Header plus body, as printed by one-shot mode.
pub fn frame_lines(app: &App) -> Vec<Line<'static>> {
    let mut lines = vec![common::header_line(app), Line::default()];
    lines.extend(body_lines(app));
    lines
}

/// Draw one watch-mode frame: header, scrollable body, status bar.
///
/// Clamps `app.scroll` so the last body line can reach the bottom of the
/// view but not scroll past it.
pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    if area.width < MIN_WIDTH || area.height < MIN_HEIGHT {
        let msg = format!("Terminal too small ({}x{})", area.width, area.height);
        let paragraph = Paragraph::new(msg)
            .alignment(Alignment::Center)
            .style(Style::default().fg(app.theme.warning));
        let centered = Rect::new(area.x, area.y + area.height / 2, area.width, 1);
        frame.render_widget(paragraph, centered);
        return;
    }

    let chunks = Layout::vertical([
        Constraint::Length(1), // Header
        Constraint::Min(1),    // Dashboard
        Constraint::Length(1), // Status bar
    ])
    .split(area);

    let body = body_lines(app);
    let total = u16::try_from(body.len()).unwrap_or(u16::MAX);
    app.scroll = app.scroll.min(total.saturating_sub(chunks[1].height));

    frame.render_widget(Paragraph::new(common::header_line(app)), chunks[0]);
    frame.render_widget(Paragraph::new(body).scroll((app.scroll, 0)), chunks[1]);
    frame.render_widget(Paragraph::new(common::status_line(app)), chunks[2]);
}
