//! CONSUMERS and CONNECTIONS sections.

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use super::common::section;
use super::Theme;
use crate::data::{ConnectionInfo, ConsumerInfo};

pub fn consumer_section(consumers: &[ConsumerInfo], theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = vec![section(format!("CONSUMERS ({})", consumers.len()), theme)];

    if consumers.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No active consumers",
            theme.muted_style(),
        )));
    }

    for consumer in consumers {
        lines.push(Line::from(vec![
            Span::raw("  "),
            Span::styled(
                consumer.queue.clone(),
                Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  {}", consumer.tag), theme.muted_style()),
        ]));
        if !consumer.connection.is_empty() {
            lines.push(Line::from(format!("    via {}", consumer.connection)));
        }
    }

    lines.push(Line::default());
    lines
}

pub fn connection_section(connections: &[ConnectionInfo], theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = vec![section(format!("CONNECTIONS ({})", connections.len()), theme)];

    if connections.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No active connections",
            theme.muted_style(),
        )));
    }

    for connection in connections {
        let mut spans = vec![
            Span::raw("  "),
            Span::styled(
                connection.display_name().to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ];
        if !connection.user.is_empty() {
            spans.push(Span::styled(
                format!("  user {}", connection.user),
                theme.muted_style(),
            ));
        }
        lines.push(Line::from(spans));
    }

    lines.push(Line::default());
    lines
}
