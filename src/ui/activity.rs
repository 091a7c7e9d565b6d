//! RECENT ACTIVITY section.

use chrono::Local;
use ratatui::{
    style::Style,
    text::{Line, Span},
};

use super::common::section;
use super::Theme;
use crate::data::format::{format_count, format_signed_count};
use crate::data::{Event, EventKind};

/// Recent events, oldest first so the newest sits at the bottom.
pub fn activity_section(events: &[&Event], theme: &Theme) -> Vec<Line<'static>> {
    let mut lines = vec![section(
        format!("RECENT ACTIVITY (last {} events)", events.len()),
        theme,
    )];

    if events.is_empty() {
        lines.push(Line::from(Span::styled(
            "  No activity yet",
            theme.muted_style(),
        )));
    }

    for event in events {
        let style = match event.kind {
            EventKind::QueueCreated | EventKind::ConsumersAttached => {
                Style::default().fg(theme.healthy)
            }
            EventKind::QueueRemoved | EventKind::ConsumersDetached => {
                Style::default().fg(theme.warning)
            }
            EventKind::NetIncrease | EventKind::NetDecrease => Style::default(),
        };
        lines.push(Line::from(vec![
            Span::styled(
                format!("  [{}] ", event.at.with_timezone(&Local).format("%H:%M:%S")),
                theme.muted_style(),
            ),
            Span::raw(format!("{} ", event.kind.symbol())),
            Span::styled(describe(event), style),
        ]));
    }

    lines
}

/// Human-readable sentence for an event.
pub fn describe(event: &Event) -> String {
    let n = event.magnitude.unsigned_abs();
    match event.kind {
        EventKind::QueueCreated => {
            format!("{}: queue created with {} messages", event.queue, format_count(n))
        }
        EventKind::QueueRemoved => {
            format!("{}: queue removed ({} messages)", event.queue, format_count(n))
        }
        EventKind::NetIncrease => format!(
            "{}: {} messages queued",
            event.queue,
            format_signed_count(event.magnitude)
        ),
        EventKind::NetDecrease => format!(
            "{}: {} messages drained",
            event.queue,
            format_signed_count(event.magnitude)
        ),
        EventKind::ConsumersAttached => format!(
            "{}: {} consumer{} attached",
            event.queue,
            n,
            if n == 1 { "" } else { "s" }
        ),
        EventKind::ConsumersDetached => format!(
            "{}: {} consumer{} detached",
            event.queue,
            n,
            if n == 1 { "" } else { "s" }
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn event(kind: EventKind, magnitude: i64) -> Event {
        Event::new(Utc.timestamp_opt(1_700_000_000, 0).unwrap(), "orders", kind, magnitude)
    }

    #[test]
    fn test_verbs() {
        assert_eq!(
            describe(&event(EventKind::QueueCreated, 42)),
            "orders: queue created with 42 messages"
        );
        assert_eq!(
            describe(&event(EventKind::QueueRemoved, -42)),
            "orders: queue removed (42 messages)"
        );
        assert_eq!(
            describe(&event(EventKind::NetIncrease, 200)),
            "orders: +200 messages queued"
        );
        assert_eq!(
            describe(&event(EventKind::NetDecrease, -1000)),
            "orders: -1.0K messages drained"
        );
        assert_eq!(
            describe(&event(EventKind::ConsumersAttached, 1)),
            "orders: 1 consumer attached"
        );
        assert_eq!(
            describe(&event(EventKind::ConsumersDetached, -2)),
            "orders: 2 consumers detached"
        );
    }

    #[test]
    fn test_section_order() {
        let first = event(EventKind::QueueCreated, 1);
        let second = event(EventKind::NetIncrease, 5);
        let lines = activity_section(&[&first, &second], &Theme::dark());

        let rows: Vec<String> = lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect())
            .collect();
        assert_eq!(rows[0], "━━━ RECENT ACTIVITY (last 2 events) ━━━");
        assert!(rows[1].ends_with("orders: queue created with 1 messages"));
        assert!(rows[2].ends_with("orders: +5 messages queued"));
    }

    #[test]
    fn test_empty() {
        let lines = activity_section(&[], &Theme::dark());
        assert_eq!(lines.len(), 2);
    }
}
