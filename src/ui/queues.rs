//! Per-queue cards.

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};

use super::common::section;
use super::Theme;
use crate::data::format::{format_count, format_rate};
use crate::data::{ActivityState, QueueActivity, QueueMetric, RateUnavailable, Rates, Thresholds};

/// The QUEUES section: one card per queue in reported order.
pub fn queue_section(
    queues: &[QueueMetric],
    activity: &[QueueActivity],
    thresholds: &Thresholds,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let mut lines = vec![section(format!("QUEUES ({})", queues.len()), theme)];

    if queues.is_empty() {
        lines.push(Line::from(Span::styled("  No queues", theme.muted_style())));
        lines.push(Line::default());
        return lines;
    }

    for queue in queues {
        let activity = activity.iter().find(|a| a.name == queue.name);
        lines.extend(card(queue, activity, thresholds, theme));
    }
    lines
}

/// A single queue card followed by a blank separator line.
pub fn card(
    queue: &QueueMetric,
    activity: Option<&QueueActivity>,
    thresholds: &Thresholds,
    theme: &Theme,
) -> Vec<Line<'static>> {
    let health = thresholds.classify(queue.total());
    let state = activity.map_or(ActivityState::Idle, |a| a.state);

    let title = Line::from(vec![
        Span::styled("● ", theme.status_style(health)),
        Span::styled(
            queue.name.clone(),
            Style::default().fg(theme.highlight).add_modifier(Modifier::BOLD),
        ),
        Span::raw("  "),
        Span::styled(format!("[{}]", state.label()), theme.activity_style(state)),
    ]);

    let counts = Line::from(vec![
        Span::raw("    "),
        Span::raw(format!(
            "Ready: {:>6}   Unacked: {:>6}   Total: {:>6}",
            format_count(queue.ready),
            format_count(queue.unacked),
            format_count(queue.total()),
        )),
    ]);

    let rates = match activity.map(|a| a.rates) {
        Some(Rates::Available(sample)) => {
            let style = if sample.is_zero() {
                theme.muted_style()
            } else {
                Style::default()
            };
            Line::from(vec![
                Span::raw("    "),
                Span::styled(
                    format!(
                        "Rates: publish {}  deliver {}  ack {}",
                        format_rate(sample.publish),
                        format_rate(sample.deliver),
                        format_rate(sample.ack),
                    ),
                    style,
                ),
            ])
        }
        Some(Rates::Unavailable(reason)) => unavailable_line(reason, theme),
        None => unavailable_line(RateUnavailable::FirstPoll, theme),
    };

    let consumers = if queue.consumers > 0 {
        Line::from(vec![
            Span::raw("    "),
            Span::styled("✓ ", Style::default().fg(theme.healthy)),
            Span::raw(format!(
                "{} consumer{}",
                queue.consumers,
                if queue.consumers == 1 { "" } else { "s" }
            )),
        ])
    } else {
        Line::from(vec![
            Span::raw("    "),
            Span::styled("⚠ No consumers", Style::default().fg(theme.warning)),
        ])
    };

    vec![title, counts, rates, consumers, Line::default()]
}

fn unavailable_line(reason: RateUnavailable, theme: &Theme) -> Line<'static> {
    let why = match reason {
        RateUnavailable::FirstPoll => "first poll",
        RateUnavailable::ClockAnomaly => "clock went backwards",
    };
    Line::from(vec![
        Span::raw("    "),
        Span::styled(format!("Rates: unavailable ({})", why), theme.muted_style()),
    ])
}
