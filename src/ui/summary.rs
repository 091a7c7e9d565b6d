//! Summary and resource boxes.

use ratatui::text::{Line, Span};

use super::common::{box_bottom, box_divider, box_top, boxed, field};
use super::Theme;
use crate::data::format::{format_bytes, format_count, format_uptime};
use crate::data::{ResourceMetrics, Summary};

const COLUMN: usize = 21;

/// Fixed-width box with queue, consumer and connection counts.
pub fn summary_box(summary: &Summary, theme: &Theme) -> Vec<Line<'static>> {
    let counts = [
        field("Queues", summary.total_queues.to_string(), COLUMN),
        field("Consumers", summary.total_consumers.to_string(), COLUMN),
        field("Connections", summary.total_connections.to_string(), 0),
    ]
    .concat();
    let messages = [
        field("Ready", format_count(summary.total_ready), COLUMN),
        field("Unacked", format_count(summary.total_unacked), COLUMN),
        field("Total", format_count(summary.total_messages), 0),
    ]
    .concat();

    vec![
        box_top(theme),
        boxed(vec![Span::styled("QUEUE SUMMARY", theme.header)], theme),
        box_divider(theme),
        boxed(counts, theme),
        boxed(messages, theme),
        boxed(field("Active", summary.active_ratio(), 0), theme),
        box_bottom(theme),
    ]
}

/// Broker node resources, shown only when the source reported them.
pub fn resource_box(resources: &ResourceMetrics, theme: &Theme) -> Vec<Line<'static>> {
    let memory = format!(
        "{} / {} ({:.1}%)",
        format_bytes(resources.memory_used),
        format_bytes(resources.memory_limit),
        resources.memory_percent()
    );
    let disk = format!(
        "{} (limit {})",
        format_bytes(resources.disk_free),
        format_bytes(resources.disk_free_limit)
    );
    let fds = format!(
        "{}/{} ({:.1}%)",
        resources.fd_used,
        resources.fd_total,
        resources.fd_percent()
    );

    let sockets_and_procs = [
        field(
            "Sockets",
            format!("{}/{}", resources.sockets_used, resources.sockets_total),
            COLUMN,
        ),
        field(
            "Processes",
            format!(
                "{}/{}",
                format_count(resources.proc_used),
                format_count(resources.proc_total)
            ),
            0,
        ),
    ]
    .concat();

    vec![
        box_top(theme),
        boxed(vec![Span::styled("BROKER RESOURCES", theme.header)], theme),
        box_divider(theme),
        boxed(field("Memory", memory, 0), theme),
        boxed(field("Disk free", disk, 0), theme),
        boxed(field("File descriptors", fds, 0), theme),
        boxed(sockets_and_procs, theme),
        boxed(field("Uptime", format_uptime(resources.uptime_ms), 0), theme),
        box_bottom(theme),
    ]
}
