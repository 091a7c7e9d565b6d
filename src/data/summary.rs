//! Roll-up of the current snapshot into dashboard totals.

use super::delta::QueueActivity;
use super::snapshot::Snapshot;

/// Aggregate counts shown in the summary box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub total_queues: usize,
    pub total_ready: u64,
    pub total_unacked: u64,
    pub total_messages: u64,
    pub total_consumers: u64,
    pub total_connections: usize,
    /// Queues whose activity is anything but idle.
    pub active_queues: usize,
}

impl Summary {
    /// "a/b" active ratio as displayed.
    pub fn active_ratio(&self) -> String {
        format!("{}/{}", self.active_queues, self.total_queues)
    }
}

/// Sum the current snapshot's queues and count the active ones.
pub fn summarize(current: &Snapshot, activity: &[QueueActivity]) -> Summary {
    let mut summary = Summary {
        total_queues: current.queues.len(),
        total_connections: current.connection_count(),
        ..Default::default()
    };

    for queue in &current.queues {
        summary.total_ready = summary.total_ready.saturating_add(queue.ready);
        summary.total_unacked = summary.total_unacked.saturating_add(queue.unacked);
        summary.total_messages = summary.total_messages.saturating_add(queue.total());
        summary.total_consumers += u64::from(queue.consumers);
    }

    summary.active_queues = activity.iter().filter(|q| q.state.is_active()).count();
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::delta::{diff, DeltaOptions};
    use crate::data::snapshot::{ConnectionInfo, QueueMetric};
    use chrono::{Duration, Utc};

    fn connection(name: &str) -> ConnectionInfo {
        ConnectionInfo {
            name: name.to_string(),
            user: "guest".to_string(),
            client_name: None,
        }
    }

    #[test]
    fn test_first_poll_totals() {
        let current = Snapshot::new(
            Utc::now(),
            vec![
                QueueMetric::new("orders", 120, 5, 2),
                QueueMetric::new("emails", 0, 0, 1),
            ],
        )
        .with_connections(vec![connection("a"), connection("b"), connection("c")]);

        let delta = diff(None, &current, &DeltaOptions::default());
        let summary = summarize(&current, &delta.queues);

        assert_eq!(summary.total_queues, 2);
        assert_eq!(summary.total_ready, 120);
        assert_eq!(summary.total_unacked, 5);
        assert_eq!(summary.total_messages, 125);
        assert_eq!(summary.total_consumers, 3);
        assert_eq!(summary.total_connections, 3);
        assert_eq!(summary.active_queues, 1);
        assert_eq!(summary.active_ratio(), "1/2");
    }

    #[test]
    fn test_idle_queues_are_not_active() {
        let previous = Snapshot::new(Utc::now(), vec![QueueMetric::new("a", 3, 0, 0)]);
        let mut current = previous.clone();
        current.taken_at = previous.taken_at + Duration::seconds(1);

        let delta = diff(Some(&previous), &current, &DeltaOptions::default());
        let summary = summarize(&current, &delta.queues);

        assert_eq!(summary.active_queues, 0);
        assert_eq!(summary.total_ready, 3);
    }

    #[test]
    fn test_empty_snapshot() {
        let current = Snapshot::new(Utc::now(), Vec::new());
        let summary = summarize(&current, &[]);
        assert_eq!(summary, Summary::default());
        assert_eq!(summary.active_ratio(), "0/0");
    }
}
