//! Channel-based snapshot source.
//!
//! Receives snapshots (or failures) pushed through a tokio mpsc channel.
//! This is useful for embedding the monitor behind another collector, and
//! for driving the refresh loop without a broker.

use tokio::sync::mpsc;

use super::SnapshotSource;
use crate::data::Snapshot;
use crate::error::SourceError;

/// Sending half paired with a [`ChannelSource`].
pub type SnapshotSender = mpsc::UnboundedSender<Result<Snapshot, SourceError>>;

/// A snapshot source fed through a channel.
///
/// Every [`fetch`](SnapshotSource::fetch) takes the oldest pending item. When
/// nothing is pending the fetch fails as unreachable, so the cycle is skipped
/// and the previous snapshot stays in place.
///
/// # Example
///
/// ```
/// use chrono::Utc;
/// use queuewatch::data::{QueueMetric, Snapshot};
/// use queuewatch::source::{ChannelSource, SnapshotSource};
///
/// let (tx, mut source) = ChannelSource::create("embedded");
/// tx.send(Ok(Snapshot::new(Utc::now(), vec![QueueMetric::new("jobs", 3, 0, 1)])))
///     .unwrap();
///
/// let snapshot = source.fetch().unwrap();
/// assert_eq!(snapshot.queues.len(), 1);
/// ```
#[derive(Debug)]
pub struct ChannelSource {
    receiver: mpsc::UnboundedReceiver<Result<Snapshot, SourceError>>,
    description: String,
}

impl ChannelSource {
    /// Create a new channel source.
    ///
    /// * `receiver` - The receiving end of an unbounded channel
    /// * `source_description` - Where the snapshots come from, for the status bar
    pub fn new(
        receiver: mpsc::UnboundedReceiver<Result<Snapshot, SourceError>>,
        source_description: &str,
    ) -> Self {
        Self {
            receiver,
            description: format!("channel: {}", source_description),
        }
    }

    /// Create a channel pair for sending snapshots to a ChannelSource.
    pub fn create(source_description: &str) -> (SnapshotSender, Self) {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self::new(rx, source_description))
    }
}

impl SnapshotSource for ChannelSource {
    fn fetch(&mut self) -> Result<Snapshot, SourceError> {
        match self.receiver.try_recv() {
            Ok(item) => item,
            Err(mpsc::error::TryRecvError::Empty) => {
                Err(SourceError::Unreachable("no snapshot pending".to_string()))
            }
            Err(mpsc::error::TryRecvError::Disconnected) => {
                Err(SourceError::Unreachable("snapshot sender closed".to_string()))
            }
        }
    }

    fn description(&self) -> &str {
        &self.description
    }
}
