//! Snapshot source abstraction.
//!
//! The refresh loop pulls one [`Snapshot`] per cycle from a
//! [`SnapshotSource`]. The production source talks to the RabbitMQ
//! Management API; [`ChannelSource`] lets snapshots be pushed in-process.

mod api;
mod channel;
mod management;

pub use channel::{ChannelSource, SnapshotSender};
pub use management::{ManagementApi, ManagementApiBuilder, ManagementApiSource, DEFAULT_TIMEOUT};

use std::fmt::Debug;

use crate::data::Snapshot;
use crate::error::SourceError;

/// Trait for fetching point-in-time metrics snapshots.
///
/// A fetch has no side effects beyond the outbound request. Failures come
/// back as a typed [`SourceError`] and the caller decides whether to skip
/// the cycle or stop.
pub trait SnapshotSource: Send + Debug {
    /// Fetch the current snapshot.
    ///
    /// Queues must come back in the order the source reported them; an
    /// empty queue list is a valid snapshot.
    fn fetch(&mut self) -> Result<Snapshot, SourceError>;

    /// Returns a human-readable description of the source.
    ///
    /// Used for display in the status bar.
    fn description(&self) -> &str;
}
