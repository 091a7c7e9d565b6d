//! Point-in-time broker metrics.
//!
//! A [`Snapshot`] is produced once per poll and never mutated afterwards.
//! The monitor keeps the most recent one around so the next poll can be
//! diffed against it.

use chrono::{DateTime, Utc};

/// Per-queue message counts at the time of a poll.
///
/// The total is derived from `ready + unacked` and never stored, so the two
/// can't drift apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueMetric {
    /// Queue name, unique within a snapshot.
    pub name: String,
    /// Messages waiting to be delivered.
    pub ready: u64,
    /// Messages delivered but not yet acknowledged.
    pub unacked: u64,
    /// Consumers attached to the queue.
    pub consumers: u32,
}

impl QueueMetric {
    pub fn new(name: impl Into<String>, ready: u64, unacked: u64, consumers: u32) -> Self {
        Self {
            name: name.into(),
            ready,
            unacked,
            consumers,
        }
    }

    /// Ready plus unacknowledged messages.
    pub fn total(&self) -> u64 {
        self.ready.saturating_add(self.unacked)
    }
}

/// A consumer attached to a queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConsumerInfo {
    pub queue: String,
    pub tag: String,
    pub connection: String,
}

/// A client connection to the broker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionInfo {
    pub name: String,
    pub user: String,
    /// Name the client chose for itself, if any.
    pub client_name: Option<String>,
}

impl ConnectionInfo {
    /// The client-provided name when there is one, otherwise the broker's.
    pub fn display_name(&self) -> &str {
        self.client_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.name)
    }
}

/// Broker node resource usage.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceMetrics {
    pub memory_used: u64,
    pub memory_limit: u64,
    pub disk_free: u64,
    pub disk_free_limit: u64,
    pub fd_used: u64,
    pub fd_total: u64,
    pub sockets_used: u64,
    pub sockets_total: u64,
    pub proc_used: u64,
    pub proc_total: u64,
    /// Node uptime in milliseconds.
    pub uptime_ms: u64,
}

impl ResourceMetrics {
    /// Memory use as a percentage of the high watermark, 0 when unknown.
    pub fn memory_percent(&self) -> f64 {
        percent(self.memory_used, self.memory_limit)
    }

    /// File descriptor use as a percentage of the limit, 0 when unknown.
    pub fn fd_percent(&self) -> f64 {
        percent(self.fd_used, self.fd_total)
    }
}

fn percent(used: u64, total: u64) -> f64 {
    if total == 0 {
        0.0
    } else {
        used as f64 / total as f64 * 100.0
    }
}

/// Broker identity reported by the overview endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BrokerInfo {
    pub product: String,
    pub version: String,
    pub cluster: String,
}

/// Everything captured by a single poll.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Wall-clock time the poll completed.
    pub taken_at: DateTime<Utc>,
    /// Queues in the order the source reported them.
    pub queues: Vec<QueueMetric>,
    pub consumers: Vec<ConsumerInfo>,
    pub connections: Vec<ConnectionInfo>,
    pub resources: Option<ResourceMetrics>,
    pub broker: Option<BrokerInfo>,
}

impl Snapshot {
    /// Create a snapshot holding only queue metrics.
    pub fn new(taken_at: DateTime<Utc>, queues: Vec<QueueMetric>) -> Self {
        Self {
            taken_at,
            queues,
            consumers: Vec::new(),
            connections: Vec::new(),
            resources: None,
            broker: None,
        }
    }

    pub fn with_consumers(mut self, consumers: Vec<ConsumerInfo>) -> Self {
        self.consumers = consumers;
        self
    }

    pub fn with_connections(mut self, connections: Vec<ConnectionInfo>) -> Self {
        self.connections = connections;
        self
    }

    pub fn with_resources(mut self, resources: Option<ResourceMetrics>) -> Self {
        self.resources = resources;
        self
    }

    pub fn with_broker(mut self, broker: Option<BrokerInfo>) -> Self {
        self.broker = broker;
        self
    }

    /// Look up a queue by name.
    pub fn queue(&self, name: &str) -> Option<&QueueMetric> {
        self.queues.iter().find(|q| q.name == name)
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn consumer_count(&self) -> usize {
        self.consumers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queues.is_empty()
    }
}
