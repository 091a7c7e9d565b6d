//! Data models and processing for broker snapshots.
//!
//! ## Submodules
//!
//! - [`snapshot`]: One poll's worth of metrics ([`Snapshot`], [`QueueMetric`])
//! - [`delta`]: Diffing two snapshots into activity, rates and events
//! - [`event_log`]: Bounded history of notable transitions
//! - [`summary`]: Dashboard totals
//! - [`health`]: Backlog thresholds for colouring queues
//! - [`format`]: Number, byte and uptime formatting
//!
//! ## Data Flow
//!
//! ```text
//! Snapshot (current)      Snapshot (previous, optional)
//!        │                         │
//!        └────────┬────────────────┘
//!                 ▼
//!          delta::diff()
//!                 │
//!                 ├──▶ QueueActivity per queue ──▶ summary::summarize()
//!                 │
//!                 └──▶ Events ──▶ EventLog::record()
//! ```

pub mod delta;
pub mod event_log;
pub mod format;
pub mod health;
pub mod snapshot;
pub mod summary;

pub use delta::{
    diff, ActivityState, Delta, DeltaOptions, QueueActivity, RateSample, RateUnavailable, Rates,
};
pub use event_log::{Event, EventKind, EventLog};
pub use health::{HealthStatus, Thresholds};
pub use snapshot::{
    BrokerInfo, ConnectionInfo, ConsumerInfo, QueueMetric, ResourceMetrics, Snapshot,
};
pub use summary::{summarize, Summary};
