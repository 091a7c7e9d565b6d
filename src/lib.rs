//! # queuewatch
//!
//! A live terminal dashboard for RabbitMQ queues.
//!
//! The dashboard polls the RabbitMQ Management HTTP API, compares each
//! snapshot with the previous one to work out what every queue is doing and
//! how fast, keeps a short log of notable changes, and redraws a card-style
//! display in place.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                         Refresh loop                         │
//! │  ┌─────────┐   ┌───────────────┐   ┌──────────┐   ┌────────┐ │
//! │  │ source  │──▶│ data::diff    │──▶│ EventLog │──▶│   ui   │ │
//! │  │ (fetch) │   │ (delta/rates) │   │ Summary  │   │(render)│ │
//! │  └─────────┘   └───────────────┘   └──────────┘   └────────┘ │
//! │       ▲                                                      │
//! │       └── ManagementApiSource | ChannelSource                │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: the [`SnapshotSource`] trait, the HTTP source and an
//!   in-process channel source
//! - **[`data`]**: snapshot model, delta/rate engine, event log, aggregation
//!   and number formatting
//! - **[`app`]**: the [`Monitor`] context carried between cycles and the
//!   [`App`] state the watch loop drives
//! - **[`ui`]**: line-based renderer, one-shot printer and watch-mode frame
//! - **[`config`]**: layered settings (defaults, `QUEUEWATCH_*` environment,
//!   command-line flags)
//!
//! ## Usage
//!
//! ### As a CLI tool
//!
//! ```bash
//! # Live dashboard, refreshed every 3 seconds
//! queuewatch --url http://localhost:15672 -u guest -p guest
//!
//! # One frame, then exit
//! queuewatch --once
//! ```
//!
//! ### As a library with a channel source
//!
//! ```
//! use chrono::Utc;
//! use queuewatch::{App, ChannelSource, QueueMetric, Settings, Snapshot};
//! use queuewatch::config::Overrides;
//!
//! let settings = Settings::resolve(&Overrides::default(), Some(Default::default())).unwrap();
//! let (tx, source) = ChannelSource::create("embedded");
//! let mut app = App::new(Box::new(source), &settings);
//!
//! tx.send(Ok(Snapshot::new(Utc::now(), vec![QueueMetric::new("jobs", 3, 0, 1)])))
//!     .unwrap();
//! app.refresh().unwrap();
//! assert_eq!(app.monitor.summary().total_ready, 3);
//! ```
//!
//! ### Diffing snapshots directly
//!
//! ```
//! use chrono::{Duration, Utc};
//! use queuewatch::data::{diff, ActivityState, DeltaOptions, QueueMetric, Snapshot};
//!
//! let t0 = Utc::now();
//! let before = Snapshot::new(t0, vec![QueueMetric::new("jobs", 1000, 0, 0)]);
//! let after = Snapshot::new(t0 + Duration::seconds(8), vec![QueueMetric::new("jobs", 1400, 0, 0)]);
//!
//! let delta = diff(Some(&before), &after, &DeltaOptions::default());
//! let jobs = delta.get("jobs").unwrap();
//! assert_eq!(jobs.state, ActivityState::Publishing);
//! assert_eq!(jobs.rates.sample().unwrap().publish, 50.0);
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod events;
pub mod source;
pub mod ui;

// Re-export main types for convenience
pub use app::{App, CycleOutcome, Monitor};
pub use config::Settings;
pub use data::{
    diff, summarize, ActivityState, Delta, Event, EventKind, EventLog, QueueActivity, QueueMetric,
    Rates, Snapshot, Summary, Thresholds,
};
pub use error::SourceError;
pub use source::{ChannelSource, ManagementApi, ManagementApiSource, SnapshotSource};
