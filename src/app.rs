//! Monitor context and application state.
//!
//! [`Monitor`] owns everything that carries over between cycles: the last
//! good snapshot, the activity derived from it, and the event log. [`App`]
//! wraps a monitor together with its snapshot source and the bits of UI
//! state the watch loop needs.

use chrono::{DateTime, Local};
use tracing::{debug, error, warn};

use crate::config::Settings;
use crate::data::{
    diff, summarize, Delta, DeltaOptions, EventLog, QueueActivity, Snapshot, Summary, Thresholds,
};
use crate::error::SourceError;
use crate::source::SnapshotSource;
use crate::ui::{DashboardView, Theme};

/// State carried from one refresh cycle to the next.
///
/// Only a successful poll touches it: the new snapshot is diffed against the
/// retained one, its events are logged, and it then replaces the retained
/// snapshot.
#[derive(Debug)]
pub struct Monitor {
    previous: Option<Snapshot>,
    delta: Delta,
    summary: Summary,
    events: EventLog,
    options: DeltaOptions,
}

impl Monitor {
    pub fn new(event_capacity: usize, options: DeltaOptions) -> Self {
        Self {
            previous: None,
            delta: Delta::default(),
            summary: Summary::default(),
            events: EventLog::new(event_capacity),
            options,
        }
    }

    /// Diff `current` against the retained snapshot and make it the new baseline.
    pub fn observe(&mut self, current: Snapshot) -> &Delta {
        let delta = diff(self.previous.as_ref(), &current, &self.options);

        for event in &delta.events {
            debug!(queue = %event.queue, kind = ?event.kind, magnitude = event.magnitude, "Queue event");
        }
        self.events.record(delta.events.iter().cloned());

        self.summary = summarize(&current, &delta.queues);
        self.delta = delta;
        self.previous = Some(current);
        &self.delta
    }

    /// The last successfully fetched snapshot.
    pub fn latest(&self) -> Option<&Snapshot> {
        self.previous.as_ref()
    }

    /// Per-queue activity from the last successful cycle.
    pub fn activity(&self) -> &[QueueActivity] {
        &self.delta.queues
    }

    pub fn summary(&self) -> &Summary {
        &self.summary
    }

    pub fn events(&self) -> &EventLog {
        &self.events
    }
}

/// Result of one refresh cycle that did not end the program.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// A new snapshot was diffed and is now on screen.
    Updated,
    /// The fetch failed; the previous frame stays up, marked stale.
    Skipped(SourceError),
}

/// Main application state.
pub struct App {
    pub running: bool,

    // Data source
    source: Box<dyn SnapshotSource>,
    pub monitor: Monitor,
    pub last_error: Option<SourceError>,
    pub last_attempt: Option<DateTime<Local>>,
    pub cycles: u64,
    pub iterations: Option<u64>,

    // Display
    pub thresholds: Thresholds,
    pub recent_events: usize,
    pub theme: Theme,
    pub scroll: u16,
    pub refresh_requested: bool,
}

impl App {
    /// Create a new App with the given source and settings.
    pub fn new(source: Box<dyn SnapshotSource>, settings: &Settings) -> Self {
        Self {
            running: true,
            source,
            monitor: Monitor::new(settings.event_capacity, settings.delta_options()),
            last_error: None,
            last_attempt: None,
            cycles: 0,
            iterations: settings.iterations,
            thresholds: settings.thresholds(),
            recent_events: settings.recent_events,
            theme: Theme::dark(),
            scroll: 0,
            refresh_requested: false,
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Run one poll → diff → aggregate cycle.
    ///
    /// Recoverable failures return `Ok(CycleOutcome::Skipped)` and leave the
    /// monitor untouched so the next good poll still diffs against the last
    /// good snapshot. Fatal failures are returned as `Err`.
    pub fn refresh(&mut self) -> Result<CycleOutcome, SourceError> {
        self.cycles += 1;
        self.refresh_requested = false;
        self.last_attempt = Some(Local::now());

        match self.source.fetch() {
            Ok(snapshot) => {
                let delta = self.monitor.observe(snapshot);
                debug!(
                    cycle = self.cycles,
                    queues = delta.queues.len(),
                    events = delta.events.len(),
                    "Refresh complete"
                );
                self.last_error = None;
                Ok(CycleOutcome::Updated)
            }
            Err(e) if e.is_fatal() => {
                error!("{}", e);
                self.last_error = Some(e.clone());
                Err(e)
            }
            Err(e) => {
                warn!(cycle = self.cycles, "Skipping refresh cycle: {}", e);
                self.last_error = Some(e.clone());
                Ok(CycleOutcome::Skipped(e))
            }
        }
    }

    /// Whether the frame on screen is older than the last attempt.
    pub fn is_stale(&self) -> bool {
        self.last_error.is_some()
    }

    /// Whether the configured number of cycles has run.
    pub fn budget_exhausted(&self) -> bool {
        self.iterations.is_some_and(|limit| self.cycles >= limit)
    }

    /// Everything the renderer needs, once a first snapshot has arrived.
    pub fn dashboard(&self) -> Option<DashboardView<'_>> {
        let snapshot = self.monitor.latest()?;
        Some(DashboardView {
            snapshot,
            summary: self.monitor.summary(),
            activity: self.monitor.activity(),
            events: self.monitor.events().recent(self.recent_events).collect(),
            thresholds: &self.thresholds,
        })
    }

    /// Ask the loop to refresh without waiting for the interval.
    pub fn request_refresh(&mut self) {
        self.refresh_requested = true;
    }

    pub fn scroll_up(&mut self, n: u16) {
        self.scroll = self.scroll.saturating_sub(n);
    }

    pub fn scroll_down(&mut self, n: u16) {
        self.scroll = self.scroll.saturating_add(n);
    }

    pub fn scroll_to_top(&mut self) {
        self.scroll = 0;
    }

    pub fn scroll_to_bottom(&mut self) {
        self.scroll = u16::MAX;
    }

    /// Signal the application to quit.
    pub fn quit(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Overrides;
    use crate::data::{ActivityState, EventKind, QueueMetric, RateUnavailable, Rates};
    use crate::source::{ChannelSource, SnapshotSender};
    use chrono::{TimeZone, Utc};

    fn settings() -> Settings {
        Settings::resolve(&Overrides::default(), Some(Default::default())).unwrap()
    }

    fn snapshot(secs: i64, queues: &[(&str, u64, u64)]) -> Snapshot {
        Snapshot::new(
            Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap(),
            queues
                .iter()
                .map(|(name, ready, unacked)| QueueMetric::new(*name, *ready, *unacked, 0))
                .collect(),
        )
    }

    fn app() -> (SnapshotSender, App) {
        let (tx, source) = ChannelSource::create("test");
        (tx, App::new(Box::new(source), &settings()))
    }

    #[test]
    fn test_first_cycle_has_no_rates() {
        let (tx, mut app) = app();
        tx.send(Ok(snapshot(0, &[("a", 5, 0), ("b", 2, 1)]))).unwrap();

        assert_eq!(app.refresh(), Ok(CycleOutcome::Updated));

        let activity = app.monitor.activity();
        assert_eq!(activity.len(), 2);
        assert!(activity
            .iter()
            .all(|q| q.rates == Rates::Unavailable(RateUnavailable::FirstPoll)));

        let summary = app.monitor.summary();
        assert_eq!(summary.total_ready, 7);
        assert_eq!(summary.total_unacked, 1);
        assert_eq!(app.monitor.events().len(), 2);
        assert!(app
            .monitor
            .events()
            .iter()
            .all(|e| e.kind == EventKind::QueueCreated));
        assert!(app.dashboard().is_some());
    }

    #[test]
    fn test_failed_cycle_keeps_previous_snapshot() {
        let (tx, mut app) = app();
        tx.send(Ok(snapshot(0, &[("work.queue", 1000, 0)]))).unwrap();
        app.refresh().unwrap();

        tx.send(Err(SourceError::Unreachable("connection refused".to_string())))
            .unwrap();
        let outcome = app.refresh().unwrap();
        assert!(matches!(outcome, CycleOutcome::Skipped(_)));
        assert!(app.is_stale());
        assert_eq!(app.monitor.latest().unwrap().queues[0].ready, 1000);
        assert!(app.dashboard().is_some());

        // The next good poll diffs across the skipped interval.
        tx.send(Ok(snapshot(8, &[("work.queue", 1400, 0)]))).unwrap();
        app.refresh().unwrap();
        assert!(!app.is_stale());

        let queue = &app.monitor.activity()[0];
        assert_eq!(queue.state, ActivityState::Publishing);
        assert_eq!(queue.rates.sample().unwrap().publish, 50.0);
    }

    #[test]
    fn test_malformed_is_recoverable() {
        let (tx, mut app) = app();
        tx.send(Err(SourceError::Malformed("truncated".to_string())))
            .unwrap();

        let outcome = app.refresh().unwrap();
        assert_eq!(
            outcome,
            CycleOutcome::Skipped(SourceError::Malformed("truncated".to_string()))
        );
        assert!(app.dashboard().is_none());
    }

    #[test]
    fn test_auth_failure_is_fatal() {
        let (tx, mut app) = app();
        tx.send(Err(SourceError::AuthFailed("401".to_string()))).unwrap();

        let err = app.refresh().unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_iteration_budget() {
        let (tx, source) = ChannelSource::create("test");
        let mut settings = settings();
        settings.iterations = Some(2);
        let mut app = App::new(Box::new(source), &settings);

        tx.send(Ok(snapshot(0, &[]))).unwrap();
        app.refresh().unwrap();
        assert!(!app.budget_exhausted());

        app.refresh().unwrap();
        assert!(app.budget_exhausted());
    }

    #[test]
    fn test_event_log_capacity_from_settings() {
        let (tx, source) = ChannelSource::create("test");
        let mut settings = settings();
        settings.event_capacity = 2;
        let mut app = App::new(Box::new(source), &settings);

        tx.send(Ok(snapshot(0, &[("a", 1, 0), ("b", 1, 0), ("c", 1, 0)])))
            .unwrap();
        app.refresh().unwrap();

        let names: Vec<&str> = app.monitor.events().iter().map(|e| e.queue.as_str()).collect();
        assert_eq!(names, vec!["b", "c"]);
    }

    #[test]
    fn test_huge_event_capacity_from_settings() {
        let (tx, source) = ChannelSource::create("test");
        let mut settings = settings();
        settings.event_capacity = usize::MAX;
        let mut app = App::new(Box::new(source), &settings);

        tx.send(Ok(snapshot(0, &[("a", 1, 0), ("b", 1, 0)]))).unwrap();
        app.refresh().unwrap();

        assert_eq!(app.monitor.events().len(), 2);
    }

    #[test]
    fn test_scrolling() {
        let (_tx, mut app) = app();
        app.scroll_down(5);
        app.scroll_up(2);
        assert_eq!(app.scroll, 3);
        app.scroll_up(10);
        assert_eq!(app.scroll, 0);
        app.scroll_to_bottom();
        assert_eq!(app.scroll, u16::MAX);
        app.scroll_to_top();
        assert_eq!(app.scroll, 0);
    }
}
