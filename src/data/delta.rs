//! Snapshot diffing: activity classification, rates and events.
//!
//! [`diff`] compares the current snapshot against the previous one (if any)
//! and produces, per queue, an [`ActivityState`] and a [`Rates`] value, plus
//! the [`Event`]s worth recording.
//!
//! ## Rates
//!
//! The management API only reports queue depths, so throughput is estimated
//! from how the depths moved. With `r` the ready delta and `u` the unacked
//! delta, the smallest non-negative flows satisfying
//! `r = published - delivered` and `u = delivered - acked` are:
//!
//! ```text
//! delivered = max(0, -r, u)
//! published = r + delivered
//! acked     = delivered - u
//! ```
//!
//! Each rate is the flow divided by the seconds elapsed between snapshots.

use std::collections::{HashMap, HashSet};

use tracing::warn;

use super::event_log::{Event, EventKind};
use super::snapshot::{QueueMetric, Snapshot};

/// How messages moved through a queue between two polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityState {
    Publishing,
    Consuming,
    Idle,
    /// Inflow and deliveries at the same time.
    Mixed,
}

impl ActivityState {
    /// Classify from the ready and unacked deltas.
    ///
    /// - no change at all is `Idle`
    /// - ready growing while unacked holds is `Publishing`
    /// - ready growing while unacked drains is `Publishing` only when the
    ///   ready delta is strictly larger in magnitude; ties and a dominant
    ///   drain are `Consuming`
    /// - unacked growing while ready holds or falls, or ready falling while
    ///   unacked holds or drains, is `Consuming`
    /// - both growing is `Mixed`
    pub fn classify(ready_delta: i64, unacked_delta: i64) -> Self {
        match (ready_delta.signum(), unacked_delta.signum()) {
            (0, 0) => ActivityState::Idle,
            (1, 0) => ActivityState::Publishing,
            (1, -1) if ready_delta.unsigned_abs() > unacked_delta.unsigned_abs() => {
                ActivityState::Publishing
            }
            (1, 1) => ActivityState::Mixed,
            _ => ActivityState::Consuming,
        }
    }

    pub fn is_active(&self) -> bool {
        *self != ActivityState::Idle
    }

    pub fn label(&self) -> &'static str {
        match self {
            ActivityState::Publishing => "Publishing",
            ActivityState::Consuming => "Consuming",
            ActivityState::Idle => "Idle",
            ActivityState::Mixed => "Mixed",
        }
    }
}

/// Messages per second over the last interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RateSample {
    pub publish: f64,
    pub deliver: f64,
    pub ack: f64,
}

impl RateSample {
    pub fn is_zero(&self) -> bool {
        self.publish == 0.0 && self.deliver == 0.0 && self.ack == 0.0
    }
}

/// Why no rate could be computed for a queue this cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateUnavailable {
    /// There is no previous snapshot yet.
    FirstPoll,
    /// The elapsed time between snapshots was zero or negative.
    ClockAnomaly,
}

/// Rate sample for one queue, or the reason it is missing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rates {
    Available(RateSample),
    Unavailable(RateUnavailable),
}

impl Rates {
    pub fn sample(&self) -> Option<&RateSample> {
        match self {
            Rates::Available(sample) => Some(sample),
            Rates::Unavailable(_) => None,
        }
    }
}

/// Derived state of one queue for the current cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct QueueActivity {
    pub name: String,
    pub state: ActivityState,
    pub rates: Rates,
    pub ready_delta: i64,
    pub unacked_delta: i64,
}

/// Knobs for event generation.
#[derive(Debug, Clone, Default)]
pub struct DeltaOptions {
    /// Net changes whose absolute size does not exceed this are not logged.
    pub event_threshold: u64,
}

/// Output of one [`diff`].
#[derive(Debug, Clone, Default)]
pub struct Delta {
    /// One entry per queue in the current snapshot, in reported order.
    pub queues: Vec<QueueActivity>,
    /// Events in the order they should be recorded.
    pub events: Vec<Event>,
    /// Seconds between the snapshots, `None` on the first poll.
    pub elapsed_secs: Option<f64>,
}

impl Delta {
    /// Activity for a queue by name.
    pub fn get(&self, name: &str) -> Option<&QueueActivity> {
        self.queues.iter().find(|q| q.name == name)
    }
}

/// Compare `current` against `previous` and derive per-queue activity.
///
/// Queues missing from `previous` are diffed against zero counts, rates
/// included, and logged as created; queues missing from `current` are logged as removed and get
/// no activity entry.
pub fn diff(previous: Option<&Snapshot>, current: &Snapshot, options: &DeltaOptions) -> Delta {
    let elapsed_secs = previous.map(|prev| elapsed_seconds(prev, current));

    if let Some(secs) = elapsed_secs.filter(|secs| *secs <= 0.0) {
        warn!(
            elapsed = secs,
            "Non-positive time between snapshots, rates suppressed this cycle"
        );
    }

    let previous_by_name: HashMap<&str, &QueueMetric> = previous
        .map(|p| p.queues.iter().map(|q| (q.name.as_str(), q)).collect())
        .unwrap_or_default();

    let at = current.taken_at;
    let mut queues = Vec::with_capacity(current.queues.len());
    let mut events = Vec::new();

    for queue in &current.queues {
        let before = previous_by_name.get(queue.name.as_str()).copied();

        let (prev_ready, prev_unacked) = before.map_or((0, 0), |b| (b.ready, b.unacked));
        let ready_delta = signed_delta(queue.ready, prev_ready);
        let unacked_delta = signed_delta(queue.unacked, prev_unacked);

        let rates = match elapsed_secs {
            None => Rates::Unavailable(RateUnavailable::FirstPoll),
            Some(secs) if secs <= 0.0 => Rates::Unavailable(RateUnavailable::ClockAnomaly),
            Some(secs) => Rates::Available(rate_sample(ready_delta, unacked_delta, secs)),
        };

        match before {
            None => {
                events.push(Event::new(
                    at,
                    &queue.name,
                    EventKind::QueueCreated,
                    clamp_i64(queue.total() as i128),
                ));
            }
            Some(before) => {
                let net = signed_delta(queue.total(), before.total());
                if net.unsigned_abs() > options.event_threshold {
                    let kind = if net > 0 {
                        EventKind::NetIncrease
                    } else {
                        EventKind::NetDecrease
                    };
                    events.push(Event::new(at, &queue.name, kind, net));
                }

                let consumer_change = i64::from(queue.consumers) - i64::from(before.consumers);
                if consumer_change != 0 {
                    let kind = if consumer_change > 0 {
                        EventKind::ConsumersAttached
                    } else {
                        EventKind::ConsumersDetached
                    };
                    events.push(Event::new(at, &queue.name, kind, consumer_change));
                }
            }
        }

        queues.push(QueueActivity {
            name: queue.name.clone(),
            state: ActivityState::classify(ready_delta, unacked_delta),
            rates,
            ready_delta,
            unacked_delta,
        });
    }

    if let Some(previous) = previous {
        let current_names: HashSet<&str> = current.queues.iter().map(|q| q.name.as_str()).collect();
        for gone in previous.queues.iter().filter(|q| !current_names.contains(q.name.as_str())) {
            events.push(Event::new(
                at,
                &gone.name,
                EventKind::QueueRemoved,
                -clamp_i64(gone.total() as i128),
            ));
        }
    }

    Delta {
        queues,
        events,
        elapsed_secs,
    }
}

fn elapsed_seconds(previous: &Snapshot, current: &Snapshot) -> f64 {
    let elapsed = current.taken_at - previous.taken_at;
    match elapsed.num_microseconds() {
        Some(micros) => micros as f64 / 1_000_000.0,
        None => elapsed.num_milliseconds() as f64 / 1_000.0,
    }
}

fn rate_sample(ready_delta: i64, unacked_delta: i64, elapsed_secs: f64) -> RateSample {
    let r = i128::from(ready_delta);
    let u = i128::from(unacked_delta);

    let delivered = 0i128.max(-r).max(u);
    let published = r + delivered;
    let acked = delivered - u;

    RateSample {
        publish: published as f64 / elapsed_secs,
        deliver: delivered as f64 / elapsed_secs,
        ack: acked as f64 / elapsed_secs,
    }
}

fn signed_delta(current: u64, previous: u64) -> i64 {
    clamp_i64(i128::from(current) - i128::from(previous))
}

fn clamp_i64(value: i128) -> i64 {
    value.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn at(secs: i64) -> chrono::DateTime<Utc> {
        Utc.timestamp_opt(1_700_000_000 + secs, 0).unwrap()
    }

    fn snapshot(secs: i64, queues: &[(&str, u64, u64)]) -> Snapshot {
        Snapshot::new(
            at(secs),
            queues
                .iter()
                .map(|(name, ready, unacked)| QueueMetric::new(*name, *ready, *unacked, 0))
                .collect(),
        )
    }

    fn kinds(delta: &Delta) -> Vec<(String, EventKind, i64)> {
        delta
            .events
            .iter()
            .map(|e| (e.queue.clone(), e.kind, e.magnitude))
            .collect()
    }

    #[test]
    fn test_classify() {
        assert_eq!(ActivityState::classify(0, 0), ActivityState::Idle);
        assert_eq!(ActivityState::classify(5, 0), ActivityState::Publishing);
        assert_eq!(ActivityState::classify(5, -3), ActivityState::Publishing);
        assert_eq!(ActivityState::classify(100, -1), ActivityState::Publishing);
        assert_eq!(ActivityState::classify(5, -5), ActivityState::Consuming);
        assert_eq!(ActivityState::classify(1, -100), ActivityState::Consuming);
        assert_eq!(
            ActivityState::classify(i64::MAX, i64::MIN),
            ActivityState::Consuming
        );
        assert_eq!(ActivityState::classify(-5, 5), ActivityState::Consuming);
        assert_eq!(ActivityState::classify(0, 2), ActivityState::Consuming);
        assert_eq!(ActivityState::classify(-5, 0), ActivityState::Consuming);
        assert_eq!(ActivityState::classify(-5, -5), ActivityState::Consuming);
        assert_eq!(ActivityState::classify(0, -2), ActivityState::Consuming);
        assert_eq!(ActivityState::classify(4, 4), ActivityState::Mixed);
    }

    #[test]
    fn test_publishing_scenario() {
        let prev = snapshot(0, &[("work.queue", 1000, 0)]);
        let curr = snapshot(4, &[("work.queue", 1200, 0)]);

        let delta = diff(Some(&prev), &curr, &DeltaOptions::default());
        let queue = delta.get("work.queue").unwrap();

        assert_eq!(queue.state, ActivityState::Publishing);
        let rates = queue.rates.sample().unwrap();
        assert_eq!(rates.publish, 50.0);
        assert_eq!(rates.deliver, 0.0);
        assert_eq!(rates.ack, 0.0);
        assert_eq!(
            kinds(&delta),
            vec![("work.queue".to_string(), EventKind::NetIncrease, 200)]
        );
    }

    #[test]
    fn test_drained_scenario() {
        let prev = snapshot(0, &[("work.queue", 1000, 0)]);
        let curr = snapshot(2, &[("work.queue", 0, 0)]);

        let delta = diff(Some(&prev), &curr, &DeltaOptions::default());
        let queue = delta.get("work.queue").unwrap();

        assert_eq!(queue.state, ActivityState::Consuming);
        let rates = queue.rates.sample().unwrap();
        assert_eq!(rates.publish, 0.0);
        assert_eq!(rates.deliver, 500.0);
        assert_eq!(rates.ack, 500.0);
        assert_eq!(
            kinds(&delta),
            vec![("work.queue".to_string(), EventKind::NetDecrease, -1000)]
        );
    }

    #[test]
    fn test_first_poll() {
        let curr = snapshot(0, &[("a", 10, 2), ("b", 0, 0)]);

        let delta = diff(None, &curr, &DeltaOptions::default());

        assert_eq!(delta.elapsed_secs, None);
        assert_eq!(delta.queues.len(), 2);
        for queue in &delta.queues {
            assert_eq!(queue.rates, Rates::Unavailable(RateUnavailable::FirstPoll));
        }
        assert_eq!(delta.get("a").unwrap().state, ActivityState::Mixed);
        assert_eq!(delta.get("b").unwrap().state, ActivityState::Idle);
        assert_eq!(
            kinds(&delta),
            vec![
                ("a".to_string(), EventKind::QueueCreated, 12),
                ("b".to_string(), EventKind::QueueCreated, 0),
            ]
        );
    }

    #[test]
    fn test_self_diff_is_idle() {
        let prev = snapshot(0, &[("a", 10, 2), ("b", 7, 0)]);
        let mut curr = prev.clone();
        curr.taken_at = prev.taken_at + Duration::seconds(3);

        let delta = diff(Some(&prev), &curr, &DeltaOptions::default());

        assert!(delta.queues.iter().all(|q| q.state == ActivityState::Idle));
        assert!(delta.events.is_empty());
        for queue in &delta.queues {
            assert!(queue.rates.sample().unwrap().is_zero());
        }
    }

    #[test]
    fn test_removed_queue() {
        let prev = snapshot(0, &[("stays", 1, 0), ("gone", 40, 2)]);
        let curr = snapshot(1, &[("stays", 1, 0)]);

        let delta = diff(Some(&prev), &curr, &DeltaOptions::default());

        assert!(delta.get("gone").is_none());
        assert_eq!(
            kinds(&delta),
            vec![("gone".to_string(), EventKind::QueueRemoved, -42)]
        );
    }

    #[test]
    fn test_created_queue_mid_run() {
        let prev = snapshot(0, &[("old", 1, 0)]);
        let curr = snapshot(5, &[("old", 1, 0), ("new", 30, 0)]);

        let delta = diff(Some(&prev), &curr, &DeltaOptions::default());
        let created = delta.get("new").unwrap();

        assert_eq!(created.state, ActivityState::Publishing);
        let rates = created.rates.sample().unwrap();
        assert_eq!(rates.publish, 30.0 / 5.0);
        assert_eq!(rates.deliver, 0.0);
        assert_eq!(rates.ack, 0.0);
        assert_eq!(
            kinds(&delta),
            vec![("new".to_string(), EventKind::QueueCreated, 30)]
        );
    }

    #[test]
    fn test_clock_anomaly_suppresses_rates() {
        let prev = snapshot(10, &[("a", 1, 0)]);
        let curr = snapshot(10, &[("a", 5, 0)]);

        let delta = diff(Some(&prev), &curr, &DeltaOptions::default());
        let queue = delta.get("a").unwrap();

        assert_eq!(queue.rates, Rates::Unavailable(RateUnavailable::ClockAnomaly));
        assert_eq!(queue.state, ActivityState::Publishing);
        assert_eq!(kinds(&delta), vec![("a".to_string(), EventKind::NetIncrease, 4)]);

        let earlier = snapshot(5, &[("a", 5, 0)]);
        let delta = diff(Some(&prev), &earlier, &DeltaOptions::default());
        assert_eq!(
            delta.get("a").unwrap().rates,
            Rates::Unavailable(RateUnavailable::ClockAnomaly)
        );
    }

    #[test]
    fn test_rates_are_delta_over_elapsed() {
        let prev = snapshot(0, &[("a", 100, 10)]);
        let curr = snapshot(8, &[("a", 20, 50)]);

        let delta = diff(Some(&prev), &curr, &DeltaOptions::default());
        let rates = delta.get("a").unwrap().rates.sample().copied().unwrap();

        // 80 left ready, 40 of them are still unacked: 80 delivered, 40 acked.
        assert_eq!(rates.deliver, 80.0 / 8.0);
        assert_eq!(rates.ack, 40.0 / 8.0);
        assert_eq!(rates.publish, 0.0);
    }

    #[test]
    fn test_event_threshold() {
        let prev = snapshot(0, &[("a", 100, 0), ("b", 100, 0)]);
        let curr = snapshot(1, &[("a", 150, 0), ("b", 300, 0)]);

        let options = DeltaOptions { event_threshold: 100 };
        let delta = diff(Some(&prev), &curr, &options);

        assert_eq!(
            kinds(&delta),
            vec![("b".to_string(), EventKind::NetIncrease, 200)]
        );
    }

    #[test]
    fn test_consumer_changes() {
        let prev = Snapshot::new(at(0), vec![QueueMetric::new("a", 0, 0, 1)]);
        let curr = Snapshot::new(at(1), vec![QueueMetric::new("a", 0, 0, 3)]);

        let delta = diff(Some(&prev), &curr, &DeltaOptions::default());
        assert_eq!(
            kinds(&delta),
            vec![("a".to_string(), EventKind::ConsumersAttached, 2)]
        );

        let later = Snapshot::new(at(2), vec![QueueMetric::new("a", 0, 0, 1)]);
        let delta = diff(Some(&curr), &later, &DeltaOptions::default());
        assert_eq!(
            kinds(&delta),
            vec![("a".to_string(), EventKind::ConsumersDetached, -2)]
        );
    }

    #[test]
    fn test_event_order() {
        let prev = snapshot(0, &[("x", 1, 0), ("y", 1, 0), ("z", 1, 0)]);
        let curr = snapshot(1, &[("w", 3, 0), ("y", 4, 0)]);

        let delta = diff(Some(&prev), &curr, &DeltaOptions::default());
        assert_eq!(
            kinds(&delta),
            vec![
                ("w".to_string(), EventKind::QueueCreated, 3),
                ("y".to_string(), EventKind::NetIncrease, 3),
                ("x".to_string(), EventKind::QueueRemoved, -1),
                ("z".to_string(), EventKind::QueueRemoved, -1),
            ]
        );
    }
}
