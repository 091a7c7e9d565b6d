//! Bounded history of notable queue transitions.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};

/// Default number of events kept in memory.
pub const DEFAULT_EVENT_CAPACITY: usize = 10;

/// What happened to a queue between two polls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// The queue appeared for the first time.
    QueueCreated,
    /// The queue was present in the previous poll but not this one.
    QueueRemoved,
    /// Total message count went up.
    NetIncrease,
    /// Total message count went down.
    NetDecrease,
    /// More consumers are attached than before.
    ConsumersAttached,
    /// Fewer consumers are attached than before.
    ConsumersDetached,
}

impl EventKind {
    /// Short icon for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            EventKind::QueueCreated => "🆕",
            EventKind::QueueRemoved => "🗑",
            EventKind::NetIncrease => "📥",
            EventKind::NetDecrease => "📤",
            EventKind::ConsumersAttached => "👤",
            EventKind::ConsumersDetached => "👋",
        }
    }
}

/// A single immutable log entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub at: DateTime<Utc>,
    pub queue: String,
    pub kind: EventKind,
    /// Signed size of the change (messages, or consumers for consumer events).
    pub magnitude: i64,
}

impl Event {
    pub fn new(at: DateTime<Utc>, queue: impl Into<String>, kind: EventKind, magnitude: i64) -> Self {
        Self {
            at,
            queue: queue.into(),
            kind,
            magnitude,
        }
    }
}

/// Fixed-capacity FIFO of events.
///
/// Once full, every new entry evicts the oldest one. A capacity of zero
/// keeps nothing.
#[derive(Debug, Clone)]
pub struct EventLog {
    entries: VecDeque<Event>,
    capacity: usize,
}

impl Default for EventLog {
    fn default() -> Self {
        Self::new(DEFAULT_EVENT_CAPACITY)
    }
}

impl EventLog {
    /// Create an empty log holding at most `capacity` events.
    ///
    /// Storage grows on demand, so a huge `capacity` costs nothing up front.
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            capacity,
        }
    }

    /// Append events in order, evicting the oldest on overflow.
    pub fn record<I>(&mut self, events: I)
    where
        I: IntoIterator<Item = Event>,
    {
        if self.capacity == 0 {
            return;
        }
        for event in events {
            if self.entries.len() == self.capacity {
                self.entries.pop_front();
            }
            self.entries.push_back(event);
        }
    }

    /// The last `n` events, oldest first and most recent last.
    pub fn recent(&self, n: usize) -> impl Iterator<Item = &Event> + '_ {
        let skip = self.entries.len().saturating_sub(n);
        self.entries.iter().skip(skip)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> + '_ {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
