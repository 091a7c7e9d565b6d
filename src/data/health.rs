//! Backlog health classification for queue cards.

/// Thresholds for colouring a queue by its backlog.
///
/// A queue whose total is below `backlog_warning` is healthy, below
/// `backlog_critical` it is in warning, otherwise critical.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thresholds {
    /// Total message count that triggers a warning.
    pub backlog_warning: u64,
    /// Total message count that triggers critical status.
    pub backlog_critical: u64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            backlog_warning: 1,
            backlog_critical: 1000,
        }
    }
}

impl Thresholds {
    pub fn classify(&self, backlog: u64) -> HealthStatus {
        if backlog >= self.backlog_critical {
            HealthStatus::Critical
        } else if backlog >= self.backlog_warning {
            HealthStatus::Warning
        } else {
            HealthStatus::Healthy
        }
    }
}

/// Health status for a queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HealthStatus {
    Healthy,
    Warning,
    Critical,
}

impl HealthStatus {
    /// Returns a short symbol for display.
    pub fn symbol(&self) -> &'static str {
        match self {
            HealthStatus::Healthy => "OK",
            HealthStatus::Warning => "WARN",
            HealthStatus::Critical => "CRIT",
        }
    }
}
