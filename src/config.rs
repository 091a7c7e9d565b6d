//! Layered runtime settings.
//!
//! Values come from, in increasing priority: built-in defaults,
//! `QUEUEWATCH_*` environment variables, command-line flags.

use std::time::Duration;

use config::{Config, ConfigError, Environment, Map};
use serde::Deserialize;

use crate::data::{DeltaOptions, Thresholds};

/// Prefix for environment variables (`QUEUEWATCH_PASSWORD`, ...).
pub const ENV_PREFIX: &str = "QUEUEWATCH";

pub const DEFAULT_URL: &str = "http://localhost:15672";

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Settings {
    /// Management API base URL.
    pub url: String,
    pub username: String,
    pub password: String,
    /// Restrict the dashboard to one vhost.
    #[serde(default)]
    pub vhost: Option<String>,
    /// Seconds between refreshes; 0 renders once.
    pub interval: u64,
    /// Render a single frame and exit.
    pub once: bool,
    /// Request timeout in seconds.
    pub timeout: u64,
    pub event_capacity: usize,
    /// How many events the activity section shows.
    pub recent_events: usize,
    pub event_threshold: u64,
    pub backlog_warning: u64,
    pub backlog_critical: u64,
    /// Stop after this many refresh cycles.
    #[serde(default)]
    pub iterations: Option<u64>,
}

/// Values given on the command line; `None` means "not given".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub vhost: Option<String>,
    pub interval: Option<u64>,
    pub once: bool,
    pub timeout: Option<u64>,
    pub event_capacity: Option<u64>,
    pub recent_events: Option<u64>,
    pub event_threshold: Option<u64>,
    pub backlog_warning: Option<u64>,
    pub backlog_critical: Option<u64>,
    pub iterations: Option<u64>,
}

impl Settings {
    /// Resolve settings from the process environment and CLI overrides.
    pub fn load(overrides: &Overrides) -> Result<Self, ConfigError> {
        Self::resolve(overrides, None)
    }

    /// Resolve settings, reading environment variables from `env` when given.
    pub fn resolve(
        overrides: &Overrides,
        env: Option<Map<String, String>>,
    ) -> Result<Self, ConfigError> {
        let environment = Environment::with_prefix(ENV_PREFIX).source(env);

        let builder = Config::builder()
            .set_default("url", DEFAULT_URL)?
            .set_default("username", "guest")?
            .set_default("password", "guest")?
            .set_default("interval", 3u64)?
            .set_default("once", false)?
            .set_default("timeout", 10u64)?
            .set_default("event_capacity", 10u64)?
            .set_default("recent_events", 10u64)?
            .set_default("event_threshold", 0u64)?
            .set_default("backlog_warning", 1u64)?
            .set_default("backlog_critical", 1000u64)?
            .add_source(environment)
            .set_override_option("url", overrides.url.clone())?
            .set_override_option("username", overrides.username.clone())?
            .set_override_option("password", overrides.password.clone())?
            .set_override_option("vhost", overrides.vhost.clone())?
            .set_override_option("interval", overrides.interval)?
            .set_override_option("once", overrides.once.then_some(true))?
            .set_override_option("timeout", overrides.timeout)?
            .set_override_option("event_capacity", overrides.event_capacity)?
            .set_override_option("recent_events", overrides.recent_events)?
            .set_override_option("event_threshold", overrides.event_threshold)?
            .set_override_option("backlog_warning", overrides.backlog_warning)?
            .set_override_option("backlog_critical", overrides.backlog_critical)?
            .set_override_option("iterations", overrides.iterations)?;

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.url.trim().is_empty() {
            return Err(ConfigError::Message("url must not be empty".to_string()));
        }
        if self.timeout == 0 {
            return Err(ConfigError::Message(
                "timeout must be at least 1 second".to_string(),
            ));
        }
        if self.backlog_warning > self.backlog_critical {
            return Err(ConfigError::Message(format!(
                "backlog_warning ({}) exceeds backlog_critical ({})",
                self.backlog_warning, self.backlog_critical
            )));
        }
        Ok(())
    }

    /// Time between refreshes, or `None` for one-shot mode.
    pub fn refresh_interval(&self) -> Option<Duration> {
        if self.once || self.interval == 0 {
            None
        } else {
            Some(Duration::from_secs(self.interval))
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn thresholds(&self) -> Thresholds {
        Thresholds {
            backlog_warning: self.backlog_warning,
            backlog_critical: self.backlog_critical,
        }
    }

    pub fn delta_options(&self) -> DeltaOptions {
        DeltaOptions {
            event_threshold: self.event_threshold,
        }
    }
}
