//! RabbitMQ source using the Management HTTP API.
//!
//! Queries the Management API (typically on port 15672) with basic auth.
//!
//! ## Endpoints
//!
//! - `/api/queues` ready/unacked counts and consumers per queue (required)
//! - `/api/consumers` consumer tags and their connections (required)
//! - `/api/connections` client connections (required)
//! - `/api/nodes` memory, disk, file descriptors, uptime (optional)
//! - `/api/overview` broker version and cluster name (optional)
//!
//! Optional endpoints that fail (a user without the `monitoring` tag is
//! refused `/api/nodes`, for instance) leave the matching snapshot field
//! empty instead of failing the poll.
//!
//! ## Example
//!
//! ```rust,no_run
//! use queuewatch::source::ManagementApi;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let api = ManagementApi::builder()
//!     .endpoint("http://localhost:15672")
//!     .credentials("guest", "guest")
//!     .build()?;
//!
//! let snapshot = api.collect().await?;
//! for queue in &snapshot.queues {
//!     println!("{}: {} ready, {} unacked", queue.name, queue.ready, queue.unacked);
//! }
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use chrono::Utc;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use tracing::debug;

use super::api::{ConnectionEntry, ConsumerEntry, NodeInfo, Overview, QueueInfo};
use super::SnapshotSource;
use crate::data::{BrokerInfo, ResourceMetrics, Snapshot};
use crate::error::SourceError;

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Async client for the Management API.
#[derive(Debug, Clone)]
pub struct ManagementApi {
    client: Client,
    endpoint: String,
    username: String,
    password: String,
    vhost: Option<String>,
}

impl ManagementApi {
    /// Create a new builder for configuring the client.
    pub fn builder() -> ManagementApiBuilder {
        ManagementApiBuilder::default()
    }

    /// The base URL requests are sent to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Collect one snapshot of queues, consumers, connections and node stats.
    pub async fn collect(&self) -> Result<Snapshot, SourceError> {
        let scoped = self.vhost.is_some();

        let queues_path = self.vhost_path("queues");
        let consumers_path = self.vhost_path("consumers");
        let connections_path = self.connections_path();
        let (queues, consumers, connections) = tokio::try_join!(
            self.get_json::<Vec<QueueInfo>>(&queues_path),
            self.get_json::<Vec<ConsumerEntry>>(&consumers_path),
            self.get_json::<Vec<ConnectionEntry>>(&connections_path),
        )?;

        let (nodes, overview) = tokio::join!(
            self.get_json::<Vec<NodeInfo>>("/api/nodes"),
            self.get_json::<Overview>("/api/overview"),
        );

        let resources = optional("nodes", nodes)
            .and_then(|nodes| nodes.into_iter().next())
            .map(ResourceMetrics::from);
        let broker = optional("overview", overview).map(BrokerInfo::from);

        let snapshot = Snapshot::new(
            Utc::now(),
            queues.into_iter().map(|q| q.into_metric(scoped)).collect(),
        )
        .with_consumers(consumers.into_iter().map(|c| c.into_info(scoped)).collect())
        .with_connections(connections.into_iter().map(Into::into).collect())
        .with_resources(resources)
        .with_broker(broker);

        debug!(
            queues = snapshot.queues.len(),
            consumers = snapshot.consumer_count(),
            connections = snapshot.connection_count(),
            "Collected snapshot"
        );

        Ok(snapshot)
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, SourceError> {
        let url = format!("{}{}", self.endpoint, path);

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(SourceError::AuthFailed(format!(
                "{} rejected credentials for user '{}' ({})",
                path, self.username, status
            )));
        }

        if !status.is_success() {
            return Err(SourceError::Unreachable(format!(
                "{} returned status {}",
                path, status
            )));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| SourceError::Malformed(format!("{}: {}", path, e)))
    }

    fn vhost_path(&self, resource: &str) -> String {
        match &self.vhost {
            Some(vhost) => format!("/api/{}/{}", resource, urlencoded(vhost)),
            None => format!("/api/{}", resource),
        }
    }

    fn connections_path(&self) -> String {
        match &self.vhost {
            Some(vhost) => format!("/api/vhosts/{}/connections", urlencoded(vhost)),
            None => "/api/connections".to_string(),
        }
    }
}

fn optional<T>(what: &str, result: Result<T, SourceError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            debug!("Optional {} endpoint unavailable: {}", what, e);
            None
        }
    }
}

/// Builder for [`ManagementApi`].
#[derive(Debug, Default)]
pub struct ManagementApiBuilder {
    endpoint: Option<String>,
    username: Option<String>,
    password: Option<String>,
    vhost: Option<String>,
    timeout: Option<Duration>,
}

impl ManagementApiBuilder {
    /// Set the Management API endpoint (e.g., "http://localhost:15672").
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Set the username and password for authentication.
    pub fn credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    /// Restrict queues, consumers and connections to one vhost.
    pub fn vhost(mut self, vhost: Option<String>) -> Self {
        self.vhost = vhost;
        self
    }

    /// Set the request timeout (default: 10 seconds).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<ManagementApi, reqwest::Error> {
        let client = Client::builder()
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()?;

        let endpoint = self
            .endpoint
            .unwrap_or_else(|| "http://localhost:15672".to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(ManagementApi {
            client,
            endpoint,
            username: self.username.unwrap_or_else(|| "guest".to_string()),
            password: self.password.unwrap_or_else(|| "guest".to_string()),
            vhost: self.vhost,
        })
    }
}

/// Blocking [`SnapshotSource`] over a [`ManagementApi`].
///
/// Owns a current-thread runtime and drives one request batch per
/// [`fetch`](SnapshotSource::fetch), so the refresh loop stays synchronous.
#[derive(Debug)]
pub struct ManagementApiSource {
    api: ManagementApi,
    runtime: tokio::runtime::Runtime,
    description: String,
}

impl ManagementApiSource {
    pub fn new(api: ManagementApi) -> std::io::Result<Self> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let description = format!("api: {}", api.endpoint());
        Ok(Self {
            api,
            runtime,
            description,
        })
    }
}

impl SnapshotSource for ManagementApiSource {
    fn fetch(&mut self) -> Result<Snapshot, SourceError> {
        debug!(endpoint = %self.api.endpoint(), "Polling management API");
        self.runtime.block_on(self.api.collect())
    }

    fn description(&self) -> &str {
        &self.description
    }
}

// URL encode a vhost for use in paths
fn urlencoded(s: &str) -> String {
    s.replace('%', "%25").replace('/', "%2F")
}
