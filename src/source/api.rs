//! Response shapes of the RabbitMQ Management HTTP API.
//!
//! Only the fields the dashboard needs are declared; everything is
//! defaulted so partially populated objects (fresh queues, nodes without
//! stats) still parse.

use serde::Deserialize;

use crate::data::{BrokerInfo, ConnectionInfo, ConsumerInfo, QueueMetric, ResourceMetrics};

/// Queue information from `/api/queues`.
#[derive(Debug, Deserialize)]
pub(crate) struct QueueInfo {
    pub name: String,
    #[serde(default)]
    pub vhost: String,
    #[serde(default)]
    pub messages_ready: u64,
    #[serde(default)]
    pub messages_unacknowledged: u64,
    #[serde(default)]
    pub consumers: u32,
}

impl QueueInfo {
    pub fn into_metric(self, scoped: bool) -> QueueMetric {
        let name = qualified_name(&self.vhost, self.name, scoped);
        QueueMetric::new(
            name,
            self.messages_ready,
            self.messages_unacknowledged,
            self.consumers,
        )
    }
}

/// Consumer information from `/api/consumers`.
#[derive(Debug, Deserialize)]
pub(crate) struct ConsumerEntry {
    #[serde(default)]
    pub consumer_tag: String,
    pub queue: QueueRef,
    /// An object normally, but older brokers send `[]` for closed channels.
    #[serde(default)]
    pub channel_details: serde_json::Value,
}

#[derive(Debug, Deserialize)]
pub(crate) struct QueueRef {
    pub name: String,
    #[serde(default)]
    pub vhost: String,
}

impl ConsumerEntry {
    pub fn into_info(self, scoped: bool) -> ConsumerInfo {
        let connection = self
            .channel_details
            .get("connection_name")
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();
        ConsumerInfo {
            queue: qualified_name(&self.queue.vhost, self.queue.name, scoped),
            tag: self.consumer_tag,
            connection,
        }
    }
}

/// Connection information from `/api/connections`.
#[derive(Debug, Deserialize)]
pub(crate) struct ConnectionEntry {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub user: String,
    #[serde(default)]
    pub client_properties: ClientProperties,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ClientProperties {
    #[serde(default)]
    pub connection_name: Option<String>,
}

impl From<ConnectionEntry> for ConnectionInfo {
    fn from(entry: ConnectionEntry) -> Self {
        ConnectionInfo {
            name: entry.name,
            user: entry.user,
            client_name: entry.client_properties.connection_name,
        }
    }
}

/// Node statistics from `/api/nodes`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct NodeInfo {
    pub mem_used: u64,
    pub mem_limit: u64,
    pub disk_free: u64,
    pub disk_free_limit: u64,
    pub fd_used: u64,
    pub fd_total: u64,
    pub sockets_used: u64,
    pub sockets_total: u64,
    pub proc_used: u64,
    pub proc_total: u64,
    pub uptime: u64,
}

impl From<NodeInfo> for ResourceMetrics {
    fn from(node: NodeInfo) -> Self {
        ResourceMetrics {
            memory_used: node.mem_used,
            memory_limit: node.mem_limit,
            disk_free: node.disk_free,
            disk_free_limit: node.disk_free_limit,
            fd_used: node.fd_used,
            fd_total: node.fd_total,
            sockets_used: node.sockets_used,
            sockets_total: node.sockets_total,
            proc_used: node.proc_used,
            proc_total: node.proc_total,
            uptime_ms: node.uptime,
        }
    }
}

/// Cluster overview from `/api/overview`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(crate) struct Overview {
    pub product_name: Option<String>,
    pub product_version: Option<String>,
    pub rabbitmq_version: Option<String>,
    pub cluster_name: Option<String>,
}

impl From<Overview> for BrokerInfo {
    fn from(overview: Overview) -> Self {
        BrokerInfo {
            product: overview.product_name.unwrap_or_else(|| "RabbitMQ".to_string()),
            version: overview
                .product_version
                .or(overview.rabbitmq_version)
                .unwrap_or_default(),
            cluster: overview.cluster_name.unwrap_or_default(),
        }
    }
}

/// Keep queue names unique across vhosts when not scoped to one.
fn qualified_name(vhost: &str, name: String, scoped: bool) -> String {
    if scoped || vhost.is_empty() || vhost == "/" {
        name
    } else {
        format!("{}/{}", vhost, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_defaults() {
        let json = r#"[
            {"name": "fresh", "vhost": "/"},
            {"name": "busy", "vhost": "/", "messages_ready": 100, "messages_unacknowledged": 5, "consumers": 2, "messages": 105}
        ]"#;
        let queues: Vec<QueueInfo> = serde_json::from_str(json).unwrap();
        let metrics: Vec<QueueMetric> = queues.into_iter().map(|q| q.into_metric(false)).collect();

        assert_eq!(metrics[0], QueueMetric::new("fresh", 0, 0, 0));
        assert_eq!(metrics[1], QueueMetric::new("busy", 100, 5, 2));
        assert_eq!(metrics[1].total(), 105);
    }

    #[test]
    fn test_vhost_qualification() {
        let json = r#"{"name": "orders", "vhost": "staging"}"#;
        let queue: QueueInfo = serde_json::from_str(json).unwrap();
        assert_eq!(queue.into_metric(false).name, "staging/orders");

        let queue: QueueInfo = serde_json::from_str(json).unwrap();
        assert_eq!(queue.into_metric(true).name, "orders");
    }

    #[test]
    fn test_consumer_channel_details() {
        let json = r#"[
            {"consumer_tag": "ctag-1", "queue": {"name": "work", "vhost": "/"},
             "channel_details": {"connection_name": "10.0.0.5:5000 -> 10.0.0.1:5672"}},
            {"consumer_tag": "ctag-2", "queue": {"name": "work", "vhost": "/"},
             "channel_details": []}
        ]"#;
        let consumers: Vec<ConsumerEntry> = serde_json::from_str(json).unwrap();
        let infos: Vec<ConsumerInfo> = consumers.into_iter().map(|c| c.into_info(false)).collect();

        assert_eq!(infos[0].connection, "10.0.0.5:5000 -> 10.0.0.1:5672");
        assert_eq!(infos[0].tag, "ctag-1");
        assert_eq!(infos[1].connection, "");
        assert_eq!(infos[1].queue, "work");
    }

    #[test]
    fn test_connection_client_name() {
        let json = r#"{"name": "c1", "user": "app", "client_properties": {"connection_name": "worker-1"}}"#;
        let conn: ConnectionInfo = serde_json::from_str::<ConnectionEntry>(json).unwrap().into();
        assert_eq!(conn.display_name(), "worker-1");
        assert_eq!(conn.user, "app");

        let bare: ConnectionInfo = serde_json::from_str::<ConnectionEntry>(r#"{"name": "c2"}"#)
            .unwrap()
            .into();
        assert_eq!(bare.client_name, None);
        assert_eq!(bare.display_name(), "c2");
    }

    #[test]
    fn test_node_and_overview() {
        let node: NodeInfo =
            serde_json::from_str(r#"{"mem_used": 100, "mem_limit": 400, "uptime": 60000}"#)
                .unwrap();
        let resources = ResourceMetrics::from(node);
        assert_eq!(resources.memory_used, 100);
        assert_eq!(resources.uptime_ms, 60_000);
        assert_eq!(resources.fd_total, 0);

        let overview: Overview = serde_json::from_str(
            r#"{"rabbitmq_version": "3.12.4", "cluster_name": "rabbit@node1"}"#,
        )
        .unwrap();
        let broker = BrokerInfo::from(overview);
        assert_eq!(broker.product, "RabbitMQ");
        assert_eq!(broker.version, "3.12.4");
        assert_eq!(broker.cluster, "rabbit@node1");
    }
}
