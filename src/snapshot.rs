//! Statistics as returned by the RabbitMQ management API.
//!
//! Every field defaults to zero so that a failed fetch, an idle broker
//! (no `message_stats` section) or a `null` value all decode to the same
//! zero-valued snapshot. A `null` in one field never fails the whole body.

use serde::{Deserialize, Deserializer};

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Rate {
    #[serde(deserialize_with = "null_as_default")]
    pub rate: f64,
}

impl Rate {
    pub fn new(rate: f64) -> Self {
        Self { rate }
    }

    /// Rate truncated toward zero, as fed into the deliver/publish ratio.
    pub fn whole(&self) -> i64 {
        self.rate as i64
    }
}

/// Cumulative message counters with their current rates.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct MessageStats {
    #[serde(deserialize_with = "null_as_default")]
    pub deliver_get: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub deliver_get_details: Rate,
    #[serde(deserialize_with = "null_as_default")]
    pub deliver_details: Rate,
    #[serde(deserialize_with = "null_as_default")]
    pub publish: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub publish_details: Rate,
    #[serde(deserialize_with = "null_as_default")]
    pub redeliver: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub redeliver_details: Rate,
    #[serde(deserialize_with = "null_as_default")]
    pub ack_details: Rate,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ObjectTotals {
    #[serde(deserialize_with = "null_as_default")]
    pub queues: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub channels: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub connections: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub consumers: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub exchanges: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct QueueTotals {
    #[serde(deserialize_with = "null_as_default")]
    pub messages: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub messages_ready: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub messages_unacknowledged: i64,
}

/// `GET /api/overview`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct OverviewSnapshot {
    #[serde(deserialize_with = "null_as_default")]
    pub object_totals: ObjectTotals,
    #[serde(deserialize_with = "null_as_default")]
    pub queue_totals: QueueTotals,
    #[serde(deserialize_with = "null_as_default")]
    pub message_stats: MessageStats,
    #[serde(rename = "statistics_db_event_queue", deserialize_with = "null_as_default")]
    pub stats_db_events: i64,
}

/// One entry of `GET /api/nodes`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct NodeSnapshot {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub fd_used: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub fd_total: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub mem_used: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub mem_limit: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub sockets_used: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub sockets_total: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub proc_used: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub proc_total: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub run_queue: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub partitions: Vec<String>,
}

/// `GET /api/aliveness-test/<vhost>`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct AliveSnapshot {
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
}

/// One entry of `GET /api/queues`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct QueueSnapshot {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub vhost: String,
    #[serde(deserialize_with = "null_as_default")]
    pub messages: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub messages_ready: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub messages_unacknowledged: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub message_stats: MessageStats,
    #[serde(deserialize_with = "null_as_default")]
    pub memory: i64,
    #[serde(deserialize_with = "null_as_default")]
    pub consumers: i64,
    /// Fraction of time consumers could take deliveries, in `[0, 1]`.
    #[serde(deserialize_with = "null_as_default")]
    pub consumer_utilisation: f64,
    #[serde(rename = "state", deserialize_with = "null_as_default")]
    pub status: String,
}

impl QueueSnapshot {
    /// Dimension tags shared by every record of this queue.
    pub fn tags(&self) -> String {
        format!("name={},vhost={}", self.name, self.vhost)
    }
}
