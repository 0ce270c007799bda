pub mod overview;
pub mod queues;

use crate::errors::{FetchError, PushError};
use crate::metric::{MetricRecord, RecordStamp};
use crate::snapshot::{AliveSnapshot, NodeSnapshot, OverviewSnapshot, QueueSnapshot};
use async_trait::async_trait;

/// Where broker statistics come from.
#[async_trait]
pub trait StatsSource: Send + Sync {
    /// whether the management API answers at all; never errors.
    async fn probe_liveness(&self) -> bool;

    async fn fetch_overview(&self) -> Result<OverviewSnapshot, FetchError>;

    async fn fetch_node(&self) -> Result<NodeSnapshot, FetchError>;

    async fn fetch_alive(&self) -> Result<AliveSnapshot, FetchError>;

    async fn fetch_queues(&self) -> Result<Vec<QueueSnapshot>, FetchError>;
}

/// Where a cycle's records are pushed, once per cycle.
#[async_trait]
pub trait MetricSink: Send + Sync {
    /// destination as shown in logs
    fn target(&self) -> &str;

    async fn send(&self, records: &[MetricRecord]) -> Result<(), PushError>;
}

/// Settings a collector is built with; never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectorSettings {
    pub endpoint: String,
    /// collection interval in seconds, stamped on every record
    pub step: i64,
    /// lower-cased substrings marking a queue state as healthy
    pub healthy_states: Vec<String>,
    /// log every record before sending
    pub verbose: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Liveness {
    Healthy,
    Unhealthy,
}

/// Runs one collection cycle: probe, build records, push.
pub struct Collector<S, K> {
    source: S,
    sink: K,
    settings: CollectorSettings,
}

impl<S: StatsSource, K: MetricSink> Collector<S, K> {
    pub fn new(source: S, sink: K, settings: CollectorSettings) -> Self {
        Self {
            source,
            sink,
            settings,
        }
    }

    pub fn settings(&self) -> &CollectorSettings {
        &self.settings
    }

    pub fn sink(&self) -> &K {
        &self.sink
    }

    pub async fn check_liveness(&self) -> Liveness {
        if self.source.probe_liveness().await {
            Liveness::Healthy
        } else {
            Liveness::Unhealthy
        }
    }

    /// Build this cycle's records without sending them.
    pub async fn collect(&self) -> Vec<MetricRecord> {
        let stamp = RecordStamp::now(self.settings.endpoint.as_str(), self.settings.step);
        self.collect_at(&stamp).await
    }

    /// Build this cycle's records under an already captured stamp.
    pub(crate) async fn collect_at(&self, stamp: &RecordStamp) -> Vec<MetricRecord> {
        match self.check_liveness().await {
            Liveness::Unhealthy => {
                tracing::error!("cannot connect to rabbitmq management api");
                vec![overview::down_record(stamp)]
            }
            Liveness::Healthy => {
                let ov = or_zeroed("overview", self.source.fetch_overview().await);
                let node = or_zeroed("node", self.source.fetch_node().await);
                let alive = or_zeroed("aliveness", self.source.fetch_alive().await);
                let mut records = overview::overview_records(stamp, &ov, &node, &alive);

                let queues = or_zeroed("queues", self.source.fetch_queues().await);
                records.extend(queues::queue_records(
                    stamp,
                    &queues,
                    &self.settings.healthy_states,
                ));
                records
            }
        }
    }

    /// Collect and push one batch. Returns the number of records sent.
    pub async fn run_cycle(&self) -> Result<usize, PushError> {
        let records = self.collect().await;

        tracing::info!(
            target_api = self.sink.target(),
            size = records.len(),
            "sending metrics"
        );
        if self.settings.verbose {
            for record in &records {
                tracing::info!("{record}");
            }
        }

        self.sink.send(&records).await?;
        Ok(records.len())
    }
}

/// Failed fetches degrade to a zero-valued snapshot.
fn or_zeroed<T: Default>(source: &str, fetched: Result<T, FetchError>) -> T {
    fetched.unwrap_or_else(|e| {
        tracing::warn!(source, error = %e, "fetch failed, using zeroed snapshot");
        T::default()
    })
}
