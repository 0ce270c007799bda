use chrono::Utc;
use serde::Serialize;
use std::fmt;

/// Name prefix of broker-wide metrics.
pub const OVERVIEW_PREFIX: &str = "rabbitmq.overview.";
/// Name prefix of per-queue metrics.
pub const QUEUE_PREFIX: &str = "rabbitmq.queue.";

/// Metric value, kept as the integer or float the source field produced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricValue {
    Int(i64),
    Float(f64),
}

impl From<i64> for MetricValue {
    fn from(value: i64) -> Self {
        MetricValue::Int(value)
    }
}

impl From<f64> for MetricValue {
    fn from(value: f64) -> Self {
        MetricValue::Float(value)
    }
}

impl fmt::Display for MetricValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricValue::Int(v) => write!(f, "{v}"),
            MetricValue::Float(v) => write!(f, "{v}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CounterType {
    /// Instantaneous value, not a monotonically increasing counter.
    #[default]
    Gauge,
}

impl fmt::Display for CounterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CounterType::Gauge => write!(f, "GAUGE"),
        }
    }
}

/// One normalized observation, serialized in the falcon push format.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricRecord {
    endpoint: String,
    metric: String,
    value: MetricValue,
    #[serde(rename = "counterType")]
    counter_type: CounterType,
    tags: String,
    timestamp: i64,
    step: i64,
}

impl MetricRecord {
    pub fn metric(&self) -> &str {
        &self.metric
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn value(&self) -> MetricValue {
        self.value
    }

    pub fn counter_type(&self) -> CounterType {
        self.counter_type
    }

    pub fn tags(&self) -> &str {
        &self.tags
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    pub fn step(&self) -> i64 {
        self.step
    }

    /// Replace the value; the only mutation a record allows.
    pub fn set_value(&mut self, value: impl Into<MetricValue>) {
        self.value = value.into();
    }
}

impl fmt::Display for MetricRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "metric={} endpoint={} value={} counterType={} tags={} timestamp={} step={}",
            self.metric,
            self.endpoint,
            self.value,
            self.counter_type,
            self.tags,
            self.timestamp,
            self.step,
        )
    }
}

/// Endpoint, timestamp and step shared by every record of one cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordStamp {
    endpoint: String,
    timestamp: i64,
    step: i64,
}

impl RecordStamp {
    /// Stamp taken at the current wall-clock second.
    pub fn now(endpoint: impl Into<String>, step: i64) -> Self {
        Self::at(endpoint, step, Utc::now().timestamp())
    }

    pub fn at(endpoint: impl Into<String>, step: i64, timestamp: i64) -> Self {
        Self {
            endpoint: endpoint.into(),
            timestamp,
            step,
        }
    }

    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Build a gauge record; `metric` is the fully-qualified name.
    pub fn gauge(
        &self,
        metric: impl Into<String>,
        value: impl Into<MetricValue>,
        tags: impl Into<String>,
    ) -> MetricRecord {
        MetricRecord {
            endpoint: self.endpoint.clone(),
            metric: metric.into(),
            value: value.into(),
            counter_type: CounterType::Gauge,
            tags: tags.into(),
            timestamp: self.timestamp,
            step: self.step,
        }
    }
}
