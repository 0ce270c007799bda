//! Push sink for the Open-Falcon agent HTTP API.

use crate::collectors::MetricSink;
use crate::errors::PushError;
use crate::metric::MetricRecord;
use async_trait::async_trait;
use std::time::Duration;

pub const DEFAULT_PUSH_URL: &str = "http://127.0.0.1:1988/v1/push";

pub struct FalconSink {
    client: reqwest::Client,
    push_url: String,
}

impl FalconSink {
    pub fn new(push_url: impl Into<String>, timeout: Duration) -> Result<Self, PushError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(PushError::Client)?;
        Ok(Self {
            client,
            push_url: push_url.into(),
        })
    }
}

#[async_trait]
impl MetricSink for FalconSink {
    fn target(&self) -> &str {
        &self.push_url
    }

    /// One POST with the whole batch as a JSON array. Not retried.
    async fn send(&self, records: &[MetricRecord]) -> Result<(), PushError> {
        let response = self
            .client
            .post(&self.push_url)
            .json(records)
            .send()
            .await
            .map_err(|source| PushError::Request {
                target: self.push_url.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PushError::Status {
                target: self.push_url.clone(),
                records: records.len(),
                status: status.as_u16(),
            });
        }
        tracing::debug!(records = records.len(), "push accepted");
        Ok(())
    }
}
