//! HTTP client for the RabbitMQ management plugin.

use crate::collectors::StatsSource;
use crate::errors::FetchError;
use crate::snapshot::{AliveSnapshot, NodeSnapshot, OverviewSnapshot, QueueSnapshot};
use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ManagementConfig {
    /// e.g. `http://127.0.0.1:15672`
    pub api_url: String,
    pub username: String,
    pub password: String,
    /// Node to report on; the first node listed when unset.
    pub node: Option<String>,
    /// Vhost used for the aliveness test.
    pub aliveness_vhost: String,
    pub timeout: Duration,
}

pub struct ManagementClient {
    client: reqwest::Client,
    base: Url,
    username: String,
    password: String,
    node: Option<String>,
    aliveness_vhost: String,
}

impl ManagementClient {
    pub fn new(config: &ManagementConfig) -> Result<Self, FetchError> {
        let base = Url::parse(config.api_url.trim()).map_err(|_| FetchError::InvalidUrl {
            url: config.api_url.clone(),
        })?;
        if base.cannot_be_a_base() {
            return Err(FetchError::InvalidUrl {
                url: config.api_url.clone(),
            });
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(FetchError::Client)?;

        Ok(Self {
            client,
            base,
            username: config.username.clone(),
            password: config.password.clone(),
            node: config.node.clone(),
            aliveness_vhost: config.aliveness_vhost.clone(),
        })
    }

    /// Append percent-encoded path segments to the base url.
    fn url(&self, segments: &[&str]) -> Result<Url, FetchError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| FetchError::InvalidUrl {
                url: self.base.to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get(&self, url: Url) -> Result<reqwest::Response, reqwest::Error> {
        self.client
            .get(url)
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await
    }

    async fn get_json<T: DeserializeOwned>(&self, segments: &[&str]) -> Result<T, FetchError> {
        let url = self.url(segments)?;
        let endpoint = url.path().to_string();

        let response = self
            .get(url)
            .await
            .map_err(|source| FetchError::Request {
                endpoint: endpoint.clone(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                endpoint,
                status: status.as_u16(),
            });
        }

        let body = response
            .bytes()
            .await
            .map_err(|source| FetchError::Request {
                endpoint: endpoint.clone(),
                source,
            })?;
        serde_json::from_slice(&body).map_err(|source| FetchError::Decode { endpoint, source })
    }
}

#[async_trait]
impl StatsSource for ManagementClient {
    async fn probe_liveness(&self) -> bool {
        let url = match self.url(&["api", "whoami"]) {
            Ok(url) => url,
            Err(e) => {
                tracing::debug!(error = %e, "liveness probe url");
                return false;
            }
        };
        match self.get(url).await {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                tracing::debug!(status = response.status().as_u16(), "liveness probe rejected");
                false
            }
            Err(e) => {
                tracing::debug!(error = %e, "liveness probe failed");
                false
            }
        }
    }

    async fn fetch_overview(&self) -> Result<OverviewSnapshot, FetchError> {
        self.get_json(&["api", "overview"]).await
    }

    async fn fetch_node(&self) -> Result<NodeSnapshot, FetchError> {
        match &self.node {
            Some(name) => self.get_json(&["api", "nodes", name.as_str()]).await,
            None => {
                let nodes: Vec<NodeSnapshot> = self.get_json(&["api", "nodes"]).await?;
                nodes.into_iter().next().ok_or_else(|| FetchError::Empty {
                    endpoint: "/api/nodes".to_string(),
                })
            }
        }
    }

    async fn fetch_alive(&self) -> Result<AliveSnapshot, FetchError> {
        self.get_json(&["api", "aliveness-test", self.aliveness_vhost.as_str()])
            .await
    }

    async fn fetch_queues(&self) -> Result<Vec<QueueSnapshot>, FetchError> {
        self.get_json(&["api", "queues"]).await
    }
}
