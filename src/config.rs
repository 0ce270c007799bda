use crate::collectors::CollectorSettings;
use crate::falcon::DEFAULT_PUSH_URL;
use crate::management::ManagementConfig;
use clap::Parser;
use std::time::Duration;

#[derive(Parser, Debug, Clone)]
#[command(name = "rmqmon", version, about)]
pub struct Config {
    /// Endpoint name stamped on every metric.
    /// if none provided, default to hostname.
    #[arg(long, env = "RMQMON_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Collection interval in seconds, also reported as the metric step.
    #[arg(
        long,
        env = "RMQMON_INTERVAL_SECS",
        default_value_t = 60,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub interval_secs: u64,

    /// Comma-separated queue states counted as running (matched as substrings).
    #[arg(
        long,
        env = "RMQMON_QUEUE_RUNNING",
        value_delimiter = ',',
        default_value = "running"
    )]
    pub queue_running: Vec<String>,

    /// Log every metric before it is pushed.
    #[arg(long, env = "RMQMON_DEBUG", default_value_t = false)]
    pub debug: bool,

    /// Enable JSON structured logging.
    #[arg(long, env = "RMQMON_JSON_LOGS", default_value_t = false)]
    pub json_logs: bool,

    /// Base URL of the RabbitMQ management API.
    #[arg(long, env = "RMQMON_API_URL", default_value = "http://127.0.0.1:15672")]
    pub api_url: String,

    #[arg(long, env = "RMQMON_USERNAME", default_value = "guest")]
    pub username: String,

    #[arg(long, env = "RMQMON_PASSWORD", default_value = "guest", hide_env_values = true)]
    pub password: String,

    /// Node to report on, e.g. rabbit@mq-01. Defaults to the first node listed.
    #[arg(long, env = "RMQMON_NODE")]
    pub node: Option<String>,

    /// Vhost used by the aliveness test.
    #[arg(long, env = "RMQMON_ALIVENESS_VHOST", default_value = "/")]
    pub aliveness_vhost: String,

    /// Timeout for every HTTP request in milliseconds.
    #[arg(long, env = "RMQMON_HTTP_TIMEOUT_MS", default_value_t = 5000)]
    pub http_timeout_ms: u64,

    /// Open-Falcon agent push URL.
    #[arg(long, env = "RMQMON_FALCON_API", default_value = DEFAULT_PUSH_URL)]
    pub falcon_api: String,

    /// Run a single collection cycle and exit.
    #[arg(long, default_value_t = false)]
    pub once: bool,
}

impl Config {
    /// get endpoint, upon failure fallback to hostname.
    pub fn resolved_endpoint(&self) -> String {
        self.endpoint.clone().unwrap_or_else(|| {
            hostname::get()
                .map(|h| h.to_string_lossy().into_owned())
                .unwrap_or_else(|_| "unknown-host".to_string())
        })
    }

    pub fn collect_interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn http_timeout(&self) -> Duration {
        Duration::from_millis(self.http_timeout_ms)
    }

    /// Healthy queue-state indicators, lower-cased, blanks dropped.
    pub fn healthy_states(&self) -> Vec<String> {
        self.queue_running
            .iter()
            .map(|s| s.trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn collector_settings(&self) -> CollectorSettings {
        CollectorSettings {
            endpoint: self.resolved_endpoint(),
            step: i64::try_from(self.interval_secs).unwrap_or(i64::MAX),
            healthy_states: self.healthy_states(),
            verbose: self.debug,
        }
    }

    pub fn management(&self) -> ManagementConfig {
        ManagementConfig {
            api_url: self.api_url.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            node: self.node.clone(),
            aliveness_vhost: self.aliveness_vhost.clone(),
            timeout: self.http_timeout(),
        }
    }
}
