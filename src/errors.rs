use thiserror::Error;

// typed errors so collaborators can be faked in tests

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("failed to build management api client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("invalid management api url {url}")]
    InvalidUrl { url: String },

    #[error("request to {endpoint} failed: {source}")]
    Request {
        endpoint: String,
        source: reqwest::Error,
    },

    #[error("{endpoint} answered with HTTP {status}")]
    Status { endpoint: String, status: u16 },

    #[error("failed to decode {endpoint}: {source}")]
    Decode {
        endpoint: String,
        source: serde_json::Error,
    },

    #[error("{endpoint} returned no entries")]
    Empty { endpoint: String },
}

#[derive(Error, Debug)]
pub enum PushError {
    #[error("failed to build push client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("push to {target} failed: {source}")]
    Request {
        target: String,
        source: reqwest::Error,
    },

    #[error("{target} rejected {records} records with HTTP {status}")]
    Status {
        target: String,
        records: usize,
        status: u16,
    },
}
