//! Error type shared by every stage of the pipeline.

use chrono::NaiveDate;
use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Transport-level failure (DNS, connect, timeout, body read).
    #[error("request to {url} failed: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned status {status}")]
    Status { url: String, status: StatusCode },

    /// HTTP 429 from the remote side.
    #[error("rate limited by {url}")]
    RateLimited { url: String },

    /// The response arrived but did not have the expected shape.
    #[error("unexpected response from {context}: {reason}")]
    Malformed { context: String, reason: String },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid URL {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("invalid header value: {0}")]
    InvalidHeader(String),

    #[error("{count} keywords in one query, at most {limit} allowed")]
    TooManyKeywords { count: usize, limit: usize },

    #[error("batch size must be at least 1")]
    InvalidBatchSize,

    #[error("period {label}: end {end} precedes start {start}")]
    InvalidPeriod {
        label: String,
        start: NaiveDate,
        end: NaiveDate,
    },

    #[error("column {name} has {got} values, table has {expected} rows")]
    Shape {
        name: String,
        expected: usize,
        got: usize,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
