use thiserror::Error;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("{0}")]
    Other(String),
}

/// Errors raised while reading from the trade source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SourceError {
    /// Network failure, timeout, or non-2xx response. Transient.
    #[error("trade source unavailable (page {page}): {reason}")]
    Unavailable { page: u32, reason: String },

    /// The response was not the expected shape. Not transient, but never fatal.
    #[error("trade source protocol error (page {page}): {reason}")]
    Protocol { page: u32, reason: String },
}

impl SourceError {
    /// Page the failure was observed on.
    #[must_use]
    pub const fn page(&self) -> u32 {
        match self {
            Self::Unavailable { page, .. } | Self::Protocol { page, .. } => *page,
        }
    }
}

/// Errors raised by a single delivery attempt to the notification sink.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SinkError {
    #[error("webhook rejected delivery with status {status}")]
    Rejected { status: u16 },

    #[error("webhook transport error: {0}")]
    Transport(String),

    #[error("webhook url not configured")]
    NotConfigured,

    #[error("failed to encode webhook payload: {0}")]
    Encode(String),
}

impl SinkError {
    /// HTTP status carried by the failure, if the sink responded at all.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status } => Some(*status),
            _ => None,
        }
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Source(#[from] SourceError),

    #[error(transparent)]
    Sink(#[from] SinkError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("database error: {0}")]
    Database(String),

    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;
