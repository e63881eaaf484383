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
}

/// One proxy route's terminal failure, kept for diagnosis when the
/// whole chain is exhausted.
#[derive(Debug)]
pub struct ProxyFailure {
    pub proxy: String,
    pub reason: String,
}

impl std::fmt::Display for ProxyFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.proxy, self.reason)
    }
}

/// Network-layer errors, from a single GET up through proxy fallback.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("network error{}: {message}", .status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    Network {
        status: Option<u16>,
        message: String,
    },

    #[error("malformed JSON response: {0}")]
    MalformedBody(String),

    #[error("retries exhausted after {attempts} attempts: {last}")]
    RetryExhausted {
        attempts: u32,
        last: Box<FetchError>,
    },

    #[error("all {} proxies failed: [{}]", .failures.len(), format_failures(.failures))]
    AllProxiesFailed { failures: Vec<ProxyFailure> },
}

fn format_failures(failures: &[ProxyFailure]) -> String {
    failures
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Errors from the pure aggregation layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SeriesError {
    #[error("no team yielded any gameweek history")]
    EmptyHistory,

    #[error("standings contain no teams")]
    NoTeams,
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Series(#[from] SeriesError),

    /// Standings could not be fetched; nothing usable can be built.
    #[error("league fetch failed: {0}")]
    Orchestration(#[source] Box<FetchError>),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
