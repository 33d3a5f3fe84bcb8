use thiserror::Error;

#[derive(Error, Debug)]
pub enum AlertError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("HTTP transport error: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    #[error("Upstream API error (code {code}): {message}")]
    Api { code: i64, message: String },

    #[error("Response parsing error: {0}")]
    Parse(String),

    #[error("Notification delivery failed: {0}")]
    Notification(String),

    #[error("Invalid price series for {symbol}: {reason}")]
    InvalidSeries { symbol: String, reason: String },

    #[error("Polling cycle failed: {0}")]
    Cycle(String),
}

impl AlertError {
    /// Transport-level failures worth another attempt.
    pub fn is_transient(&self) -> bool {
        match self {
            AlertError::Http { source } => {
                source.is_timeout()
                    || source.is_connect()
                    || source.status().map(|s| s.is_server_error()).unwrap_or(false)
            }
            _ => false,
        }
    }
}
