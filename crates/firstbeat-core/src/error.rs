use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RemoteConfigError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Transport failure: {0}")]
    TransportFailure(#[from] reqwest::Error),

    #[error("Unexpected status {status} from {url}: {body}")]
    BadStatus {
        url: String,
        status: u16,
        body: String,
    },

    #[error("Failed to decode {key}: {source}")]
    DecodeFailure {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("I/O failure on {}: {source}", .path.display())]
    IoFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl RemoteConfigError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut end = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(end) {
            end -= 1;
        }
        format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
    }

    pub fn bad_status(url: &str, status: reqwest::StatusCode, body: &str) -> Self {
        RemoteConfigError::BadStatus {
            url: url.to_string(),
            status: status.as_u16(),
            body: Self::truncate_body(body),
        }
    }

    pub fn decode(key: &str, source: serde_json::Error) -> Self {
        RemoteConfigError::DecodeFailure {
            key: key.to_string(),
            source,
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RemoteConfigError::IoFailure {
            path: path.into(),
            source,
        }
    }

    /// Stable name used in the `category` field of log events.
    pub fn category(&self) -> &'static str {
        match self {
            RemoteConfigError::InvalidUrl(_) => "invalid_url",
            RemoteConfigError::TransportFailure(_) => "transport_failure",
            RemoteConfigError::BadStatus { .. } => "bad_status",
            RemoteConfigError::DecodeFailure { .. } => "decode_failure",
            RemoteConfigError::IoFailure { .. } => "io_failure",
        }
    }

    /// True when the underlying I/O error is a plain "file not found".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            RemoteConfigError::IoFailure { source, .. }
                if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}

pub type Result<T> = std::result::Result<T, RemoteConfigError>;
