use reqwest::StatusCode;
use thiserror::Error;

/// Top-level error type for the `unidev-api` crate.
///
/// Every failure of client construction or of a device listing lands in
/// exactly one of five classes, see [`ErrorKind`]. Nothing is retried;
/// callers get the error as soon as it happens.
#[derive(Debug, Error)]
pub enum Error {
    // ── Setup ───────────────────────────────────────────────────────
    /// A required setting is empty or unusable. No request was sent.
    #[error("Invalid configuration for {field}: {reason}")]
    Configuration { field: &'static str, reason: String },

    // ── Transport ───────────────────────────────────────────────────
    /// The request could not be built or the network exchange failed.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// The response arrived but its body could not be read to the end.
    #[error("Failed to read response body: {0}")]
    BodyRead(#[source] reqwest::Error),

    // ── API ─────────────────────────────────────────────────────────
    /// The controller answered with something other than `200 OK`.
    #[error("API error: status {status}")]
    Api { status: StatusCode, body: String },

    // ── Data ────────────────────────────────────────────────────────
    /// The body is not JSON, or not shaped like a listing envelope.
    #[error("Failed to decode response: {source} (body preview: {preview:?})")]
    Decode {
        #[source]
        source: serde_json::Error,
        preview: String,
    },
}

/// Request-building and network-level failures.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Request paths are origin-relative and must start with `/`.
    #[error("Invalid request path {path:?}: must start with '/'")]
    InvalidPath { path: String },

    #[error("Invalid request URL {url}: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// DNS, connect, TLS handshake or timeout failure.
    #[error("Request to {url} failed: {source}")]
    Send {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// The five error classes a caller needs to tell apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Transport,
    BodyRead,
    Api,
    Decode,
}

impl Error {
    pub(crate) fn empty(field: &'static str) -> Self {
        Self::Configuration {
            field,
            reason: "must not be empty".into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Configuration { .. } => ErrorKind::Configuration,
            Self::Transport(_) => ErrorKind::Transport,
            Self::BodyRead(_) => ErrorKind::BodyRead,
            Self::Api { .. } => ErrorKind::Api,
            Self::Decode { .. } => ErrorKind::Decode,
        }
    }

    /// HTTP status of an [`Error::Api`] failure.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns `true` if the controller rejected the API key.
    pub fn is_auth_rejected(&self) -> bool {
        matches!(
            self.status(),
            Some(StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN)
        )
    }

    /// Returns `true` if the connection itself could not be established
    /// (refused, unreachable, TLS handshake).
    pub fn is_connect(&self) -> bool {
        match self {
            Self::Transport(TransportError::Send { source, .. }) => source.is_connect(),
            _ => false,
        }
    }

    /// Returns `true` if the exchange ran past the transport's timeout.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Transport(TransportError::Send { source, .. }) | Self::BodyRead(source) => {
                source.is_timeout()
            }
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_error_reports_status_and_kind() {
        let err = Error::Api {
            status: StatusCode::NOT_FOUND,
            body: "{}".into(),
        };
        assert_eq!(err.kind(), ErrorKind::Api);
        assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
        assert!(!err.is_auth_rejected());
        assert_eq!(err.to_string(), "API error: status 404 Not Found");
    }

    #[test]
    fn unauthorized_and_forbidden_count_as_auth_rejection() {
        for status in [StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN] {
            let err = Error::Api {
                status,
                body: String::new(),
            };
            assert!(err.is_auth_rejected(), "{status}");
        }
    }

    #[test]
    fn empty_setting_names_the_field() {
        let err = Error::empty("site_id");
        assert_eq!(err.kind(), ErrorKind::Configuration);
        assert_eq!(
            err.to_string(),
            "Invalid configuration for site_id: must not be empty"
        );
    }

    #[test]
    fn invalid_path_is_a_transport_error() {
        let err = Error::from(TransportError::InvalidPath {
            path: "devices".into(),
        });
        assert_eq!(err.kind(), ErrorKind::Transport);
        assert!(!err.is_connect());
        assert_eq!(err.status(), None);
    }
}
