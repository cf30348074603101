//! CLI error types with miette diagnostics.
//!
//! Maps config and API errors into user-facing errors with actionable help text.

use miette::Diagnostic;
use thiserror::Error;

use unidev_api::{Error as ApiError, TransportError};
use unidev_config::ConfigError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const AUTH: i32 = 3;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Configuration ────────────────────────────────────────────────
    #[error("{field} is not configured")]
    #[diagnostic(
        code(unidev::missing_setting),
        help("Set {env}, or add `{field} = \"...\"` to {path}")
    )]
    MissingSetting {
        field: &'static str,
        env: &'static str,
        path: String,
    },

    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(unidev::validation))]
    Validation { field: String, reason: String },

    #[error(transparent)]
    #[diagnostic(code(unidev::config))]
    Config(ConfigError),

    // ── Connection ───────────────────────────────────────────────────
    #[error("Could not connect to controller at {url}")]
    #[diagnostic(
        code(unidev::connection_failed),
        help(
            "Check that the controller is running and reachable.\n\
             If it uses a self-signed certificate, set UNIFI_ACCEPT_INVALID_CERTS=true."
        )
    )]
    ConnectionFailed {
        url: String,
        #[source]
        source: TransportError,
    },

    #[error(transparent)]
    #[diagnostic(code(unidev::transport))]
    Transport(TransportError),

    // ── API ──────────────────────────────────────────────────────────
    #[error("Controller rejected the API key (HTTP {status})")]
    #[diagnostic(
        code(unidev::auth_failed),
        help("Check UNIFI_TOKEN against Settings > Control Plane > Integrations on the controller.")
    )]
    AuthFailed { status: u16 },

    /// `preview` holds the start of the response body only.
    #[error("API error (HTTP {status})")]
    #[diagnostic(code(unidev::api_error), help("Response body: {preview}"))]
    Api { status: u16, preview: String },

    #[error(transparent)]
    #[diagnostic(code(unidev::response))]
    Response(ApiError),

    // ── IO / Serialization ───────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Failed to render JSON: {0}")]
    #[diagnostic(code(unidev::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MissingSetting { .. } | Self::Validation { .. } | Self::Config(_) => {
                exit_code::USAGE
            }
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::AuthFailed { .. } => exit_code::AUTH,
            _ => exit_code::GENERAL,
        }
    }
}

// ── ConfigError → CliError mapping ───────────────────────────────────

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Missing { field, env } => CliError::MissingSetting {
                field,
                env,
                path: unidev_config::config_path().display().to_string(),
            },
            other => CliError::Config(other),
        }
    }
}

// ── ApiError → CliError mapping ──────────────────────────────────────

impl From<ApiError> for CliError {
    fn from(err: ApiError) -> Self {
        if err.is_auth_rejected() {
            return CliError::AuthFailed {
                status: err.status().map_or(0, |s| s.as_u16()),
            };
        }

        match err {
            ApiError::Configuration { field, reason } => CliError::Validation {
                field: field.into(),
                reason,
            },
            ApiError::Transport(TransportError::Send { url, source })
                if source.is_connect() || source.is_timeout() =>
            {
                CliError::ConnectionFailed {
                    url: url.clone(),
                    source: TransportError::Send { url, source },
                }
            }
            ApiError::Transport(e) => CliError::Transport(e),
            ApiError::Api { status, body } => CliError::Api {
                status: status.as_u16(),
                preview: unidev_api::body_preview(body.as_bytes()),
            },
            other => CliError::Response(other),
        }
    }
}
