// Credential-bearing HTTP transport for the controller.
//
// Holds one reusable reqwest::Client with the API key installed as a
// default header, bound to a single controller origin.

use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use reqwest::{Body, Method, Response};
use secrecy::{ExposeSecret, SecretString};
use tracing::debug;
use url::Url;

use crate::error::{Error, TransportError};

/// Header carrying the Integration API key on every request.
pub const API_KEY_HEADER: &str = "X-API-KEY";

// ── Configuration ────────────────────────────────────────────────────

/// Controller address and API key, as handed over by the config layer.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Host name or address, optionally with `:port`. No scheme, no path.
    pub host: String,
    pub api_key: SecretString,
}

impl Credentials {
    pub fn new(host: impl Into<String>, api_key: SecretString) -> Self {
        Self {
            host: host.into(),
            api_key,
        }
    }
}

/// Certificate verification policy for the controller connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TlsMode {
    /// Verify against the bundled webpki root store.
    Verify,
    /// Accept any certificate. UniFi consoles ship self-signed ones;
    /// this gives up server authentication entirely.
    #[default]
    AcceptInvalid,
}

/// Transport settings shared by every client built from it.
#[derive(Debug, Clone, Default)]
pub struct TransportConfig {
    pub tls: TlsMode,
}

impl TransportConfig {
    /// Build a `reqwest::Client` that sends `headers` on every request.
    pub fn build_client(&self, headers: HeaderMap) -> Result<reqwest::Client, Error> {
        let mut builder = reqwest::Client::builder()
            .user_agent(concat!("unidev/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers);

        if self.tls == TlsMode::AcceptInvalid {
            builder = builder.danger_accept_invalid_certs(true);
        }

        builder
            .build()
            .map_err(|e| TransportError::Client(e).into())
    }
}

// ── Client ───────────────────────────────────────────────────────────

/// Authenticated client for one controller.
///
/// Cheap to share by reference; the inner `reqwest::Client` pools
/// connections and is safe to use from several tasks.
#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    origin: Url,
}

impl ApiClient {
    /// Build a client for `https://{host}`.
    ///
    /// Fails with [`Error::Configuration`] when the host or API key is
    /// empty, or when the host is not a bare `host[:port]`.
    pub fn new(credentials: &Credentials, transport: &TransportConfig) -> Result<Self, Error> {
        if credentials.host.trim().is_empty() {
            return Err(Error::empty("host"));
        }
        if credentials.api_key.expose_secret().trim().is_empty() {
            return Err(Error::empty("api_key"));
        }

        let origin = https_origin(&credentials.host)?;
        Self::build(origin, &credentials.api_key, transport)
    }

    /// Build a client bound to an explicit origin, e.g. a plain-HTTP
    /// test server or a controller behind a path prefix.
    pub fn with_base_url(
        base_url: Url,
        api_key: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        if api_key.expose_secret().trim().is_empty() {
            return Err(Error::empty("api_key"));
        }
        Self::build(base_url, api_key, transport)
    }

    fn build(origin: Url, api_key: &SecretString, transport: &TransportConfig) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut key_value =
            HeaderValue::from_str(api_key.expose_secret()).map_err(|e| Error::Configuration {
                field: "api_key",
                reason: format!("not a valid header value: {e}"),
            })?;
        key_value.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key_value);

        let http = transport.build_client(headers)?;
        Ok(Self { http, origin })
    }

    /// The origin every request path is appended to.
    pub fn origin(&self) -> &Url {
        &self.origin
    }

    /// Send one request to `path` on the controller.
    ///
    /// `path` must start with `/`. The API key and
    /// `Accept: application/json` are attached; the response is returned
    /// as-is, whatever its status.
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Body>,
    ) -> Result<Response, Error> {
        let url = self.url(path)?;
        debug!("{method} {url}");

        let mut req = self
            .http
            .request(method, url.clone())
            .header(ACCEPT, "application/json");
        if let Some(body) = body {
            req = req.body(body);
        }

        req.send().await.map_err(|source| {
            TransportError::Send {
                url: url.to_string(),
                source,
            }
            .into()
        })
    }

    fn url(&self, path: &str) -> Result<Url, TransportError> {
        if !path.starts_with('/') {
            return Err(TransportError::InvalidPath { path: path.into() });
        }

        let raw = format!("{}{path}", self.origin.as_str().trim_end_matches('/'));
        Url::parse(&raw).map_err(|source| TransportError::InvalidUrl { url: raw, source })
    }
}

/// `host[:port]` → `https://host[:port]/`.
fn https_origin(host: &str) -> Result<Url, Error> {
    let invalid = |reason: String| Error::Configuration {
        field: "host",
        reason,
    };

    if host.contains("://") || host.contains(['/', '?', '#']) {
        return Err(invalid(format!(
            "expected a bare host name or address, got {host:?}"
        )));
    }

    Url::parse(&format!("https://{host}")).map_err(|e| invalid(format!("{host:?}: {e}")))
}
