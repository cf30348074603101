// unidev-api: device inventory client for the UniFi Network Integration API

pub mod devices;
pub mod error;
pub mod transport;
pub mod types;

pub use devices::{BODY_PREVIEW_CHARS, body_preview, check_site_id, decode_listing, devices_path};
pub use error::{Error, ErrorKind, TransportError};
pub use transport::{API_KEY_HEADER, ApiClient, Credentials, TlsMode, TransportConfig};
pub use types::{Device, Page};

pub use reqwest::{Body, Method, StatusCode};
