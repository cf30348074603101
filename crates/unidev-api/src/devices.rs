// Device inventory for one site.
//
// One GET against the Integration API, first page only. The controller's
// offset/limit/totalCount are logged but never followed.

use reqwest::{Method, StatusCode};
use tracing::{debug, warn};

use crate::error::Error;
use crate::transport::ApiClient;
use crate::types::{Device, Page};

/// Longest slice of a response body carried in diagnostics.
pub const BODY_PREVIEW_CHARS: usize = 200;

/// Path of the device listing for `site_id`.
///
/// `site_id` is inserted verbatim; [`ApiClient::list_devices`] checks it
/// with [`check_site_id`] first.
pub fn devices_path(site_id: &str) -> String {
    format!("/proxy/network/integration/v1/sites/{site_id}/devices")
}

/// A site id must be one non-empty path segment that URL parsing keeps
/// as-is: no separators, no percent escapes, no dot segments.
pub fn check_site_id(site_id: &str) -> Result<(), Error> {
    if site_id.trim().is_empty() {
        return Err(Error::empty("site_id"));
    }

    let reserved = site_id.contains(['/', '\\', '?', '#', '%'])
        || site_id.chars().any(char::is_control)
        || matches!(site_id, "." | "..");
    if reserved {
        return Err(Error::Configuration {
            field: "site_id",
            reason: format!("{site_id:?} is not a single path segment"),
        });
    }
    Ok(())
}

/// First [`BODY_PREVIEW_CHARS`] characters of `body`, lossily decoded.
pub fn body_preview(body: &[u8]) -> String {
    String::from_utf8_lossy(body)
        .chars()
        .take(BODY_PREVIEW_CHARS)
        .collect()
}

/// Decode a device listing envelope from a raw response body.
pub fn decode_listing(body: &[u8]) -> Result<Page<Device>, Error> {
    serde_json::from_slice(body).map_err(|source| Error::Decode {
        source,
        preview: body_preview(body),
    })
}

impl ApiClient {
    /// List the devices of one site, in the order the controller returns them.
    ///
    /// Only the first page is read, even when the controller reports a
    /// larger `totalCount`.
    pub async fn list_devices(&self, site_id: &str) -> Result<Vec<Device>, Error> {
        check_site_id(site_id)?;

        let resp = self
            .request(Method::GET, &devices_path(site_id), None)
            .await?;

        let status = resp.status();
        debug!(%status, "HTTP status");

        let body = resp.bytes().await.map_err(Error::BodyRead)?;
        debug!(body = %String::from_utf8_lossy(&body), "raw response body");

        if status != StatusCode::OK {
            return Err(Error::Api {
                status,
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }

        let page = decode_listing(&body)?;

        if !page.count_matches() {
            warn!(
                count = page.count,
                received = page.data.len(),
                "device count does not match the devices returned"
            );
        }
        if page.is_partial() {
            warn!(
                count = page.count,
                total_count = page.total_count,
                "site has more devices than one page; only the first page is listed"
            );
        }

        Ok(page.into_data())
    }
}
