//! Response types for the UniFi Network Integration API.
//!
//! Field names are camelCase on the wire. Missing or `null` fields decode
//! to their defaults, matching how the controller omits unset values.

use serde::{Deserialize, Deserializer, Serialize};

// ── Pagination ───────────────────────────────────────────────────────

/// Pagination envelope returned by list endpoints.
///
/// Well-formed responses have `count == data.len()` and
/// `total_count >= count`. Neither is enforced on decode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default, deserialize_with = "null_as_default")]
    pub offset: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub limit: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub count: i32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub total_count: i64,
    #[serde(
        default = "Vec::new",
        deserialize_with = "null_as_default",
        bound(deserialize = "T: Deserialize<'de>")
    )]
    pub data: Vec<T>,
}

impl<T> Page<T> {
    /// The controller holds more items than this page carries.
    pub fn is_partial(&self) -> bool {
        self.total_count > i64::from(self.count)
    }

    /// `count` agrees with the number of items actually present.
    pub fn count_matches(&self) -> bool {
        usize::try_from(self.count).is_ok_and(|count| count == self.data.len())
    }

    pub fn into_data(self) -> Vec<T> {
        self.data
    }
}

// ── Devices ──────────────────────────────────────────────────────────

/// Adopted device overview, from `GET /v1/sites/{siteId}/devices`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(default, deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub model: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub mac_address: String,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
