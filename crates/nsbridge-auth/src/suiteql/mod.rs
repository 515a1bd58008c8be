//! SuiteQL contact lookup.
//!
//! - [`query`] - Statement construction and literal escaping
//! - [`client`] - Bearer-authenticated SuiteQL requests
//!
//! The response types here are lenient: SuiteQL rows may expose columns at the
//! top level or under `values`, ids may be strings or numbers, and `items` may
//! be absent or `null`.

pub mod client;
pub mod query;

use serde::{Deserialize, Deserializer};
use serde_json::Value;

pub use client::ContactLookup;
pub use query::{SuiteQlRequest, contact_by_email_query, escape_literal};

/// Response of the SuiteQL endpoint.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SuiteQlResponse {
    /// Result rows.
    #[serde(default, deserialize_with = "null_as_default")]
    pub items: Vec<ContactRow>,

    /// Number of rows in this page, when reported as a number.
    #[serde(default, deserialize_with = "lenient_count")]
    pub count: Option<u64>,

    /// Whether more pages exist.
    #[serde(default)]
    pub has_more: Option<bool>,

    /// Total rows across all pages.
    #[serde(default, deserialize_with = "lenient_count")]
    pub total_results: Option<u64>,
}

impl SuiteQlResponse {
    /// Number of matches: `count` when reported, otherwise the row count.
    #[must_use]
    pub fn match_count(&self) -> u64 {
        self.count.unwrap_or(self.items.len() as u64)
    }

    /// First row, if any. Additional rows are not disambiguated.
    #[must_use]
    pub fn first_row(&self) -> Option<&ContactRow> {
        self.items.first()
    }
}

/// One contact row.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactRow {
    /// NetSuite internal id.
    #[serde(default, deserialize_with = "scalar_string")]
    pub id: Option<String>,

    /// Contact email.
    #[serde(default, deserialize_with = "scalar_string")]
    pub email: Option<String>,

    /// Column values, for responses that nest them.
    #[serde(default)]
    pub values: Option<ContactValues>,
}

/// Nested column values of a contact row.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactValues {
    /// NetSuite internal id.
    #[serde(default, deserialize_with = "scalar_string")]
    pub id: Option<String>,

    /// Contact email.
    #[serde(default, deserialize_with = "scalar_string")]
    pub email: Option<String>,
}

impl ContactRow {
    /// Returns the non-empty id, preferring the top-level column.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        non_empty(self.id.as_deref())
            .or_else(|| non_empty(self.values.as_ref().and_then(|v| v.id.as_deref())))
    }

    /// Returns the non-empty email, preferring the top-level column.
    #[must_use]
    pub fn email(&self) -> Option<&str> {
        non_empty(self.email.as_deref())
            .or_else(|| non_empty(self.values.as_ref().and_then(|v| v.email.as_deref())))
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Accepts a JSON string or number; anything else becomes `None`.
fn scalar_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}

/// Accepts a non-negative integer; anything else becomes `None`.
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Value>::deserialize(deserializer)?.and_then(|v| v.as_u64()))
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
