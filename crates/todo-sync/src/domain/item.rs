//! Item Entity
//!
//! A single to-do entry as stored in the remote collection.

use std::cmp::Ordering;
use std::fmt;

use chrono::{DateTime, Local, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Opaque document identifier assigned by the remote service
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Server-assigned creation time, milliseconds since the Unix epoch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(i64);

impl Timestamp {
    pub fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    pub fn as_millis(&self) -> i64 {
        self.0
    }

    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.0).single()
    }
}

/// A to-do item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    /// Document id (not stored inside the document itself)
    pub id: ItemId,
    /// Trimmed item text
    pub text: String,
    /// Completion status
    pub completed: bool,
    /// `None` while the server timestamp is still pending
    pub created_at: Option<Timestamp>,
}

impl Item {
    /// Build an item from a fetched record, tolerating missing fields
    pub fn from_fields(id: ItemId, fields: RawItemFields) -> Self {
        Self {
            id,
            text: fields.text.unwrap_or_default(),
            completed: fields.completed.unwrap_or(false),
            created_at: fields.created_at.map(Timestamp::from_millis),
        }
    }

    /// Creation time in the viewer's local time zone
    pub fn created_label(&self) -> Option<String> {
        self.created_label_in(&Local)
    }

    pub fn created_label_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<String>
    where
        Tz::Offset: fmt::Display,
    {
        self.created_at
            .and_then(|ts| ts.to_datetime())
            .map(|dt| dt.with_timezone(tz).format("%Y-%m-%d %H:%M").to_string())
    }
}

/// Fields of a remote record as they arrive over the wire.
///
/// Every field is optional and decoded on its own: records written by other
/// clients, or read while a server timestamp is still pending, may be
/// partially shaped. A field of the wrong type reads as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawItemFields {
    #[serde(default, deserialize_with = "lenient")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub completed: Option<bool>,
    /// Milliseconds since the epoch
    #[serde(default, deserialize_with = "lenient_millis")]
    pub created_at: Option<i64>,
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).ok())
}

/// JS numbers may carry integral millis as floats
fn lenient_millis<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_i64()
        .or_else(|| value.as_f64().map(|ms| ms.round() as i64)))
}

/// Payload of a create request. The server fills in id and timestamp.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewItem {
    pub text: String,
}

impl NewItem {
    /// Trim `text`; `None` when nothing is left
    pub fn from_input(text: &str) -> Option<Self> {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self { text: trimmed.to_string() })
        }
    }
}

/// Newest-first ordering. A pending timestamp counts as newest; ties break on id.
pub fn newest_first(a: &Item, b: &Item) -> Ordering {
    match (a.created_at, b.created_at) {
        (None, None) => a.id.cmp(&b.id),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(x), Some(y)) => y.cmp(&x).then_with(|| a.id.cmp(&b.id)),
    }
}

/// Check that a list is ordered newest first
pub fn is_newest_first(items: &[Item]) -> bool {
    items.windows(2).all(|pair| newest_first(&pair[0], &pair[1]) != Ordering::Greater)
}
