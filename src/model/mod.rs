//! Journal domain model: entries as the assistant sees them, and the
//! normalized page, property, and block shapes they are built from.

mod block;
mod property_value;

pub use block::{ContentBlock, RawBlock};
pub use property_value::{PropertyKind, PropertyValue, RawProperty};

use crate::types::{PageId, PropertyName};
use chrono::{DateTime, NaiveDate, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Whether an entry's body was reconstructed completely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "reason", rename_all = "snake_case")]
pub enum FetchStatus {
    Ok,
    /// The entry's blocks could not be fetched; `body_text` is empty.
    PartialFailure(String),
}

impl FetchStatus {
    pub fn is_ok(&self) -> bool {
        matches!(self, FetchStatus::Ok)
    }
}

/// One journal reflection, read back from the database.
///
/// Built once per fetched page and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JournalEntry {
    pub id: PageId,
    pub title: String,
    pub date: Option<NaiveDate>,
    pub rating: Option<f64>,
    pub body_text: String,
    pub fetch_status: FetchStatus,
}

impl JournalEntry {
    /// Sentinel for an entry whose body could not be fetched.
    pub const MISSING_BODY: &'static str = "";
}

/// A database row as returned by a query: identity and raw properties,
/// without content blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageStub {
    pub id: PageId,
    #[serde(default)]
    pub created_time: Option<DateTime<Utc>>,
    #[serde(default)]
    pub properties: IndexMap<String, RawProperty>,
}

/// Everything needed to create one journal page.
///
/// Built fresh for each write and submitted once. `properties` is keyed by
/// the store's property names and already contains the title.
#[derive(Debug, Clone, PartialEq)]
pub struct WritePayload {
    pub title: String,
    pub properties: IndexMap<PropertyName, PropertyValue>,
    pub blocks: Vec<ContentBlock>,
}

/// Property names of a database, in schema order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DatabaseSchema {
    pub properties: IndexMap<String, PropertyKind>,
}

impl DatabaseSchema {
    pub fn has_property(&self, name: &str) -> bool {
        self.properties.contains_key(name)
    }
}
