// src/api/types.rs
//! Type definitions for the Notion API module.
//!
//! Request shapes are immutable values built once per call; response shapes
//! mirror the cursor-paginated envelope the API uses for every list endpoint.

use crate::constants::NOTION_API_PAGE_SIZE;
use serde::{Deserialize, Serialize};

// --- Pagination Types ---

/// Generic paginated response from Notion API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub results: Vec<T>,
    #[serde(default)]
    pub next_cursor: Option<String>,
    #[serde(default)]
    pub has_more: bool,
}

impl<T> PaginatedResponse<T> {
    /// A final page holding `results`.
    pub fn last(results: Vec<T>) -> Self {
        Self {
            results,
            next_cursor: None,
            has_more: false,
        }
    }

    /// Converts every item, keeping the cursor state.
    pub fn map<U, F>(self, f: F) -> PaginatedResponse<U>
    where
        F: FnMut(T) -> U,
    {
        PaginatedResponse {
            results: self.results.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
            has_more: self.has_more,
        }
    }
}

/// One page request: how many items, starting where.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    pub page_size: u32,
    pub start_cursor: Option<String>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page_size: NOTION_API_PAGE_SIZE,
            start_cursor: None,
        }
    }
}

// --- Query Types ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Ascending,
    Descending,
}

/// Timestamps every page carries, independent of the database schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimestampKind {
    CreatedTime,
    LastEditedTime,
}

impl TimestampKind {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "created_time" => Some(Self::CreatedTime),
            "last_edited_time" => Some(Self::LastEditedTime),
            _ => None,
        }
    }
}

/// A single sort criterion of a database query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SortSpec {
    Property {
        property: String,
        direction: SortDirection,
    },
    Timestamp {
        timestamp: TimestampKind,
        direction: SortDirection,
    },
}

impl SortSpec {
    /// Store-native creation order, newest first.
    pub fn newest_created() -> Self {
        SortSpec::Timestamp {
            timestamp: TimestampKind::CreatedTime,
            direction: SortDirection::Descending,
        }
    }
}

/// Template for a database query; pagination fields are added per request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DatabaseQuery {
    pub sorts: Vec<SortSpec>,
}

/// Wire body of `POST databases/{id}/query`.
#[derive(Debug, Serialize)]
pub struct DatabaseQueryBody<'a> {
    pub page_size: u32,
    #[serde(skip_serializing_if = "no_sorts")]
    pub sorts: &'a [SortSpec],
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<&'a str>,
}

fn no_sorts(sorts: &&[SortSpec]) -> bool {
    sorts.is_empty()
}

impl<'a> DatabaseQueryBody<'a> {
    pub fn new(query: &'a DatabaseQuery, page: &'a PageRequest) -> Self {
        Self {
            page_size: page.page_size,
            sorts: &query.sorts,
            start_cursor: page.start_cursor.as_deref(),
        }
    }
}
