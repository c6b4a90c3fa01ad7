// src/journal/reader.rs
//! Reads journal entries back from the database.
//!
//! A read runs in two stages. The query stage pages through the sorted
//! database and must succeed as a whole. The body stage then fetches each
//! page's blocks with bounded concurrency; a failure there is recorded on
//! the affected entry and never aborts its siblings.

use super::properties::map_properties;
use super::text::extract_text;
use crate::api::types::{DatabaseQuery, PageRequest, SortDirection, SortSpec, TimestampKind};
use crate::api::{NotionRepository, PaginatedFetcher};
use crate::config::PropertyNames;
use crate::constants::{DEFAULT_READ_CONCURRENCY, MAX_READ_CONCURRENCY};
use crate::error::AppError;
use crate::error_recovery::{retry_with_backoff, RetryPolicy};
use crate::model::{ContentBlock, FetchStatus, JournalEntry, PageStub, PropertyValue};
use crate::types::{DatabaseId, PageId};
use futures::stream::{self, StreamExt};
use indexmap::IndexMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Reason recorded on entries whose blocks were still loading at the deadline.
pub const TIMEOUT_REASON: &str = "timeout";

/// Parameters of a single read.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadRequest {
    pub limit: usize,
    /// Logical field, timestamp or property name to sort by, newest first.
    pub sort_key: Option<String>,
    pub concurrency: usize,
    pub deadline: Option<Duration>,
}

impl ReadRequest {
    pub fn new(limit: usize) -> Self {
        Self {
            limit,
            sort_key: None,
            concurrency: DEFAULT_READ_CONCURRENCY,
            deadline: None,
        }
    }

    pub fn sort_by(mut self, key: impl Into<String>) -> Self {
        self.sort_key = Some(key.into());
        self
    }

    pub fn concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency;
        self
    }

    pub fn deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

pub struct EntryReader {
    repository: Arc<dyn NotionRepository>,
    database: DatabaseId,
    names: PropertyNames,
    policy: RetryPolicy,
    default_sort: String,
}

impl EntryReader {
    pub fn new(
        repository: Arc<dyn NotionRepository>,
        database: DatabaseId,
        names: PropertyNames,
    ) -> Self {
        Self {
            repository,
            database,
            names,
            policy: RetryPolicy::default(),
            default_sort: "date".to_string(),
        }
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sort key used when a request names none.
    pub fn with_default_sort(mut self, key: impl Into<String>) -> Self {
        self.default_sort = key.into();
        self
    }

    /// Reads up to `request.limit` entries in the store's sort order.
    pub async fn read(&self, request: &ReadRequest) -> Result<Vec<JournalEntry>, AppError> {
        if request.limit == 0 {
            return Ok(Vec::new());
        }

        let deadline = request.deadline.map(|d| Instant::now() + d);
        let concurrency = request.concurrency.clamp(1, MAX_READ_CONCURRENCY);
        let sort_key = request.sort_key.as_deref().unwrap_or(&self.default_sort);

        let stubs = match deadline {
            Some(at) => tokio::time::timeout_at(at, self.query_stubs(sort_key, request.limit))
                .await
                .map_err(|_| AppError::DeadlineExceeded { stage: "query" })??,
            None => self.query_stubs(sort_key, request.limit).await?,
        };
        log::debug!(
            "Query returned {} pages; fetching bodies with concurrency {}",
            stubs.len(),
            concurrency
        );

        // `buffered` yields in input order, so entries keep the query order
        // however the fetches interleave.
        let entries: Vec<JournalEntry> = stream::iter(stubs)
            .map(|stub| self.read_entry(stub, deadline))
            .buffered(concurrency)
            .collect()
            .await;

        let partial = entries.iter().filter(|e| !e.fetch_status.is_ok()).count();
        log::info!(
            "Read {} journal entries ({} partial)",
            entries.len(),
            partial
        );
        Ok(entries)
    }

    async fn query_stubs(&self, sort_key: &str, limit: usize) -> Result<Vec<PageStub>, AppError> {
        let sort = self.resolve_sort(sort_key).await?;
        let query = DatabaseQuery { sorts: vec![sort] };

        let repository = self.repository.as_ref();
        let database = &self.database;
        let query = &query;
        PaginatedFetcher::new(move |page: PageRequest| async move {
            repository.query_database(database, query, &page).await
        })
        .limit(limit)
        .retry_policy(self.policy.clone())
        .collect_all()
        .await
    }

    /// Turns a sort key into a descending sort the database will accept.
    ///
    /// Property sorts are checked against the schema first; a property the
    /// database does not have falls back to creation time.
    async fn resolve_sort(&self, sort_key: &str) -> Result<SortSpec, AppError> {
        if let Some(timestamp) = TimestampKind::from_name(sort_key) {
            return Ok(SortSpec::Timestamp {
                timestamp,
                direction: SortDirection::Descending,
            });
        }

        let property = match self.names.resolve_field(sort_key) {
            Some(name) => name.as_str().to_string(),
            None => sort_key.to_string(),
        };

        let repository = self.repository.as_ref();
        let database = &self.database;
        let schema = retry_with_backoff(
            || repository.retrieve_database_schema(database),
            &self.policy,
            None,
        )
        .await?;

        if schema.has_property(&property) {
            Ok(SortSpec::Property {
                property,
                direction: SortDirection::Descending,
            })
        } else {
            log::warn!(
                "Sort property '{}' is not in the database schema; sorting by creation time",
                property
            );
            Ok(SortSpec::newest_created())
        }
    }

    async fn read_entry(&self, stub: PageStub, deadline: Option<Instant>) -> JournalEntry {
        let body = match deadline {
            Some(at) => match tokio::time::timeout_at(at, self.fetch_blocks(&stub.id)).await {
                Ok(result) => result.map_err(|e| e.to_string()),
                Err(_) => Err(TIMEOUT_REASON.to_string()),
            },
            None => self.fetch_blocks(&stub.id).await.map_err(|e| e.to_string()),
        };

        if let Err(reason) = &body {
            log::warn!("Could not load body of entry {}: {}", stub.id, reason);
        }
        self.assemble(stub, body)
    }

    async fn fetch_blocks(&self, page_id: &PageId) -> Result<Vec<ContentBlock>, AppError> {
        let repository = self.repository.as_ref();
        PaginatedFetcher::new(move |page: PageRequest| async move {
            repository.retrieve_block_children(page_id, &page).await
        })
        .retry_policy(self.policy.clone())
        .collect_all()
        .await
    }

    fn assemble(&self, stub: PageStub, body: Result<Vec<ContentBlock>, String>) -> JournalEntry {
        let properties = map_properties(&stub.properties);
        let (body_text, fetch_status) = match body {
            Ok(blocks) => (extract_text(&blocks), FetchStatus::Ok),
            Err(reason) => (
                JournalEntry::MISSING_BODY.to_string(),
                FetchStatus::PartialFailure(reason),
            ),
        };

        JournalEntry {
            id: stub.id,
            title: self.title_of(&properties),
            date: properties
                .get(self.names.date.as_str())
                .and_then(PropertyValue::as_date),
            rating: properties
                .get(self.names.rating.as_str())
                .and_then(PropertyValue::as_number),
            body_text,
            fetch_status,
        }
    }

    /// Configured title property, else the page's title-kind property.
    fn title_of(&self, properties: &IndexMap<String, PropertyValue>) -> String {
        properties
            .get(self.names.title.as_str())
            .and_then(PropertyValue::as_text)
            .or_else(|| {
                properties
                    .values()
                    .find(|value| value.is_title())
                    .and_then(PropertyValue::as_text)
            })
            .unwrap_or_default()
            .to_string()
    }
}
