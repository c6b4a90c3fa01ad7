// src/service.rs
//! The narrow surface the routing layer and the CLI call into.
//!
//! `JournalService` owns one reader and one writer over a shared repository
//! and applies the configured read defaults.

use crate::api::{NotionHttpClient, NotionRepository};
use crate::config::JournalConfig;
use crate::error::AppError;
use crate::journal::{EntryDraft, EntryReader, EntryWriter, ReadRequest};
use crate::model::JournalEntry;
use crate::types::{PageId, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Body of a save call. `date` is a `YYYY-MM-DD` string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SaveRequest {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub date: Option<String>,
}

impl SaveRequest {
    /// Parses the request into a draft, validating the date.
    pub fn into_draft(self) -> Result<EntryDraft, ValidationError> {
        let date = self
            .date
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(parse_entry_date)
            .transpose()?;
        Ok(EntryDraft {
            text: self.text,
            title: self.title,
            rating: self.rating,
            date,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveResponse {
    pub id: PageId,
}

/// Parses a calendar date given as `YYYY-MM-DD`.
pub fn parse_entry_date(input: &str) -> Result<NaiveDate, ValidationError> {
    NaiveDate::parse_from_str(input, "%Y-%m-%d").map_err(|e| ValidationError::InvalidDate {
        input: input.to_string(),
        reason: e.to_string(),
    })
}

pub struct JournalService {
    reader: EntryReader,
    writer: EntryWriter,
    concurrency: usize,
    deadline: Option<Duration>,
}

impl JournalService {
    /// Builds the service over the live Notion API.
    pub fn connect(config: &JournalConfig) -> Result<Self, AppError> {
        let client =
            NotionHttpClient::new(&config.api_key, &config.api_base_url, config.request_timeout)?;
        Ok(Self::with_repository(Arc::new(client), config))
    }

    /// Builds the service over any repository implementation.
    pub fn with_repository(repository: Arc<dyn NotionRepository>, config: &JournalConfig) -> Self {
        let reader = EntryReader::new(
            Arc::clone(&repository),
            config.database_id.clone(),
            config.property_names.clone(),
        )
        .with_retry_policy(config.retry.clone())
        .with_default_sort(config.default_sort.clone());

        let writer = EntryWriter::new(
            repository,
            config.database_id.clone(),
            config.property_names.clone(),
        )
        .with_default_rating(config.default_rating);

        Self {
            reader,
            writer,
            concurrency: config.read_concurrency,
            deadline: config.read_deadline,
        }
    }

    pub async fn save(&self, request: SaveRequest) -> Result<SaveResponse, AppError> {
        let draft = request.into_draft()?;
        let id = self.writer.write(&draft).await?;
        Ok(SaveResponse { id })
    }

    /// Reads the newest `limit` entries using the configured concurrency and
    /// deadline.
    pub async fn read_entries(
        &self,
        limit: usize,
        sort_key: Option<String>,
    ) -> Result<Vec<JournalEntry>, AppError> {
        let request = ReadRequest {
            limit,
            sort_key,
            concurrency: self.concurrency,
            deadline: self.deadline,
        };
        self.read(&request).await
    }

    /// Reads with fully explicit parameters.
    pub async fn read(&self, request: &ReadRequest) -> Result<Vec<JournalEntry>, AppError> {
        self.reader.read(request).await
    }
}
