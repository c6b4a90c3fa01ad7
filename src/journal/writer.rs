// src/journal/writer.rs
//! Builds and submits new journal pages.
//!
//! The payload is assembled in full before anything is sent, then submitted
//! in a single request. Writes are never retried: a request that timed out
//! may still have created the page.

use crate::api::NotionRepository;
use crate::config::PropertyNames;
use crate::constants::{
    CREATE_PAGE_MAX_CHILDREN, DEFAULT_RATING, DERIVED_TITLE_MAX_CHARS, FALLBACK_TITLE,
    RICH_TEXT_MAX_CHARS, RICH_TEXT_MAX_RUNS_PER_BLOCK,
};
use crate::error::AppError;
use crate::model::{ContentBlock, PropertyValue, WritePayload};
use crate::types::{split_into_runs, DatabaseId, PageId, ValidationError};
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

const SENTENCE_TERMINATORS: &[char] = &['.', '!', '?', '\n'];

/// A journal entry as submitted by the assistant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryDraft {
    pub text: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

impl EntryDraft {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

pub struct EntryWriter {
    repository: Arc<dyn NotionRepository>,
    database: DatabaseId,
    names: PropertyNames,
    default_rating: f64,
}

impl EntryWriter {
    pub fn new(
        repository: Arc<dyn NotionRepository>,
        database: DatabaseId,
        names: PropertyNames,
    ) -> Self {
        Self {
            repository,
            database,
            names,
            default_rating: DEFAULT_RATING,
        }
    }

    pub fn with_default_rating(mut self, rating: f64) -> Self {
        self.default_rating = rating;
        self
    }

    /// Validates `draft` and submits it as a new page.
    pub async fn write(&self, draft: &EntryDraft) -> Result<PageId, AppError> {
        let today = chrono::Local::now().date_naive();
        let payload = self.build_payload(draft, today)?;
        log::debug!(
            "Creating entry '{}' with {} blocks",
            payload.title,
            payload.blocks.len()
        );

        let id = self.repository.create_page(&self.database, &payload).await?;
        log::info!("Saved journal entry {}", id);
        Ok(id)
    }

    /// Builds the page-creation payload; `today` fills in a missing date.
    pub fn build_payload(
        &self,
        draft: &EntryDraft,
        today: NaiveDate,
    ) -> Result<WritePayload, ValidationError> {
        let text = draft.text.trim();
        if text.is_empty() {
            return Err(ValidationError::EmptyField("text"));
        }

        let rating = draft.rating.unwrap_or(self.default_rating);
        if !rating.is_finite() {
            return Err(ValidationError::InvalidRating(rating));
        }

        let title = derive_title(draft.title.as_deref(), text);
        let date = draft.date.unwrap_or(today);

        let mut properties = IndexMap::new();
        properties.insert(self.names.title.clone(), PropertyValue::Title(title.clone()));
        properties.insert(self.names.date.clone(), PropertyValue::Date(Some(date)));
        properties.insert(self.names.rating.clone(), PropertyValue::Number(Some(rating)));

        Ok(WritePayload {
            title,
            properties,
            blocks: chunk_text(text)?,
        })
    }
}

/// Picks the entry title: the explicit one, else the first sentence, else
/// the fallback.
pub fn derive_title(explicit: Option<&str>, text: &str) -> String {
    if let Some(title) = explicit.map(str::trim).filter(|t| !t.is_empty()) {
        return title.to_string();
    }

    let sentence = text.split(SENTENCE_TERMINATORS).next().unwrap_or_default();
    let truncated: String = sentence.chars().take(DERIVED_TITLE_MAX_CHARS).collect();
    let title = truncated.trim();
    if title.is_empty() {
        FALLBACK_TITLE.to_string()
    } else {
        title.to_string()
    }
}

/// Splits entry text into paragraph blocks, one per line.
///
/// Long lines are split into several runs inside the same paragraph. When
/// there are more lines than the page's child limit, trailing lines are
/// folded into shared paragraphs with embedded newlines, filling each up to
/// the per-block run limit. Text that cannot fit in one request is rejected.
pub fn chunk_text(text: &str) -> Result<Vec<ContentBlock>, ValidationError> {
    let capacity = RICH_TEXT_MAX_RUNS_PER_BLOCK * RICH_TEXT_MAX_CHARS;
    let lines: Vec<&str> = text.split('\n').collect();

    // Packed back to front so the leading lines keep a paragraph each.
    let mut groups: Vec<(Vec<&str>, usize)> = Vec::new();
    for (packed, &line) in lines.iter().rev().enumerate() {
        let chars = line.chars().count();
        if chars > capacity {
            return Err(ValidationError::EntryTooLong(format!(
                "a single line of {} characters exceeds the {} a paragraph can hold",
                chars, capacity
            )));
        }

        let remaining = lines.len() - packed;
        let free = CREATE_PAGE_MAX_CHILDREN.saturating_sub(groups.len());
        match groups.last_mut() {
            Some((members, used)) if remaining > free && *used + 1 + chars <= capacity => {
                members.push(line);
                *used += 1 + chars;
            }
            _ => groups.push((vec![line], chars)),
        }
    }

    if groups.len() > CREATE_PAGE_MAX_CHILDREN {
        return Err(ValidationError::EntryTooLong(format!(
            "{} lines do not fit in {} paragraphs",
            lines.len(),
            CREATE_PAGE_MAX_CHILDREN
        )));
    }
    if groups.len() < lines.len() {
        log::debug!(
            "Folded {} lines into {} paragraphs",
            lines.len(),
            groups.len()
        );
    }

    Ok(groups
        .into_iter()
        .rev()
        .map(|(mut members, _)| {
            members.reverse();
            ContentBlock::Paragraph(split_into_runs(&members.join("\n"), RICH_TEXT_MAX_CHARS))
        })
        .collect())
}
