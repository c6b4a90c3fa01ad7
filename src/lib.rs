// src/lib.rs
//! notion-journal library — a journal bridge between a conversational
//! assistant and a Notion database.
//!
//! # Public API
//!
//! The library exposes types organized by concern:
//! - **Error handling** — `AppError`, `ValidationError`, `NotionErrorCode`
//! - **Configuration** — `JournalConfig`, `PropertyNames`, `CommandLineInput`
//! - **Domain model** — `JournalEntry`, `PropertyValue`, `ContentBlock`, `WritePayload`
//! - **Domain types** — `PageId`, `DatabaseId`, `ApiKey`, `PropertyName`
//! - **API client** — `NotionRepository`, `NotionHttpClient`, `PaginatedFetcher`
//! - **Journal engine** — `EntryReader`, `EntryWriter`, `map_properties`, `extract_text`
//! - **Service** — `JournalService` and its HTTP routes

pub mod api;
pub mod config;
pub mod constants;
pub mod error;
pub mod error_recovery;
pub mod journal;
pub mod model;
pub mod server;
pub mod service;
pub mod types;

// --- Error Handling ---
pub use crate::error::{AppError, NotionErrorCode};
pub use crate::types::ValidationError;

// --- Configuration ---
pub use crate::config::{CommandLineInput, JournalConfig, PropertyNames};

// --- Domain Model ---
pub use crate::model::{
    ContentBlock, DatabaseSchema, FetchStatus, JournalEntry, PageStub, PropertyKind,
    PropertyValue, RawProperty, WritePayload,
};

// --- Domain Types ---
pub use crate::types::{ApiKey, DatabaseId, PageId, PropertyName, RichTextRun, ValidatedUrl};

// --- API Client ---
pub use crate::api::types::{DatabaseQuery, PageRequest, PaginatedResponse, SortSpec};
pub use crate::api::{NotionHttpClient, NotionRepository, PaginatedFetcher};
pub use crate::error_recovery::RetryPolicy;

// --- Journal Engine ---
pub use crate::journal::{
    extract_text, map_properties, EntryDraft, EntryReader, EntryWriter, ReadRequest,
};

// --- Service ---
pub use crate::service::{JournalService, SaveRequest, SaveResponse};
