// src/api/mod.rs
//! Notion API interaction — reading journal pages from a database and
//! creating new ones.
//!
//! This module keeps I/O, parsing and pagination apart: the client does HTTP,
//! the parser turns bodies into types, and the paginated fetcher follows
//! cursors under the retry policy.

pub mod client;
pub mod pagination;
pub mod parser;
pub mod requests;
mod responses;
pub mod types;

use crate::error::AppError;
use crate::model::{ContentBlock, DatabaseSchema, PageStub, WritePayload};
use crate::types::{DatabaseId, PageId};
use types::{DatabaseQuery, PageRequest, PaginatedResponse};

/// The ability to read and write pages of a Notion database.
///
/// Every method performs exactly one request; retry and pagination live in
/// the callers. Business logic depends on this trait, never on HTTP details.
#[async_trait::async_trait]
pub trait NotionRepository: Send + Sync {
    /// Fetches one page of query results.
    async fn query_database(
        &self,
        database: &DatabaseId,
        query: &DatabaseQuery,
        page: &PageRequest,
    ) -> Result<PaginatedResponse<PageStub>, AppError>;

    /// Fetches one page of a page's top-level content blocks.
    async fn retrieve_block_children(
        &self,
        page_id: &PageId,
        page: &PageRequest,
    ) -> Result<PaginatedResponse<ContentBlock>, AppError>;

    /// Fetches the property schema of a database.
    async fn retrieve_database_schema(
        &self,
        database: &DatabaseId,
    ) -> Result<DatabaseSchema, AppError>;

    /// Creates a page in `database`, returning its ID.
    async fn create_page(
        &self,
        database: &DatabaseId,
        payload: &WritePayload,
    ) -> Result<PageId, AppError>;
}

// Re-export the public interface
pub use client::NotionHttpClient;
pub use pagination::PaginatedFetcher;
