// src/api/parser.rs
//! Response parsing: success bodies into typed envelopes, error bodies into
//! the error taxonomy.

use super::client::ApiResponse;
use super::responses::{
    CreatedPage, DatabaseResponse, QueryDatabaseResponse, RetrieveBlockChildrenResponse, ToDomain,
};
use super::types::PaginatedResponse;
use crate::constants::ERROR_BODY_PREVIEW_LENGTH;
use crate::error::{classify_upstream_failure, AppError};
use crate::model::{ContentBlock, DatabaseSchema, PageStub};
use crate::types::PageId;

/// Parse any Notion API response, classifying non-success statuses.
pub fn parse_api_response<T>(result: ApiResponse<String>) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    if result.status.is_success() {
        parse_success_body(&result.data, &result.url)
    } else {
        let error = classify_upstream_failure(
            result.status.as_u16(),
            result.retry_after,
            &result.data,
        );
        log::debug!("Request to {} failed: {}", result.url, error);
        Err(error)
    }
}

fn parse_success_body<T>(body: &str, url: &str) -> Result<T, AppError>
where
    T: serde::de::DeserializeOwned,
{
    serde_json::from_str(body).map_err(|e| {
        log::error!("Failed to parse response from {}: {}", url, e);
        let preview: String = body.chars().take(ERROR_BODY_PREVIEW_LENGTH).collect();
        AppError::MalformedResponse(format!("{} (body: {})", e, preview))
    })
}

/// Parse one page of database query results.
pub fn parse_pages_pagination(
    result: ApiResponse<String>,
) -> Result<PaginatedResponse<PageStub>, AppError> {
    parse_api_response::<QueryDatabaseResponse>(result)
}

/// Parse one page of block children.
pub fn parse_blocks_pagination(
    result: ApiResponse<String>,
) -> Result<PaginatedResponse<ContentBlock>, AppError> {
    let response: RetrieveBlockChildrenResponse = parse_api_response(result)?;
    Ok(response.to_domain())
}

/// Parse a database object into its property schema.
pub fn parse_database_schema(result: ApiResponse<String>) -> Result<DatabaseSchema, AppError> {
    let response: DatabaseResponse = parse_api_response(result)?;
    Ok(response.to_domain())
}

/// Parse a page-creation response into the new page's ID.
pub fn parse_created_page(result: ApiResponse<String>) -> Result<PageId, AppError> {
    let page: CreatedPage = parse_api_response(result)?;
    Ok(page.id)
}
