// src/api/client.rs
//! Pure HTTP client wrapper for Notion API.
//!
//! This module provides a thin wrapper around reqwest for making HTTP
//! requests to the Notion API. It handles authentication, per-request
//! timeouts and response metadata, without retry or business logic.

use super::types::{DatabaseQuery, DatabaseQueryBody, PageRequest, PaginatedResponse};
use super::{parser, requests, NotionRepository};
use crate::error::AppError;
use crate::model::{ContentBlock, DatabaseSchema, PageStub, WritePayload};
use crate::types::{ApiKey, DatabaseId, PageId, ValidatedUrl};
use reqwest::{header, Client, Response};
use serde::Serialize;
use std::time::Duration;

const NOTION_VERSION: &str = "2022-06-28";
pub const API_BASE_URL: &str = "https://api.notion.com/v1";

/// A thin wrapper around reqwest Client for Notion API requests.
#[derive(Clone)]
pub struct NotionHttpClient {
    client: Client,
    base_url: String,
}

impl NotionHttpClient {
    /// Creates a new HTTP client with Notion API authentication.
    pub fn new(
        api_key: &ApiKey,
        base_url: &ValidatedUrl,
        request_timeout: Duration,
    ) -> Result<Self, AppError> {
        let client = Client::builder()
            .default_headers(Self::create_headers(api_key)?)
            .timeout(request_timeout)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.as_base().to_string(),
        })
    }

    /// Creates the default headers for Notion API requests.
    fn create_headers(api_key: &ApiKey) -> Result<header::HeaderMap, AppError> {
        let mut headers = header::HeaderMap::new();

        let auth_header = format!("Bearer {}", api_key.as_str());
        headers.insert(
            header::AUTHORIZATION,
            header::HeaderValue::from_str(&auth_header).map_err(|e| {
                AppError::MissingConfiguration(format!("Invalid API token format: {}", e))
            })?,
        );

        headers.insert(
            "Notion-Version",
            header::HeaderValue::from_static(NOTION_VERSION),
        );

        headers.insert(
            header::CONTENT_TYPE,
            header::HeaderValue::from_static("application/json"),
        );

        Ok(headers)
    }

    fn url(&self, endpoint: &str) -> String {
        format!("{}/{}", self.base_url, endpoint)
    }

    /// Makes a GET request with query parameters to the specified endpoint.
    pub async fn get<Q: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        query: &Q,
    ) -> Result<Response, AppError> {
        let url = self.url(endpoint);
        log::debug!("GET {}", url);
        let response = self.client.get(url).query(query).send().await?;
        log::debug!("GET {} -> {}", endpoint, response.status());
        Ok(response)
    }

    /// Makes a POST request with JSON body to the specified endpoint.
    pub async fn post<T: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &T,
    ) -> Result<Response, AppError> {
        let url = self.url(endpoint);
        log::debug!("POST {}", url);
        let response = self.client.post(url).json(body).send().await?;
        log::debug!("POST {} -> {}", endpoint, response.status());
        Ok(response)
    }
}

#[async_trait::async_trait]
impl NotionRepository for NotionHttpClient {
    async fn query_database(
        &self,
        database: &DatabaseId,
        query: &DatabaseQuery,
        page: &PageRequest,
    ) -> Result<PaginatedResponse<PageStub>, AppError> {
        let endpoint = format!("databases/{}/query", database.to_dashed());
        let body = DatabaseQueryBody::new(query, page);
        let response = self.post(&endpoint, &body).await?;
        let result = extract_response_text(response).await?;
        parser::parse_pages_pagination(result)
    }

    async fn retrieve_block_children(
        &self,
        page_id: &PageId,
        page: &PageRequest,
    ) -> Result<PaginatedResponse<ContentBlock>, AppError> {
        let endpoint = format!("blocks/{}/children", page_id.to_dashed());
        let mut params: Vec<(&str, String)> = vec![("page_size", page.page_size.to_string())];
        if let Some(cursor) = &page.start_cursor {
            params.push(("start_cursor", cursor.clone()));
        }
        let response = self.get(&endpoint, &params).await?;
        let result = extract_response_text(response).await?;
        parser::parse_blocks_pagination(result)
    }

    async fn retrieve_database_schema(
        &self,
        database: &DatabaseId,
    ) -> Result<DatabaseSchema, AppError> {
        let endpoint = format!("databases/{}", database.to_dashed());
        let response = self.get(&endpoint, &[] as &[(&str, &str)]).await?;
        let result = extract_response_text(response).await?;
        parser::parse_database_schema(result)
    }

    async fn create_page(
        &self,
        database: &DatabaseId,
        payload: &WritePayload,
    ) -> Result<PageId, AppError> {
        let body = requests::create_page_body(database, payload);
        let response = self.post("pages", &body).await?;
        let result = extract_response_text(response).await?;
        parser::parse_created_page(result)
    }
}

/// Result of an HTTP operation with response metadata.
#[derive(Debug)]
pub struct ApiResponse<T> {
    pub data: T,
    pub status: reqwest::StatusCode,
    pub url: String,
    /// Wait requested by the server via `Retry-After`, if any.
    pub retry_after: Option<Duration>,
}

/// Extracts the response body as text with metadata.
pub async fn extract_response_text(response: Response) -> Result<ApiResponse<String>, AppError> {
    let status = response.status();
    let url = response.url().to_string();
    let retry_after = response
        .headers()
        .get(header::RETRY_AFTER)
        .and_then(|value| value.to_str().ok())
        .and_then(parse_retry_after);
    let text = response.text().await?;

    Ok(ApiResponse {
        data: text,
        status,
        url,
        retry_after,
    })
}

/// Parses a `Retry-After` value given in (possibly fractional) seconds.
fn parse_retry_after(value: &str) -> Option<Duration> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|secs| secs.is_finite() && *secs >= 0.0)
        .map(Duration::from_secs_f64)
}
