// src/api/pagination.rs
//! Cursor-following retrieval shared by database queries and block children.
//!
//! A `PaginatedFetcher` wraps a single-page fetch closure and turns it into a
//! lazy stream of items. Each page fetch runs under the retry policy, so
//! rate limits and transient server errors are absorbed here and only
//! surface once the budget is spent.

use super::types::{PageRequest, PaginatedResponse};
use crate::constants::NOTION_API_PAGE_SIZE;
use crate::error::AppError;
use crate::error_recovery::{retry_with_backoff, RetryPolicy};
use futures::stream::{self, Stream, TryStreamExt};
use std::future::Future;

/// Lazy, single-use paginated retrieval.
pub struct PaginatedFetcher<F> {
    fetch_page: F,
    page_size: u32,
    limit: Option<usize>,
    policy: RetryPolicy,
}

impl<F> PaginatedFetcher<F> {
    pub fn new(fetch_page: F) -> Self {
        Self {
            fetch_page,
            page_size: NOTION_API_PAGE_SIZE,
            limit: None,
            policy: RetryPolicy::default(),
        }
    }

    /// Sets the per-request page size ceiling, clamped to what the API accepts.
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, NOTION_API_PAGE_SIZE);
        self
    }

    /// Stops after `limit` items, never requesting more than still needed.
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }
}

/// Mutable cursor state threaded through the stream.
struct Pagination<F> {
    fetch_page: F,
    page_size: u32,
    remaining: Option<usize>,
    policy: RetryPolicy,
    cursor: Option<String>,
    exhausted: bool,
    pages_fetched: u32,
}

impl<T, F, Fut> PaginatedFetcher<F>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<PaginatedResponse<T>, AppError>>,
{
    /// Turns the fetcher into a stream of items in store order.
    ///
    /// No request is made until the stream is polled. A failed page ends the
    /// stream with that error; items already yielded stay valid.
    pub fn into_stream(self) -> impl Stream<Item = Result<T, AppError>> {
        let state = Pagination {
            fetch_page: self.fetch_page,
            page_size: self.page_size,
            remaining: self.limit,
            policy: self.policy,
            cursor: None,
            exhausted: false,
            pages_fetched: 0,
        };

        stream::try_unfold(state, |mut state| async move {
            if state.exhausted || state.remaining == Some(0) {
                return Ok::<_, AppError>(None);
            }

            let page_size = match state.remaining {
                Some(remaining) => remaining.min(state.page_size as usize) as u32,
                None => state.page_size,
            };
            let request = PageRequest {
                page_size,
                start_cursor: state.cursor.clone(),
            };

            let fetch = &mut state.fetch_page;
            let response = retry_with_backoff(
                || fetch(request.clone()),
                &state.policy,
                request.start_cursor.as_deref(),
            )
            .await?;

            state.pages_fetched += 1;
            let mut items = response.results;
            if let Some(remaining) = state.remaining.as_mut() {
                items.truncate(*remaining);
                *remaining -= items.len();
            }
            state.exhausted = !response.has_more || response.next_cursor.is_none();
            state.cursor = response.next_cursor;

            log::debug!(
                "Fetched page {} ({} items, more: {})",
                state.pages_fetched,
                items.len(),
                !state.exhausted
            );

            Ok(Some((items, state)))
        })
        .map_ok(|items| stream::iter(items.into_iter().map(Ok)))
        .try_flatten()
    }

    /// Drains every page into a vector.
    pub async fn collect_all(self) -> Result<Vec<T>, AppError> {
        self.into_stream().try_collect().await
    }
}
