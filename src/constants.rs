// src/constants.rs
//! Domain constants that define the operational boundaries of the system.
//!
//! Each constant is named for the domain concept it constrains, not its
//! technical role. Reading these constants should tell you the story of how
//! the bridge talks to Notion: how much it asks for per request, how long it
//! waits when told to slow down, and how it packs an entry into blocks.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Notion API boundaries
// ---------------------------------------------------------------------------

/// How many objects the Notion API returns per page of results.
///
/// The Notion API maximum is 100. Requests never ask for more.
pub const NOTION_API_PAGE_SIZE: u32 = 100;

/// Maximum characters Notion accepts in a single rich-text run.
pub const RICH_TEXT_MAX_CHARS: usize = 2000;

/// Maximum rich-text runs Notion accepts in a single block.
pub const RICH_TEXT_MAX_RUNS_PER_BLOCK: usize = 100;

/// Maximum child blocks accepted in one page-creation request.
pub const CREATE_PAGE_MAX_CHILDREN: usize = 100;

// ---------------------------------------------------------------------------
// Retry and pacing
// ---------------------------------------------------------------------------

/// How many times a rate-limited page fetch is retried before giving up.
pub const RATE_LIMIT_MAX_RETRIES: u32 = 3;

/// Wait applied after a 429 that carries no `Retry-After` header.
pub const RATE_LIMIT_DEFAULT_BACKOFF: Duration = Duration::from_secs(1);

/// How many times a page fetch is retried after a 5xx or transport failure.
pub const SERVER_ERROR_MAX_RETRIES: u32 = 3;

/// First wait after a server error; doubles on every further attempt.
pub const SERVER_ERROR_INITIAL_BACKOFF: Duration = Duration::from_millis(250);

/// Upper bound for the exponential server-error backoff.
pub const SERVER_ERROR_MAX_BACKOFF: Duration = Duration::from_secs(8);

/// Per-request timeout for every call to the store.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

// ---------------------------------------------------------------------------
// Read path
// ---------------------------------------------------------------------------

/// Default number of block fetches in flight during a read.
///
/// Notion allows roughly three requests per second per integration, so a
/// small pool keeps reads fast without tripping the rate limiter.
pub const DEFAULT_READ_CONCURRENCY: usize = 3;

/// Hard ceiling for configured read concurrency.
pub const MAX_READ_CONCURRENCY: usize = 16;

/// Entries returned when the caller does not ask for a specific count.
pub const DEFAULT_READ_LIMIT: usize = 10;

// ---------------------------------------------------------------------------
// Write path
// ---------------------------------------------------------------------------

/// Rating stored when the caller gives none.
pub const DEFAULT_RATING: f64 = 7.0;

/// Longest title derived from the first sentence of an entry.
pub const DERIVED_TITLE_MAX_CHARS: usize = 50;

/// Title used when neither an explicit nor a derived title is available.
pub const FALLBACK_TITLE: &str = "GPT Journal Entry";

// ---------------------------------------------------------------------------
// Error display
// ---------------------------------------------------------------------------

/// Maximum characters shown when previewing error response bodies.
pub const ERROR_BODY_PREVIEW_LENGTH: usize = 200;
