// tests/common/mod.rs
//! In-memory, scriptable Notion repository shared by the integration tests.
//!
//! Pages are served in insertion order, which stands in for the store's own
//! sort order. Failures and delays can be scripted per page.

#![allow(dead_code)]

use notion_journal::api::types::{DatabaseQuery, PageRequest, PaginatedResponse};
use notion_journal::error::NotionErrorCode;
use notion_journal::{
    AppError, ContentBlock, DatabaseId, DatabaseSchema, JournalConfig, PageId, PageStub,
    PropertyKind, PropertyNames, PropertyValue, RawProperty, WritePayload,
};
use notion_journal::{ApiKey, NotionRepository};
use indexmap::IndexMap;
use serde_json::json;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub const DATABASE: &str = "0123456789abcdef0123456789abcdef";

pub fn database_id() -> DatabaseId {
    DatabaseId::parse(DATABASE).unwrap()
}

pub fn page_id(n: usize) -> PageId {
    PageId::parse(&format!("{:032x}", n + 1)).unwrap()
}

pub fn property_names() -> PropertyNames {
    PropertyNames::new("Titel", "Datum", "Bewertung").unwrap()
}

pub fn test_config() -> JournalConfig {
    JournalConfig::new(
        ApiKey::new("secret_test_key_123456789").unwrap(),
        database_id(),
        property_names(),
    )
    .unwrap()
}

/// A failure the repository can be told to produce.
#[derive(Debug, Clone)]
pub enum Failure {
    RateLimited(Option<Duration>),
    Server,
    BadRequest,
}

impl Failure {
    fn to_error(&self) -> AppError {
        match self {
            Failure::RateLimited(retry_after) => AppError::UpstreamRateLimited {
                retry_after: *retry_after,
                message: "Rate limited".to_string(),
            },
            Failure::Server => AppError::UpstreamServer {
                status: 502,
                code: NotionErrorCode::HttpStatus(502),
                message: "Bad gateway".to_string(),
            },
            Failure::BadRequest => AppError::UpstreamBadRequest {
                status: 400,
                code: NotionErrorCode::ValidationFailed,
                message: "body failed validation".to_string(),
            },
        }
    }
}

/// Scripted outcome for a page's block fetches.
enum BlockScript {
    /// Fail the next calls in order, then succeed.
    Sequence(VecDeque<Failure>),
    Always(Failure),
}

struct StoredPage {
    stub: PageStub,
    blocks: Vec<ContentBlock>,
}

#[derive(Default)]
pub struct ScriptedRepository {
    pages: Mutex<Vec<StoredPage>>,
    schema: Mutex<DatabaseSchema>,
    schema_failure: Mutex<Option<Failure>>,
    query_failures: Mutex<VecDeque<Failure>>,
    block_scripts: Mutex<HashMap<String, BlockScript>>,
    block_delays: Mutex<HashMap<String, Duration>>,
    pub queries: Mutex<Vec<(DatabaseQuery, PageRequest)>>,
    pub block_requests: Mutex<Vec<(PageId, PageRequest)>>,
    pub created: Mutex<Vec<WritePayload>>,
    create_failure: Mutex<Option<Failure>>,
    create_attempts: AtomicUsize,
    next_id: AtomicUsize,
}

impl ScriptedRepository {
    /// A repository whose schema holds the default journal properties.
    pub fn new() -> Self {
        let repo = Self::default();
        {
            let mut schema = repo.schema.lock().unwrap();
            schema.properties.insert("Titel".to_string(), PropertyKind::Title);
            schema.properties.insert("Datum".to_string(), PropertyKind::Date);
            schema.properties.insert("Bewertung".to_string(), PropertyKind::Number);
        }
        repo
    }

    /// Seeds `count` entries titled "Entry {n}" with a one-line body each.
    pub fn with_entries(count: usize) -> Self {
        let repo = Self::new();
        for n in 0..count {
            repo.insert_entry(
                &format!("Entry {}", n),
                vec![ContentBlock::paragraph(&format!("Body {}", n))],
            );
        }
        repo
    }

    /// Appends a page with the given title and blocks, returning its ID.
    pub fn insert_entry(&self, title: &str, blocks: Vec<ContentBlock>) -> PageId {
        let mut properties = IndexMap::new();
        properties.insert("Titel".to_string(), PropertyValue::Title(title.to_string()));
        self.insert_page(properties, blocks)
    }

    pub fn insert_page(
        &self,
        properties: IndexMap<String, PropertyValue>,
        blocks: Vec<ContentBlock>,
    ) -> PageId {
        let id = page_id(self.next_id.fetch_add(1, Ordering::SeqCst));
        let properties = properties
            .iter()
            .filter_map(|(name, value)| raw_property(value).map(|raw| (name.clone(), raw)))
            .collect();
        self.pages.lock().unwrap().push(StoredPage {
            stub: PageStub {
                id: id.clone(),
                created_time: None,
                properties,
            },
            blocks,
        });
        id
    }

    pub fn remove_schema_property(&self, name: &str) {
        self.schema.lock().unwrap().properties.shift_remove(name);
    }

    pub fn fail_schema(&self, failure: Failure) {
        *self.schema_failure.lock().unwrap() = Some(failure);
    }

    pub fn fail_next_queries(&self, failures: impl IntoIterator<Item = Failure>) {
        self.query_failures.lock().unwrap().extend(failures);
    }

    pub fn fail_next_block_fetches(&self, page: &PageId, failures: impl IntoIterator<Item = Failure>) {
        self.block_scripts.lock().unwrap().insert(
            page.as_str().to_string(),
            BlockScript::Sequence(failures.into_iter().collect()),
        );
    }

    pub fn fail_block_fetches(&self, page: &PageId, failure: Failure) {
        self.block_scripts
            .lock()
            .unwrap()
            .insert(page.as_str().to_string(), BlockScript::Always(failure));
    }

    pub fn delay_block_fetches(&self, page: &PageId, delay: Duration) {
        self.block_delays
            .lock()
            .unwrap()
            .insert(page.as_str().to_string(), delay);
    }

    pub fn fail_next_create(&self, failure: Failure) {
        *self.create_failure.lock().unwrap() = Some(failure);
    }

    pub fn create_attempts(&self) -> usize {
        self.create_attempts.load(Ordering::SeqCst)
    }

    pub fn query_page_sizes(&self) -> Vec<u32> {
        self.queries
            .lock()
            .unwrap()
            .iter()
            .map(|(_, page)| page.page_size)
            .collect()
    }

    pub fn block_fetch_count(&self, page: &PageId) -> usize {
        self.block_requests
            .lock()
            .unwrap()
            .iter()
            .filter(|(id, _)| id == page)
            .count()
    }

    fn scripted_block_failure(&self, page: &PageId) -> Option<AppError> {
        let mut scripts = self.block_scripts.lock().unwrap();
        match scripts.get_mut(page.as_str())? {
            BlockScript::Sequence(failures) => failures.pop_front().map(|f| f.to_error()),
            BlockScript::Always(failure) => Some(failure.to_error()),
        }
    }
}

/// Serves `items` from `page.start_cursor` onward, using the index as cursor.
fn slice_page<T: Clone>(items: &[T], page: &PageRequest) -> PaginatedResponse<T> {
    let start: usize = page
        .start_cursor
        .as_deref()
        .map(|c| c.parse().unwrap())
        .unwrap_or(0);
    let end = (start + page.page_size as usize).min(items.len());
    let has_more = end < items.len();
    PaginatedResponse {
        results: items[start..end].to_vec(),
        next_cursor: has_more.then(|| end.to_string()),
        has_more,
    }
}

/// Builds the property shape a query result carries for `value`.
fn raw_property(value: &PropertyValue) -> Option<RawProperty> {
    let json = match value {
        PropertyValue::Title(text) => json!({"type": "title", "title": [{"plain_text": text}]}),
        PropertyValue::RichText(text) => {
            json!({"type": "rich_text", "rich_text": [{"plain_text": text}]})
        }
        PropertyValue::Number(n) => json!({"type": "number", "number": n}),
        PropertyValue::Date(d) => json!({
            "type": "date",
            "date": d.map(|d| json!({"start": d.format("%Y-%m-%d").to_string(), "end": null}))
        }),
        PropertyValue::Unknown(_) => return None,
    };
    Some(serde_json::from_value(json).unwrap())
}

#[async_trait::async_trait]
impl NotionRepository for ScriptedRepository {
    async fn query_database(
        &self,
        _database: &DatabaseId,
        query: &DatabaseQuery,
        page: &PageRequest,
    ) -> Result<PaginatedResponse<PageStub>, AppError> {
        self.queries
            .lock()
            .unwrap()
            .push((query.clone(), page.clone()));
        if let Some(failure) = self.query_failures.lock().unwrap().pop_front() {
            return Err(failure.to_error());
        }
        let stubs: Vec<PageStub> = self
            .pages
            .lock()
            .unwrap()
            .iter()
            .map(|p| p.stub.clone())
            .collect();
        Ok(slice_page(&stubs, page))
    }

    async fn retrieve_block_children(
        &self,
        page_id: &PageId,
        page: &PageRequest,
    ) -> Result<PaginatedResponse<ContentBlock>, AppError> {
        self.block_requests
            .lock()
            .unwrap()
            .push((page_id.clone(), page.clone()));

        let delay = self.block_delays.lock().unwrap().get(page_id.as_str()).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(error) = self.scripted_block_failure(page_id) {
            return Err(error);
        }

        let blocks = self
            .pages
            .lock()
            .unwrap()
            .iter()
            .find(|p| &p.stub.id == page_id)
            .map(|p| p.blocks.clone())
            .unwrap_or_default();
        Ok(slice_page(&blocks, page))
    }

    async fn retrieve_database_schema(
        &self,
        _database: &DatabaseId,
    ) -> Result<DatabaseSchema, AppError> {
        if let Some(failure) = self.schema_failure.lock().unwrap().as_ref() {
            return Err(failure.to_error());
        }
        Ok(self.schema.lock().unwrap().clone())
    }

    async fn create_page(
        &self,
        _database: &DatabaseId,
        payload: &WritePayload,
    ) -> Result<PageId, AppError> {
        self.create_attempts.fetch_add(1, Ordering::SeqCst);
        if let Some(failure) = self.create_failure.lock().unwrap().take() {
            return Err(failure.to_error());
        }
        self.created.lock().unwrap().push(payload.clone());
        let properties = payload
            .properties
            .iter()
            .map(|(name, value)| (name.as_str().to_string(), value.clone()))
            .collect();
        Ok(self.insert_page(properties, payload.blocks.clone()))
    }
}
