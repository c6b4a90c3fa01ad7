// src/api/responses.rs
//! API response envelopes and their conversion into domain types.

use super::types::PaginatedResponse;
use crate::model::{ContentBlock, DatabaseSchema, PageStub, PropertyKind, RawBlock};
use crate::types::PageId;
use indexmap::IndexMap;
use serde::Deserialize;

/// Database query response: one page of rows.
pub type QueryDatabaseResponse = PaginatedResponse<PageStub>;

/// Block children response: one page of raw blocks.
pub type RetrieveBlockChildrenResponse = PaginatedResponse<RawBlock>;

/// The part of a created page the writer reports back.
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedPage {
    pub id: PageId,
}

/// Schema entry of a database property.
#[derive(Debug, Clone, Deserialize)]
pub struct SchemaProperty {
    #[serde(rename = "type")]
    pub kind: String,
}

/// `GET databases/{id}` response, reduced to its property schema.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseResponse {
    #[serde(default)]
    pub properties: IndexMap<String, SchemaProperty>,
}

/// Trait for converting API envelopes to domain types
pub trait ToDomain<T> {
    fn to_domain(self) -> T;
}

impl ToDomain<DatabaseSchema> for DatabaseResponse {
    fn to_domain(self) -> DatabaseSchema {
        DatabaseSchema {
            properties: self
                .properties
                .into_iter()
                .map(|(name, prop)| (name, PropertyKind::from_tag(&prop.kind)))
                .collect(),
        }
    }
}

impl ToDomain<PaginatedResponse<ContentBlock>> for RetrieveBlockChildrenResponse {
    fn to_domain(self) -> PaginatedResponse<ContentBlock> {
        self.map(ContentBlock::from)
    }
}
