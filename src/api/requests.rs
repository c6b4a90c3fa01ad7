// src/api/requests.rs
//! Wire encoding of page-creation requests.
//!
//! The domain `WritePayload` knows nothing about the API's nesting; this
//! module turns it into the exact JSON `POST pages` expects.

use crate::constants::RICH_TEXT_MAX_CHARS;
use crate::model::{ContentBlock, PropertyValue, WritePayload};
use crate::types::{split_into_runs, DatabaseId, RichTextRun};
use serde_json::{json, Map, Value};

/// Builds the body of `POST pages` for a journal entry.
pub fn create_page_body(database: &DatabaseId, payload: &WritePayload) -> Value {
    let properties: Map<String, Value> = payload
        .properties
        .iter()
        .filter_map(|(name, value)| {
            property_to_wire(value).map(|wire| (name.as_str().to_string(), wire))
        })
        .collect();

    let children: Vec<Value> = payload.blocks.iter().filter_map(block_to_wire).collect();

    json!({
        "parent": { "database_id": database.to_dashed() },
        "properties": properties,
        "children": children,
    })
}

/// Encodes one property value; `Unknown` values have no wire form.
pub fn property_to_wire(value: &PropertyValue) -> Option<Value> {
    match value {
        PropertyValue::Title(text) => Some(json!({ "title": text_to_wire(text) })),
        PropertyValue::RichText(text) => Some(json!({ "rich_text": text_to_wire(text) })),
        PropertyValue::Number(number) => Some(json!({ "number": number })),
        PropertyValue::Date(Some(date)) => {
            Some(json!({ "date": { "start": date.format("%Y-%m-%d").to_string() } }))
        }
        PropertyValue::Date(None) => Some(json!({ "date": null })),
        PropertyValue::Unknown(tag) => {
            log::debug!("Skipping property of unsupported kind '{}' in write", tag);
            None
        }
    }
}

/// Encodes one content block; only paragraphs are written.
pub fn block_to_wire(block: &ContentBlock) -> Option<Value> {
    match block {
        ContentBlock::Paragraph(runs) => Some(json!({
            "object": "block",
            "type": "paragraph",
            "paragraph": { "rich_text": runs_to_wire(runs) },
        })),
        ContentBlock::Other(tag) => {
            log::debug!("Skipping non-paragraph block '{}' in write", tag);
            None
        }
    }
}

fn text_to_wire(text: &str) -> Vec<Value> {
    runs_to_wire(&split_into_runs(text, RICH_TEXT_MAX_CHARS))
}

fn runs_to_wire(runs: &[RichTextRun]) -> Vec<Value> {
    runs.iter()
        .map(|run| json!({ "type": "text", "text": { "content": run.text } }))
        .collect()
}
