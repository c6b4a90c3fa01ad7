use crate::types::RichTextRun;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Block kinds whose payload carries a `rich_text` array.
const TEXT_BEARING_KINDS: &[&str] = &[
    "paragraph",
    "heading_1",
    "heading_2",
    "heading_3",
    "bulleted_list_item",
    "numbered_list_item",
    "to_do",
    "toggle",
    "quote",
    "callout",
    "code",
];

/// A content block as the API delivers it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawBlock {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// A normalized content block.
///
/// Every text-bearing kind is read as a `Paragraph`, so extraction resolves
/// rich-text runs regardless of how the block was styled in Notion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ContentBlock {
    Paragraph(Vec<RichTextRun>),
    Other(String),
}

impl ContentBlock {
    pub fn paragraph(text: &str) -> Self {
        if text.is_empty() {
            ContentBlock::Paragraph(Vec::new())
        } else {
            ContentBlock::Paragraph(vec![RichTextRun::new(text)])
        }
    }

    /// Returns the Notion API type name for this block.
    pub fn block_type(&self) -> &str {
        match self {
            ContentBlock::Paragraph(_) => "paragraph",
            ContentBlock::Other(tag) => tag,
        }
    }
}

impl From<RawBlock> for ContentBlock {
    fn from(raw: RawBlock) -> Self {
        if !TEXT_BEARING_KINDS.contains(&raw.kind.as_str()) {
            return ContentBlock::Other(raw.kind);
        }

        let runs = raw
            .fields
            .get(&raw.kind)
            .and_then(|payload| payload.get("rich_text"))
            .cloned()
            .map(serde_json::from_value::<Vec<RichTextRun>>);

        match runs {
            Some(Ok(runs)) => ContentBlock::Paragraph(runs),
            Some(Err(e)) => {
                log::debug!("Unreadable rich_text in {} block: {}", raw.kind, e);
                ContentBlock::Paragraph(Vec::new())
            }
            None => ContentBlock::Paragraph(Vec::new()),
        }
    }
}
