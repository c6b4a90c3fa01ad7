// src/journal/text.rs
//! Reconstructs plain entry text from content blocks.

use crate::model::ContentBlock;
use crate::types::concat_plain_text;

/// Joins the paragraphs of a page into plain text.
///
/// Runs inside a paragraph are concatenated without separator, paragraphs
/// are separated by a single newline, and non-text blocks are skipped. The
/// result is trimmed.
pub fn extract_text(blocks: &[ContentBlock]) -> String {
    let paragraphs: Vec<String> = blocks
        .iter()
        .filter_map(|block| match block {
            ContentBlock::Paragraph(runs) => Some(concat_plain_text(runs)),
            ContentBlock::Other(_) => None,
        })
        .collect();
    paragraphs.join("\n").trim().to_string()
}
