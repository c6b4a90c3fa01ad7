// src/journal/mod.rs
//! The journal engine: property normalization, text reconstruction, and the
//! read and write paths built on top of them.

mod properties;
mod reader;
mod text;
mod writer;

pub use properties::{map_properties, map_property};
pub use reader::{EntryReader, ReadRequest, TIMEOUT_REASON};
pub use text::extract_text;
pub use writer::{chunk_text, derive_title, EntryDraft, EntryWriter};
