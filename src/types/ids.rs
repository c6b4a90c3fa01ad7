use super::ValidationError;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::marker::PhantomData;
use uuid::Uuid;

/// Strong typing for IDs with phantom types
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Id<T> {
    value: String,
    _phantom: PhantomData<T>,
}

/// Marker types for different ID kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DatabaseMarker;

pub type PageId = Id<PageMarker>;
pub type DatabaseId = Id<DatabaseMarker>;

impl<T> Id<T> {
    /// Parses a raw hex ID, a hyphenated UUID, or a Notion URL into a normalized ID.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let normalized = normalize_notion_id(input)?;
        Ok(Self::from_normalized(normalized))
    }

    /// Wraps an ID exactly as the API reported it.
    pub(crate) fn from_normalized(value: String) -> Self {
        Self {
            value,
            _phantom: PhantomData,
        }
    }

    /// Get the ID as a string reference
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns the hyphenated UUID form used in API paths.
    pub fn to_dashed(&self) -> String {
        if self.value.len() == 32 && !self.value.contains('-') {
            format!(
                "{}-{}-{}-{}-{}",
                &self.value[0..8],
                &self.value[8..12],
                &self.value[12..16],
                &self.value[16..20],
                &self.value[20..32]
            )
        } else {
            self.value.clone()
        }
    }
}

impl<T> fmt::Display for Id<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value)
    }
}

impl<T> Serialize for Id<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.value.serialize(serializer)
    }
}

impl<'de, T> Deserialize<'de> for Id<T> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(Self::from_normalized(value))
    }
}

/// Normalize various Notion ID formats into the 32-char lowercase hex form.
fn normalize_notion_id(input: &str) -> Result<String, ValidationError> {
    let cleaned = input.trim().trim_end_matches('/');

    if cleaned.is_empty() {
        return Err(ValidationError::EmptyField("notion id"));
    }

    if let Ok(uuid) = Uuid::parse_str(cleaned) {
        return Ok(uuid.as_simple().to_string());
    }

    if cleaned.len() == 32 && cleaned.chars().all(|c| c.is_ascii_hexdigit()) {
        return Ok(cleaned.to_lowercase());
    }

    if cleaned.starts_with("http://") || cleaned.starts_with("https://") {
        return extract_id_from_url(cleaned);
    }

    Err(ValidationError::InvalidId(format!(
        "Could not parse Notion ID from: {}",
        input
    )))
}

/// Extracts the trailing object ID from a Notion URL.
fn extract_id_from_url(url: &str) -> Result<String, ValidationError> {
    lazy_static::lazy_static! {
        static ref ID_REGEX: Regex = Regex::new(
            r"(?:[/-])([a-fA-F0-9]{32}|[a-fA-F0-9]{8}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{4}-[a-fA-F0-9]{12})(?:[/?#]|$)"
        ).expect("Failed to compile Notion ID regex - this is a bug in the code");
    }

    ID_REGEX
        .captures(url)
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str().replace('-', "").to_lowercase())
        .ok_or_else(|| ValidationError::InvalidId(format!("No valid ID found in URL: {}", url)))
}
