use thiserror::Error;

mod domain_types;
mod ids;
mod rich_text;

pub use domain_types::*;
pub use ids::*;
pub use rich_text::*;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Invalid Notion ID format: {0}")]
    InvalidId(String),

    #[error("Invalid URL: {url} - {reason}")]
    InvalidUrl { url: String, reason: String },

    #[error("Empty required field: {0}")]
    EmptyField(&'static str),

    #[error("Value out of bounds for {field}: {value}, expected {min}..={max}")]
    OutOfBounds {
        field: &'static str,
        value: usize,
        min: usize,
        max: usize,
    },

    #[error("Invalid API key format: {reason}")]
    InvalidApiKey { reason: String },

    #[error("Invalid rating: {0} is not a finite number")]
    InvalidRating(f64),

    #[error("Invalid date '{input}': {reason}")]
    InvalidDate { input: String, reason: String },

    #[error("Invalid property name for {field}: {reason}")]
    InvalidPropertyName { field: &'static str, reason: String },

    #[error("Property '{name}' is mapped to both {first} and {second}")]
    DuplicatePropertyName {
        name: String,
        first: &'static str,
        second: &'static str,
    },

    #[error("Entry too long: {0}")]
    EntryTooLong(String),

    #[error("Malformed request: {0}")]
    MalformedRequest(String),
}
