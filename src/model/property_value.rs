use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A page property exactly as the API delivers it: a kind tag plus the
/// kind-specific payload stored under a key of the same name.
///
/// ```json
/// {"id": "a%3Bc", "type": "number", "number": 8}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawProperty {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl RawProperty {
    /// Returns the payload stored under the property's own kind key.
    pub fn payload(&self) -> Option<&Value> {
        self.fields.get(&self.kind)
    }
}

/// The property kinds the journal model understands.
///
/// Any other tag lands in `Unrecognized` so new Notion property types never
/// break a read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyKind {
    Title,
    RichText,
    Number,
    Date,
    Unrecognized(String),
}

impl PropertyKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "title" => Self::Title,
            "rich_text" => Self::RichText,
            "number" => Self::Number,
            "date" => Self::Date,
            other => Self::Unrecognized(other.to_string()),
        }
    }

    /// Returns the Notion API type name for this kind.
    pub fn tag(&self) -> &str {
        match self {
            Self::Title => "title",
            Self::RichText => "rich_text",
            Self::Number => "number",
            Self::Date => "date",
            Self::Unrecognized(tag) => tag,
        }
    }
}

/// A normalized property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PropertyValue {
    Title(String),
    RichText(String),
    Number(Option<f64>),
    Date(Option<NaiveDate>),
    /// A property kind outside the journal model; carries the raw tag.
    Unknown(String),
}

impl PropertyValue {
    /// Text content for title and rich-text values.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            PropertyValue::Title(text) | PropertyValue::RichText(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            PropertyValue::Number(n) => *n,
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            PropertyValue::Date(d) => *d,
            _ => None,
        }
    }

    pub fn is_title(&self) -> bool {
        matches!(self, PropertyValue::Title(_))
    }
}
