// src/journal/properties.rs
//! Normalizes raw page properties into `PropertyValue`s.
//!
//! Mapping never fails. A payload whose shape does not match its kind tag is
//! read as empty and logged, so a single odd property cannot cost the
//! assistant a whole entry.

use crate::model::{PropertyKind, PropertyValue, RawProperty};
use crate::types::{concat_plain_text, RichTextRun};
use chrono::NaiveDate;
use indexmap::IndexMap;
use serde_json::Value;

/// Maps every raw property of a page, keyed and ordered as given.
pub fn map_properties(raw: &IndexMap<String, RawProperty>) -> IndexMap<String, PropertyValue> {
    raw.iter()
        .map(|(name, property)| (name.clone(), map_property(name, property)))
        .collect()
}

/// Maps a single raw property.
pub fn map_property(name: &str, raw: &RawProperty) -> PropertyValue {
    let payload = raw.payload();
    match PropertyKind::from_tag(&raw.kind) {
        PropertyKind::Title => PropertyValue::Title(plain_text(name, payload)),
        PropertyKind::RichText => PropertyValue::RichText(plain_text(name, payload)),
        PropertyKind::Number => PropertyValue::Number(number(name, payload)),
        PropertyKind::Date => PropertyValue::Date(date_start(name, payload)),
        PropertyKind::Unrecognized(tag) => PropertyValue::Unknown(tag),
    }
}

fn plain_text(name: &str, payload: Option<&Value>) -> String {
    let Some(value) = payload else {
        log::debug!("Property '{}' has no text payload", name);
        return String::new();
    };
    match serde_json::from_value::<Vec<RichTextRun>>(value.clone()) {
        Ok(runs) => concat_plain_text(&runs),
        Err(e) => {
            log::debug!("Property '{}' has unreadable rich text: {}", name, e);
            String::new()
        }
    }
}

fn number(name: &str, payload: Option<&Value>) -> Option<f64> {
    match payload {
        None | Some(Value::Null) => None,
        Some(value) => {
            let n = value.as_f64();
            if n.is_none() {
                log::debug!("Property '{}' holds a non-numeric value: {}", name, value);
            }
            n
        }
    }
}

/// Reads the calendar date from the `start` field, dropping any time part.
fn date_start(name: &str, payload: Option<&Value>) -> Option<NaiveDate> {
    let start = payload?.get("start")?.as_str()?;
    let day: String = start.chars().take(10).collect();
    match NaiveDate::parse_from_str(&day, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(e) => {
            log::debug!("Property '{}' has unparseable date '{}': {}", name, start, e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn raw(value: Value) -> RawProperty {
        serde_json::from_value(value).unwrap()
    }

    fn page_properties() -> IndexMap<String, RawProperty> {
        let mut props = IndexMap::new();
        props.insert(
            "Titel".to_string(),
            raw(json!({"id": "title", "type": "title", "title": [
                {"type": "text", "plain_text": "Good "},
                {"type": "text", "plain_text": "day"}
            ]})),
        );
        props.insert(
            "Datum".to_string(),
            raw(json!({"id": "d", "type": "date", "date": {"start": "2024-05-17T08:30:00.000+02:00", "end": null}})),
        );
        props.insert(
            "Bewertung".to_string(),
            raw(json!({"id": "r", "type": "number", "number": 8.5})),
        );
        props.insert(
            "Tags".to_string(),
            raw(json!({"id": "t", "type": "multi_select", "multi_select": []})),
        );
        props
    }

    #[test]
    fn maps_known_kinds_in_order() {
        let mapped = map_properties(&page_properties());
        assert_eq!(
            mapped.into_iter().collect::<Vec<_>>(),
            vec![
                ("Titel".to_string(), PropertyValue::Title("Good day".to_string())),
                (
                    "Datum".to_string(),
                    PropertyValue::Date(NaiveDate::from_ymd_opt(2024, 5, 17))
                ),
                ("Bewertung".to_string(), PropertyValue::Number(Some(8.5))),
                (
                    "Tags".to_string(),
                    PropertyValue::Unknown("multi_select".to_string())
                ),
            ]
        );
    }

    #[test]
    fn empty_and_null_payloads() {
        let title = raw(json!({"type": "title", "title": []}));
        assert_eq!(map_property("Titel", &title), PropertyValue::Title(String::new()));

        let number = raw(json!({"type": "number", "number": null}));
        assert_eq!(map_property("Bewertung", &number), PropertyValue::Number(None));

        let date = raw(json!({"type": "date", "date": null}));
        assert_eq!(map_property("Datum", &date), PropertyValue::Date(None));
    }

    #[test]
    fn mismatched_shapes_degrade_to_empty() {
        let title = raw(json!({"type": "title", "title": "not a list"}));
        assert_eq!(map_property("Titel", &title), PropertyValue::Title(String::new()));

        let number = raw(json!({"type": "number", "number": "eight"}));
        assert_eq!(map_property("Bewertung", &number), PropertyValue::Number(None));

        let date = raw(json!({"type": "date", "date": {"start": "someday"}}));
        assert_eq!(map_property("Datum", &date), PropertyValue::Date(None));

        let missing = raw(json!({"type": "rich_text"}));
        assert_eq!(map_property("Notes", &missing), PropertyValue::RichText(String::new()));
    }

    #[test]
    fn plain_date_without_time() {
        let date = raw(json!({"type": "date", "date": {"start": "2023-12-31"}}));
        assert_eq!(
            map_property("Datum", &date),
            PropertyValue::Date(NaiveDate::from_ymd_opt(2023, 12, 31))
        );
    }
}
