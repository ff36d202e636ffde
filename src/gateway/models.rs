use crate::error::{AppError, Result};
use mongodb::bson::{Bson, Document};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A person document as returned to clients: every stored field, `_id` as a string
pub type PersonRecord = Map<String, Value>;

/// One autocomplete suggestion
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NameSuggestion {
    pub first_name: String,
}

/// String form of a document identifier
pub fn render_id(id: &Bson) -> String {
    match id {
        Bson::ObjectId(oid) => oid.to_hex(),
        Bson::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Replace dates, at any depth, with their RFC 3339 text.
///
/// Dates outside the representable range keep their Extended JSON form.
fn dates_to_rfc3339(value: Bson) -> Bson {
    match value {
        Bson::DateTime(dt) => match dt.try_to_rfc3339_string() {
            Ok(text) => Bson::String(text),
            Err(_) => Bson::DateTime(dt),
        },
        Bson::Document(document) => Bson::Document(
            document
                .into_iter()
                .map(|(key, value)| (key, dates_to_rfc3339(value)))
                .collect(),
        ),
        Bson::Array(items) => Bson::Array(items.into_iter().map(dates_to_rfc3339).collect()),
        other => other,
    }
}

/// Stringify `_id`, render dates as RFC 3339 and convert to relaxed Extended JSON
pub fn normalize_document(mut document: Document) -> Result<PersonRecord> {
    if let Some(id) = document.get("_id") {
        let rendered = render_id(id);
        document.insert("_id", rendered);
    }

    match dates_to_rfc3339(Bson::Document(document)).into_relaxed_extjson() {
        Value::Object(map) => Ok(map),
        other => Err(AppError::Serialization(format!(
            "expected a JSON object, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::{doc, oid::ObjectId, DateTime};

    #[test]
    fn test_object_id_rendered_as_hex() {
        let oid = ObjectId::parse_str("65a1f0c2e4b0a1b2c3d4e5f6").unwrap();
        let record = normalize_document(doc! { "_id": oid, "first_name": "Ada" }).unwrap();

        assert_eq!(record["_id"], Value::String("65a1f0c2e4b0a1b2c3d4e5f6".to_string()));
        assert_eq!(record["first_name"], "Ada");
    }

    #[test]
    fn test_non_object_ids() {
        assert_eq!(render_id(&Bson::String("p-1".to_string())), "p-1");
        assert_eq!(render_id(&Bson::Int32(7)), "7");
    }

    #[test]
    fn test_missing_id_stays_missing() {
        let record = normalize_document(doc! { "first_name": "Ada" }).unwrap();
        assert!(!record.contains_key("_id"));
    }

    #[test]
    fn test_score_stays_numeric() {
        let record = normalize_document(doc! {
            "_id": ObjectId::new(),
            "first_name": "Ada",
            "score": 1.25_f64,
        })
        .unwrap();

        assert_eq!(record["score"].as_f64(), Some(1.25));
        assert!(record["_id"].is_string());
    }

    #[test]
    fn test_dates_rendered_as_rfc3339() {
        let record = normalize_document(doc! {
            "first_name": "Ada",
            "born": DateTime::from_millis(0),
            "history": [{ "moved": DateTime::from_millis(0) }],
        })
        .unwrap();

        assert_eq!(record["born"], "1970-01-01T00:00:00Z");
        assert_eq!(record["history"][0]["moved"], "1970-01-01T00:00:00Z");
    }

    #[test]
    fn test_out_of_range_date_keeps_extended_json() {
        let record = normalize_document(doc! { "born": DateTime::MAX }).unwrap();
        assert!(record["born"].get("$date").is_some());
    }
}
