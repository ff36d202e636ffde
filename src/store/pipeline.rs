//! Query documents and aggregation pipelines sent to Atlas Search

use mongodb::bson::{doc, Document};

/// Field holding the relevance score attached to search results
pub const SCORE_FIELD: &str = "score";

/// Relevance search over one or more text fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextSearch {
    pub index: String,
    pub paths: Vec<String>,
    pub query: String,
}

impl TextSearch {
    /// Search across `first_name` and `middle_name`
    pub fn person_names(index: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            paths: vec!["first_name".to_string(), "middle_name".to_string()],
            query: query.into(),
        }
    }
}

/// Prefix search over a single autocomplete-indexed field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Autocomplete {
    pub index: String,
    pub path: String,
    pub query: String,
}

impl Autocomplete {
    /// Suggest distinct values of `first_name`
    pub fn first_name(index: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            index: index.into(),
            path: "first_name".to_string(),
            query: query.into(),
        }
    }
}

/// Equality filter for the single-record lookup
pub fn first_name_filter(first_name: &str) -> Document {
    doc! { "first_name": first_name }
}

/// `$search` with a text operator, then the search score as a computed field.
/// No `$limit` stage: every match is returned.
pub fn text_search_pipeline(search: &TextSearch) -> Vec<Document> {
    let paths = search.paths.clone();

    vec![
        doc! {
            "$search": {
                "index": search.index.as_str(),
                "text": {
                    "path": paths,
                    "query": search.query.as_str(),
                }
            }
        },
        doc! {
            "$addFields": {
                SCORE_FIELD: { "$meta": "searchScore" }
            }
        },
    ]
}

/// `$search` with an autocomplete operator, grouped by the suggested value,
/// projected down to that single field and sorted ascending.
pub fn autocomplete_pipeline(search: &Autocomplete) -> Vec<Document> {
    let path = search.path.as_str();
    let group_key = format!("${path}");

    vec![
        doc! {
            "$search": {
                "index": search.index.as_str(),
                "autocomplete": {
                    "path": path,
                    "query": search.query.as_str(),
                }
            }
        },
        doc! { "$group": { "_id": group_key } },
        doc! { "$project": { "_id": 0, path: "$_id" } },
        doc! { "$sort": { path: 1 } },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_name_filter() {
        assert_eq!(first_name_filter("Ada"), doc! { "first_name": "Ada" });
    }

    #[test]
    fn test_text_search_pipeline_shape() {
        let search = TextSearch::person_names("personNamePhone", "ada");
        let pipeline = text_search_pipeline(&search);

        assert_eq!(pipeline.len(), 2);
        assert_eq!(
            pipeline[0],
            doc! {
                "$search": {
                    "index": "personNamePhone",
                    "text": { "path": ["first_name", "middle_name"], "query": "ada" }
                }
            }
        );
        assert_eq!(
            pipeline[1],
            doc! { "$addFields": { "score": { "$meta": "searchScore" } } }
        );
    }

    #[test]
    fn test_text_search_pipeline_has_no_limit() {
        let pipeline = text_search_pipeline(&TextSearch::person_names("idx", "x"));
        assert!(pipeline.iter().all(|stage| !stage.contains_key("$limit")));
    }

    #[test]
    fn test_autocomplete_pipeline_shape() {
        let search = Autocomplete::first_name("personNamesAutocomplete", "Al");
        let pipeline = autocomplete_pipeline(&search);

        assert_eq!(
            pipeline,
            vec![
                doc! {
                    "$search": {
                        "index": "personNamesAutocomplete",
                        "autocomplete": { "path": "first_name", "query": "Al" }
                    }
                },
                doc! { "$group": { "_id": "$first_name" } },
                doc! { "$project": { "_id": 0, "first_name": "$_id" } },
                doc! { "$sort": { "first_name": 1 } },
            ]
        );
    }
}
