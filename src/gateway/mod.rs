//! Person lookup, relevance search and autocomplete over the person collection.
//!
//! [`PersonSearchService`] turns request parameters into store queries and
//! reshapes the returned BSON documents for JSON transport. It never maps
//! absence to an error; empty results are returned as `None` or an empty
//! `Vec` and translated to 404 by the HTTP layer.

mod models;
mod service;

pub use models::{normalize_document, render_id, NameSuggestion, PersonRecord};
pub use service::PersonSearchService;
