use crate::config::DatabaseConfig;
use crate::error::Result;
use crate::gateway::models::{normalize_document, NameSuggestion, PersonRecord};
use crate::metrics::{record_query, QueryOutcome};
use crate::store::{Autocomplete, PersonStore, TextSearch};
use std::sync::Arc;
use std::time::Instant;

/// Executes the three read operations against a [`PersonStore`]
pub struct PersonSearchService {
    store: Arc<dyn PersonStore>,
    search_index: String,
    autocomplete_index: String,
}

impl PersonSearchService {
    pub fn new(store: Arc<dyn PersonStore>, config: &DatabaseConfig) -> Self {
        Self::with_indexes(
            store,
            config.search_index.clone(),
            config.autocomplete_index.clone(),
        )
    }

    pub fn with_indexes(
        store: Arc<dyn PersonStore>,
        search_index: impl Into<String>,
        autocomplete_index: impl Into<String>,
    ) -> Self {
        Self {
            store,
            search_index: search_index.into(),
            autocomplete_index: autocomplete_index.into(),
        }
    }

    /// First person whose `first_name` equals the argument
    pub async fn find_person(&self, first_name: &str) -> Result<Option<PersonRecord>> {
        let start = Instant::now();
        let result = self.store.find_by_first_name(first_name).await;
        observe("lookup", start, &result, |doc| doc.is_some());

        result?.map(normalize_document).transpose()
    }

    /// Every person matching `query` on first or middle name, each with a `score`
    pub async fn search_persons(&self, query: &str) -> Result<Vec<PersonRecord>> {
        let search = TextSearch::person_names(&self.search_index, query);

        let start = Instant::now();
        let result = self.store.search(&search).await;
        observe("search", start, &result, |docs| !docs.is_empty());

        result?.into_iter().map(normalize_document).collect()
    }

    /// Distinct first names completing `query`, ascending
    pub async fn autocomplete_names(&self, query: &str) -> Result<Vec<NameSuggestion>> {
        let search = Autocomplete::first_name(&self.autocomplete_index, query);

        let start = Instant::now();
        let result = self.store.autocomplete(&search).await;
        observe("autocomplete", start, &result, |docs| !docs.is_empty());

        let suggestions = result?
            .into_iter()
            .map(mongodb::bson::from_document::<NameSuggestion>)
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(suggestions)
    }

    pub async fn ping(&self) -> Result<()> {
        self.store.ping().await
    }

    pub async fn close(&self) {
        self.store.close().await
    }
}

fn observe<T>(operation: &str, start: Instant, result: &Result<T>, found: impl Fn(&T) -> bool) {
    let outcome = match result {
        Ok(value) if found(value) => QueryOutcome::Found,
        Ok(_) => QueryOutcome::Empty,
        Err(_) => QueryOutcome::Error,
    };
    record_query(operation, outcome, start.elapsed());
}
