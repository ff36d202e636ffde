use crate::error::Result;
use crate::store::pipeline::{Autocomplete, TextSearch, SCORE_FIELD};
use crate::store::PersonStore;
use async_trait::async_trait;
use mongodb::bson::{doc, Bson, Document};
use std::collections::BTreeSet;
use std::sync::Arc;
use tokio::sync::RwLock;

/// In-memory person store (for local development and testing)
///
/// Approximates Atlas Search: text search matches whole lowercase tokens and
/// scores by the number of query tokens found; autocomplete matches token
/// prefixes.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    documents: Arc<RwLock<Vec<Document>>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_documents(documents: Vec<Document>) -> Self {
        Self {
            documents: Arc::new(RwLock::new(documents)),
        }
    }

    pub async fn insert(&self, document: Document) {
        self.documents.write().await.push(document);
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

fn tokenize(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

fn field_tokens(document: &Document, path: &str) -> Vec<String> {
    match document.get(path) {
        Some(Bson::String(value)) => tokenize(value),
        _ => Vec::new(),
    }
}

#[async_trait]
impl PersonStore for InMemoryStore {
    async fn find_by_first_name(&self, first_name: &str) -> Result<Option<Document>> {
        let documents = self.documents.read().await;
        Ok(documents
            .iter()
            .find(|doc| doc.get_str("first_name").ok() == Some(first_name))
            .cloned())
    }

    async fn search(&self, query: &TextSearch) -> Result<Vec<Document>> {
        let terms = tokenize(&query.query);
        if terms.is_empty() {
            return Ok(Vec::new());
        }

        let documents = self.documents.read().await;
        let mut hits: Vec<(f64, Document)> = documents
            .iter()
            .filter_map(|doc| {
                let tokens: Vec<String> = query
                    .paths
                    .iter()
                    .flat_map(|path| field_tokens(doc, path))
                    .collect();
                let matched = terms.iter().filter(|t| tokens.contains(t)).count();
                (matched > 0).then(|| (matched as f64, doc.clone()))
            })
            .collect();

        // Highest score first; ties keep insertion order
        hits.sort_by(|a, b| b.0.total_cmp(&a.0));

        Ok(hits
            .into_iter()
            .map(|(score, mut doc)| {
                doc.insert(SCORE_FIELD, score);
                doc
            })
            .collect())
    }

    async fn autocomplete(&self, query: &Autocomplete) -> Result<Vec<Document>> {
        let prefix = query.query.trim().to_lowercase();
        if prefix.is_empty() {
            return Ok(Vec::new());
        }

        let documents = self.documents.read().await;
        let names: BTreeSet<String> = documents
            .iter()
            .filter_map(|doc| {
                let value = doc.get_str(&query.path).ok()?;
                let lowered = value.to_lowercase();
                let matches = lowered.starts_with(&prefix)
                    || tokenize(value).iter().any(|t| t.starts_with(&prefix));
                matches.then(|| value.to_string())
            })
            .collect();

        Ok(names
            .into_iter()
            .map(|name| doc! { query.path.as_str(): name })
            .collect())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn close(&self) {
        tracing::debug!("In-memory store closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::oid::ObjectId;

    fn person(first: &str, middle: &str) -> Document {
        doc! { "_id": ObjectId::new(), "first_name": first, "middle_name": middle }
    }

    fn store() -> InMemoryStore {
        InMemoryStore::with_documents(vec![
            person("Alice", "Marie"),
            person("Albert", "Alice"),
            person("Bob", "Lee"),
            person("Alice", "Jane"),
        ])
    }

    #[tokio::test]
    async fn test_lookup_returns_first_match() {
        let store = store();
        let found = store.find_by_first_name("Alice").await.unwrap().unwrap();
        assert_eq!(found.get_str("middle_name").unwrap(), "Marie");
    }

    #[tokio::test]
    async fn test_lookup_is_exact() {
        let store = store();
        assert!(store.find_by_first_name("alice").await.unwrap().is_none());
        assert!(store.find_by_first_name("Ali").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_search_matches_first_and_middle_names() {
        let store = store();
        let hits = store
            .search(&TextSearch::person_names("idx", "alice"))
            .await
            .unwrap();

        assert_eq!(hits.len(), 3);
        assert!(hits.iter().all(|doc| doc.get_f64(SCORE_FIELD).is_ok()));
    }

    #[tokio::test]
    async fn test_search_orders_by_score() {
        let store = store();
        let hits = store
            .search(&TextSearch::person_names("idx", "alice jane"))
            .await
            .unwrap();

        assert_eq!(hits[0].get_str("middle_name").unwrap(), "Jane");
        assert_eq!(hits[0].get_f64(SCORE_FIELD).unwrap(), 2.0);
    }

    #[tokio::test]
    async fn test_search_blank_query_matches_nothing() {
        let store = store();
        let hits = store
            .search(&TextSearch::person_names("idx", "   "))
            .await
            .unwrap();
        assert!(hits.is_empty());
    }

    #[tokio::test]
    async fn test_autocomplete_distinct_and_sorted() {
        let store = store();
        let names = store
            .autocomplete(&Autocomplete::first_name("idx", "al"))
            .await
            .unwrap();

        assert_eq!(
            names,
            vec![doc! { "first_name": "Albert" }, doc! { "first_name": "Alice" }]
        );
    }

    #[tokio::test]
    async fn test_insert() {
        let store = InMemoryStore::new();
        assert!(store.is_empty().await);
        store.insert(person("Zoe", "Ann")).await;
        assert_eq!(store.len().await, 1);
    }
}
