//! Shared fixtures for router-level tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use mongodb::bson::{doc, oid::ObjectId, Document};
use person_search_gateway::{
    api::{build_router, AppState},
    error::{AppError, Result},
    gateway::PersonSearchService,
    store::{Autocomplete, InMemoryStore, PersonStore, TextSearch},
};
use std::sync::Arc;
use tower::ServiceExt;

pub fn person(first: &str, middle: &str) -> Document {
    doc! {
        "_id": ObjectId::new(),
        "first_name": first,
        "middle_name": middle,
        "phone": "555-0100",
    }
}

/// Seven records; "Maria" appears as a first name twice and as a middle name once
pub fn people() -> Vec<Document> {
    vec![
        person("Maria", "Elena"),
        person("Mario", "Luigi"),
        person("Marta", "Maria"),
        person("Maria", "Jose"),
        person("Martin", "Luther"),
        person("John", "Paul"),
        person("Johanna", "Maria"),
    ]
}

pub fn router_with(store: Arc<dyn PersonStore>) -> Router {
    let service = PersonSearchService::with_indexes(
        store,
        "personNamePhone",
        "personNamesAutocomplete",
    );
    build_router(AppState::new(Arc::new(service)))
}

pub fn router() -> Router {
    router_with(Arc::new(InMemoryStore::with_documents(people())))
}

pub async fn get(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap_or(serde_json::Value::Null)
    };
    (status, json)
}

/// Store whose every query fails with the configured error
pub struct FailingStore {
    pub make_error: fn() -> AppError,
}

impl FailingStore {
    pub fn connectivity() -> Self {
        Self {
            make_error: || AppError::Connectivity("connection refused".to_string()),
        }
    }

    pub fn bad_index() -> Self {
        Self {
            make_error: || {
                AppError::MalformedQuery("Search index personNamePhone not found".to_string())
            },
        }
    }
}

#[async_trait]
impl PersonStore for FailingStore {
    async fn find_by_first_name(&self, _first_name: &str) -> Result<Option<Document>> {
        Err((self.make_error)())
    }

    async fn search(&self, _query: &TextSearch) -> Result<Vec<Document>> {
        Err((self.make_error)())
    }

    async fn autocomplete(&self, _query: &Autocomplete) -> Result<Vec<Document>> {
        Err((self.make_error)())
    }

    async fn ping(&self) -> Result<()> {
        Err((self.make_error)())
    }

    async fn close(&self) {}
}
