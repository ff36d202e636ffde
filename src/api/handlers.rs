use crate::api::AppState;
use crate::error::{AppError, Result};
use crate::gateway::{NameSuggestion, PersonRecord};
use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

/// Health check endpoint
pub async fn health_check(State(state): State<AppState>) -> Result<Json<HealthResponse>> {
    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
    }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
}

/// Readiness: the database answers a ping
pub async fn readiness_check(State(state): State<AppState>) -> Result<Json<ReadinessResponse>> {
    if let Err(e) = state.service.ping().await {
        tracing::error!(error = %e, "Readiness check failed");
        return Err(e);
    }

    Ok(Json(ReadinessResponse {
        status: "ready".to_string(),
    }))
}

#[derive(Debug, Serialize)]
pub struct ReadinessResponse {
    pub status: String,
}

/// Prometheus text exposition
pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        crate::metrics::gather_metrics(),
    )
}

#[derive(Debug, Deserialize)]
pub struct PersonQuery {
    pub first_name: String,
}

#[derive(Debug, Deserialize)]
pub struct TextQuery {
    pub query: String,
}

/// Exact lookup by first name
pub async fn get_person(
    State(state): State<AppState>,
    params: std::result::Result<Query<PersonQuery>, QueryRejection>,
) -> Result<Json<PersonRecord>> {
    let Query(params) = params?;

    match state.service.find_person(&params.first_name).await {
        Ok(Some(person)) => Ok(Json(person)),
        Ok(None) => Err(AppError::NotFound("Person not found".to_string())),
        Err(e) => {
            tracing::error!(first_name = %params.first_name, error = %e, "Error in get_person");
            Err(e)
        }
    }
}

/// Relevance-ranked search on first and middle name
pub async fn search_person(
    State(state): State<AppState>,
    params: std::result::Result<Query<TextQuery>, QueryRejection>,
) -> Result<Json<Vec<PersonRecord>>> {
    let Query(params) = params?;
    tracing::info!(query = %params.query, "Search query");

    match state.service.search_persons(&params.query).await {
        Ok(results) if results.is_empty() => {
            Err(AppError::NotFound("No matching persons found".to_string()))
        }
        Ok(results) => Ok(Json(results)),
        Err(e) => {
            tracing::error!(query = %params.query, error = %e, "Error in search_person");
            Err(e)
        }
    }
}

/// Distinct first-name suggestions for a prefix
pub async fn autocomplete_person(
    State(state): State<AppState>,
    params: std::result::Result<Query<TextQuery>, QueryRejection>,
) -> Result<Json<Vec<NameSuggestion>>> {
    let Query(params) = params?;
    tracing::info!(query = %params.query, "Autocomplete query");

    match state.service.autocomplete_names(&params.query).await {
        Ok(names) if names.is_empty() => {
            Err(AppError::NotFound("No matching names found".to_string()))
        }
        Ok(names) => Ok(Json(names)),
        Err(e) => {
            tracing::error!(query = %params.query, error = %e, "Error in autocomplete_person");
            Err(e)
        }
    }
}
