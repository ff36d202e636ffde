//! HTTP gateway over MongoDB Atlas Search for person records.
//!
//! Three read-only endpoints are exposed:
//!
//! - `GET /person?first_name=..` exact lookup of one record
//! - `GET /search/person?query=..` relevance-ranked search on first and middle name
//! - `GET /autocomplete/person?query=..` distinct first-name suggestions for a prefix
//!
//! Ranking, tokenization and indexing are delegated to the database; the
//! gateway builds the aggregation requests and reshapes the results.

pub mod api;
pub mod config;
pub mod error;
pub mod gateway;
pub mod metrics;
pub mod shutdown;
pub mod store;

pub use error::{AppError, Result};
