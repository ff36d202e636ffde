pub mod factory;
pub mod memory;
pub mod mongo;
pub mod pipeline;

pub use factory::{create_in_memory_store, create_store};
pub use memory::InMemoryStore;
pub use mongo::MongoStore;
pub use pipeline::{Autocomplete, TextSearch};

use crate::error::Result;
use async_trait::async_trait;
use mongodb::bson::Document;

/// Read-only access to the person collection
///
/// Implementations own their connection (if any) and must be safe to share
/// across concurrent requests.
#[async_trait]
pub trait PersonStore: Send + Sync {
    /// First record whose `first_name` equals the given value
    async fn find_by_first_name(&self, first_name: &str) -> Result<Option<Document>>;

    /// All records matching a relevance search, each carrying a numeric `score`
    async fn search(&self, query: &TextSearch) -> Result<Vec<Document>>;

    /// Distinct `{ first_name }` documents matching a prefix, sorted ascending
    async fn autocomplete(&self, query: &Autocomplete) -> Result<Vec<Document>>;

    /// Round trip to the backing store
    async fn ping(&self) -> Result<()>;

    /// Release the underlying connection
    async fn close(&self);
}
