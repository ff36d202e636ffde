use crate::config::DatabaseConfig;
use crate::error::Result;
use crate::store::{InMemoryStore, MongoStore, PersonStore};
use mongodb::bson::Document;
use std::sync::Arc;

/// Create the MongoDB backed store from configuration
pub async fn create_store(config: &DatabaseConfig) -> Result<Arc<dyn PersonStore>> {
    config.validate()?;

    tracing::info!(
        database = %config.name,
        collection = %config.collection,
        search_index = %config.search_index,
        autocomplete_index = %config.autocomplete_index,
        "Initializing MongoDB store"
    );

    let store = MongoStore::connect(config).await?;
    Ok(Arc::new(store))
}

/// Create an in-memory store seeded with documents (for testing and development)
pub fn create_in_memory_store(documents: Vec<Document>) -> Arc<dyn PersonStore> {
    tracing::info!(documents = documents.len(), "Initializing in-memory store");
    Arc::new(InMemoryStore::with_documents(documents))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_store_requires_connection_string() {
        let config = DatabaseConfig::default();
        let result = create_store(&config).await;
        assert!(matches!(
            result,
            Err(crate::error::AppError::Configuration(_))
        ));
    }

    #[tokio::test]
    async fn test_create_store_rejects_invalid_uri() {
        let config = DatabaseConfig {
            connection_string: Some("not-a-mongodb-uri".to_string()),
            ..Default::default()
        };
        assert!(create_store(&config).await.is_err());
    }

    #[tokio::test]
    async fn test_create_in_memory_store() {
        let store = create_in_memory_store(Vec::new());
        assert!(store.ping().await.is_ok());
    }
}
