use crate::config::DatabaseConfig;
use crate::error::{AppError, Result};
use crate::store::pipeline::{
    autocomplete_pipeline, first_name_filter, text_search_pipeline, Autocomplete, TextSearch,
};
use crate::store::PersonStore;
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, Document};
use mongodb::options::{ClientOptions, Tls, TlsOptions};
use mongodb::{Client, Collection, Database};

/// MongoDB Atlas backed person store
///
/// The driver pools connections internally, so one instance serves every
/// request for the lifetime of the process.
#[derive(Clone)]
pub struct MongoStore {
    client: Client,
    database: Database,
    collection: Collection<Document>,
}

impl MongoStore {
    /// Build a client from configuration. The driver connects lazily; call
    /// [`PersonStore::ping`] to verify reachability.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let uri = config.connection_string.as_deref().ok_or_else(|| {
            AppError::Configuration("database connection string is required".to_string())
        })?;

        let mut options = ClientOptions::parse(uri).await?;
        options.app_name = Some(config.app_name.clone());

        if let Some(ca_file) = &config.tls_ca_file {
            let mut tls = TlsOptions::default();
            tls.ca_file_path = Some(ca_file.clone());
            options.tls = Some(Tls::Enabled(tls));
        }

        let client = Client::with_options(options)?;
        let database = client.database(&config.name);
        let collection = database.collection::<Document>(&config.collection);

        tracing::info!(
            database = %config.name,
            collection = %config.collection,
            "MongoDB client created"
        );

        Ok(Self {
            client,
            database,
            collection,
        })
    }

    async fn run_pipeline(&self, pipeline: Vec<Document>) -> Result<Vec<Document>> {
        let cursor = self.collection.aggregate(pipeline).await?;
        let documents: Vec<Document> = cursor.try_collect().await?;
        Ok(documents)
    }
}

#[async_trait]
impl PersonStore for MongoStore {
    async fn find_by_first_name(&self, first_name: &str) -> Result<Option<Document>> {
        Ok(self
            .collection
            .find_one(first_name_filter(first_name))
            .await?)
    }

    async fn search(&self, query: &TextSearch) -> Result<Vec<Document>> {
        self.run_pipeline(text_search_pipeline(query)).await
    }

    async fn autocomplete(&self, query: &Autocomplete) -> Result<Vec<Document>> {
        self.run_pipeline(autocomplete_pipeline(query)).await
    }

    async fn ping(&self) -> Result<()> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn close(&self) {
        self.client.clone().shutdown().await;
        tracing::info!("MongoDB client closed");
    }
}
