use clap::Parser;
use person_search_gateway::{
    api::{build_router, AppState},
    config::Config,
    gateway::PersonSearchService,
    shutdown::shutdown_signal,
    store::create_store,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "person-search-gateway", version, about = "Person search HTTP gateway")]
struct Args {
    /// Configuration file (overrides $CONFIG_PATH)
    #[arg(short, long)]
    config: Option<String>,

    /// Bind host
    #[arg(long)]
    host: Option<String>,

    /// Bind port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real environment variables take precedence
    let env_file = person_search_gateway::config::load_env_file(None);

    let args = Args::parse();

    // Configuration errors are fatal: there is no usable default connection string
    let mut config = match &args.config {
        Some(path) => Config::load_with(path, |key| std::env::var(key).ok())?,
        None => Config::load()?,
    };
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.http_port = port;
    }

    init_tracing(&config);

    tracing::info!("Starting person search gateway v{}", env!("CARGO_PKG_VERSION"));
    if let Some(path) = env_file {
        tracing::info!(path = %path.display(), "Loaded environment file");
    }

    if config.observability.prometheus_enabled {
        if let Err(e) = person_search_gateway::metrics::init_metrics() {
            tracing::warn!("Failed to initialize metrics: {}", e);
            tracing::warn!("Continuing without metrics");
        }
    } else {
        tracing::info!("Prometheus metrics disabled in configuration");
    }

    let store = create_store(&config.database).await?;
    let service = Arc::new(PersonSearchService::new(store, &config.database));

    if let Err(e) = service.ping().await {
        tracing::error!(error = %e, "Database unreachable at startup");
        return Err(e.into());
    }
    tracing::info!("Database connection verified");

    let app = build_router(AppState::new(service.clone()));

    let http_addr = config.server.bind_address();
    let listener = tokio::net::TcpListener::bind(&http_addr).await?;

    tracing::info!("HTTP API server listening on http://{}", http_addr);
    tracing::info!("   Lookup: http://{}/person?first_name=..", http_addr);
    tracing::info!("   Search: http://{}/search/person?query=..", http_addr);
    tracing::info!("   Autocomplete: http://{}/autocomplete/person?query=..", http_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutting down gracefully...");
    service.close().await;
    Ok(())
}

fn init_tracing(config: &Config) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!(
            "person_search_gateway={level},tower_http={level}",
            level = config.observability.log_level
        )
        .into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.observability.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
