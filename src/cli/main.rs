use clap::{Parser, Subcommand};
use reqwest::Client;
use std::error::Error;

#[derive(Parser)]
#[command(name = "person-search-cli")]
#[command(about = "Person search gateway CLI", long_about = None)]
struct Cli {
    #[arg(short, long, env = "PERSON_SEARCH_ENDPOINT", default_value = "http://localhost:8000")]
    endpoint: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Look up one person by exact first name
    Person {
        #[arg(value_name = "FIRST_NAME")]
        first_name: String,
    },

    /// Relevance search on first and middle name
    Search {
        #[arg(value_name = "QUERY")]
        query: String,
    },

    /// First-name suggestions for a prefix
    Autocomplete {
        #[arg(value_name = "PREFIX")]
        query: String,
    },

    /// Check server health
    Health,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    let client = Client::new();

    let request = match &cli.command {
        Commands::Person { first_name } => client
            .get(format!("{}/person", cli.endpoint))
            .query(&[("first_name", first_name)]),
        Commands::Search { query } => client
            .get(format!("{}/search/person", cli.endpoint))
            .query(&[("query", query)]),
        Commands::Autocomplete { query } => client
            .get(format!("{}/autocomplete/person", cli.endpoint))
            .query(&[("query", query)]),
        Commands::Health => client.get(format!("{}/health", cli.endpoint)),
    };

    let response = request.send().await?;
    let status = response.status();
    let body: serde_json::Value = response.json().await?;
    println!("{}", serde_json::to_string_pretty(&body)?);

    if !status.is_success() {
        eprintln!("request failed with status {}", status);
        std::process::exit(1);
    }

    Ok(())
}
