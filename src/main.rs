//! Nutrition Tracker (nutrack)
//!
//! An MCP server for daily food, weight and step logging.

use rmcp::ServiceExt;
use tokio::io::{stdin, stdout};
use tracing_subscriber::EnvFilter;

use nutrack::build_info;
use nutrack::config::Config;
use nutrack::db::{self, Database};
use nutrack::mcp::NutrackService;
use nutrack::store::SqliteStore;
use nutrack::tools::today;
use nutrack::tracker::Tracker;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging (output to stderr to not interfere with MCP stdio)
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("nutrack=info".parse()?))
        .with_writer(std::io::stderr)
        .init();

    // Print startup banner to stderr
    build_info::print_startup_banner();
    eprintln!("Starting MCP server on stdio...");

    let config = Config::from_env();
    let db_path = config.database_path.clone();
    eprintln!("Database path: {}", db_path.display());

    // Ensure data directory exists
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    // Initialize database
    eprintln!("Initializing database...");
    let database = Database::new(&db_path)?;
    let store = SqliteStore::new(database)?;

    let version = store.database().with_conn(db::migrations::get_schema_version)?;
    eprintln!("Database schema version: {}", version);

    if config.api_key.is_none() {
        eprintln!("GROQ_API_KEY not set; nutrition lookups need an api_key argument");
    }

    // Load tracker state for today
    let tracker = Tracker::open(store, today())?;

    // Create the nutrack service
    let service = NutrackService::new(config, tracker);

    // Create stdio transport
    let transport = (stdin(), stdout());

    // Start the MCP server
    let server = service.serve(transport).await?;

    // Wait for the server to complete
    server.waiting().await?;

    Ok(())
}
