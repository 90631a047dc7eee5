use animoa::config::AppConfig;
use animoa::database::Database;
use animoa::Result;
use clap::Parser;
use clap::Subcommand;
use tracing::info;

#[derive(Parser)]
#[command(name = "animoa")]
#[command(about = "Animoa mental-wellness companion API server")]
#[command(version)]
struct Cli {
    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Override the configured bind host
        #[arg(long)]
        host: Option<String>,
        /// Override the configured bind port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Initialize the database schema
    Init,
    /// Show current configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    if cli.verbose {
        animoa::logging::init_logging_with_level("debug")?;
    } else {
        animoa::logging::init_logging()?;
    }

    // Load configuration
    let mut config = AppConfig::load()?;
    info!("Configuration loaded successfully");

    match cli.command {
        Commands::Serve { host, port } => {
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }

            let db = Database::from_config(&config).await?;
            if !db.is_schema_initialized().await? {
                info!("Database schema missing, initializing");
                db.init_schema().await?;
            }

            animoa::api::server::serve_api(&config).await?;
        }
        Commands::Init => {
            let db = Database::from_config(&config).await?;
            db.init_schema().await?;
            println!("Database schema initialized");
        }
        Commands::Config => {
            handle_config_command(&config);
        }
    }

    Ok(())
}

fn handle_config_command(config: &AppConfig) {
    println!("Animoa Configuration:");
    println!();

    println!("Database:");
    println!("  URL: {}", mask_database_url(config.database_url()));
    println!("  Max connections: {}", config.max_connections());
    println!("  Min connections: {}", config.min_connections());
    println!("  Connection timeout: {}s", config.connection_timeout());
    println!();

    println!("Logging:");
    println!("  Level: {}", config.logging.level);
    println!();

    println!("Server:");
    println!("  Bind: {}:{}", config.server_host(), config.server_port());
    println!("  CORS: {}", config.cors_enabled());
    println!();

    println!("Completion API:");
    println!("  Endpoint: {}", config.llm_endpoint());
    println!("  Model: {}", config.llm_model());
    println!("  API key configured: {}", config.llm_api_key().is_some());
    println!();

    println!("Embeddings:");
    println!("  Provider: {}", config.embedding_provider());
    println!("  Model: {}", config.embedding_model());
    println!("  Dimension: {}", config.embedding_dimension());
    println!(
        "  API key configured: {}",
        config.embedding_api_key().is_some()
    );
    println!();

    println!("RAG:");
    println!("  Match count: {}", config.rag_match_count());
    println!(
        "  Similarity threshold: {}",
        config.rag_similarity_threshold()
    );
    println!(
        "  Chat similarity threshold: {}",
        config.rag_chat_similarity_threshold()
    );
}

/// Mask database URL for logging (hide password)
fn mask_database_url(url: &str) -> String {
    if let Ok(parsed) = url::Url::parse(url) {
        if let Some(host) = parsed.host_str() {
            format!(
                "{}://{}@{}:{}",
                parsed.scheme(),
                parsed.username(),
                host,
                parsed.port().unwrap_or(5432)
            )
        } else {
            "***masked***".to_string()
        }
    } else {
        "***invalid***".to_string()
    }
}
