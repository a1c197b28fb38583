use clap::{Parser, Subcommand};

/// The main entry point for the Fibonacci API service.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file, if one exists.
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Execute the appropriate command
    match cli.command {
        Commands::Serve(args) => handle_serve(args).await,
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// A small HTTP service computing Fibonacci numbers, with request analytics
/// recorded in PostgreSQL.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server.
    Serve(ServeArgs),
}

#[derive(Parser)]
struct ServeArgs {
    /// Override the configured bind address (e.g. "127.0.0.1").
    #[arg(long)]
    host: Option<String>,

    /// Override the configured listen port.
    #[arg(long)]
    port: Option<u16>,
}

// ==============================================================================
// Serve Command Logic
// ==============================================================================

/// Loads the configuration, applies CLI overrides, and runs the server.
async fn handle_serve(args: ServeArgs) -> anyhow::Result<()> {
    let mut settings = configuration::load_config()?;
    if let Some(host) = args.host {
        settings.server.host = host;
    }
    if let Some(port) = args.port {
        settings.server.port = port;
    }

    let addr = settings.server.socket_addr()?;
    web_server::run_server(addr, settings).await
}
