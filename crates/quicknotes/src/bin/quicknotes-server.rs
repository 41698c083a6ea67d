//! Run the quicknotes API server.
//!
//! Usage: `cargo run --bin quicknotes-server`

use quicknotes::{AppConfig, Server};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() {
    // Load .env file
    let _ = dotenvy::dotenv();

    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("quicknotes=info,tower_http=info")),
        )
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {}", e);
            std::process::exit(1);
        }
    };

    let mut server = match Server::from_config(&config).await {
        Ok(server) => server,
        Err(e) => {
            eprintln!("Failed to start server: {}", e);
            std::process::exit(1);
        }
    };

    println!("Server listening on http://{}", server.addr());
    println!("\nAvailable endpoints:");
    println!("  GET    /health            - Health check");
    println!("  POST   /api/summarize     - Summarize note content");
    println!("  GET    /auth/callback     - Exchange a sign-in code");
    println!("  POST   /auth/logout       - Sign out");
    println!("  GET    /api/notes         - List notes");
    println!("  POST   /api/notes         - Create a note");
    println!("  PUT    /api/notes/:id     - Update a note");
    println!("  DELETE /api/notes/:id     - Delete a note");
    println!("\nPress Ctrl+C to stop");

    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for ctrl-c");
    }
    println!("\nShutting down...");
    if let Err(e) = server.shutdown() {
        eprintln!("{}", e);
    }
}
