use clap::Parser;
use log::info;
use select2_bridge::registry::load_registry;
use select2_bridge::{ChoiceHttpServer, Select2Config};
use std::path::PathBuf;
use std::sync::Arc;

/// Command line options for the choice HTTP server binary.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Port for the HTTP server
    #[arg(long, default_value_t = 9001)]
    port: u16,

    /// Path to a TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Path to a JSON registry fixture file
    #[arg(long)]
    fixtures: PathBuf,
}

/// Main entry point for the choice HTTP server.
///
/// Loads configuration and the entity registry fixture, then serves
/// `GET /{namespace}/{entity}/{field}/` until shut down.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    select2_bridge::logging::init().ok();
    info!("Starting choice HTTP server...");

    let Cli {
        port,
        config,
        fixtures,
    } = Cli::parse();

    let config = match config {
        Some(path) => Select2Config::from_file(&path)?,
        None => Select2Config::default(),
    };
    info!("Config loaded successfully");

    let registry = Arc::new(load_registry(&fixtures)?);
    info!("Registry loaded with {} entity types", registry.len());

    let bind_address = format!("127.0.0.1:{}", port);
    let server = ChoiceHttpServer::new(registry, config, &bind_address);
    server.run().await?;
    Ok(())
}
