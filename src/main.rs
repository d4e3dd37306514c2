//! `wampsub` server binary.

use std::sync::{Arc, Mutex};

use clap::Parser;
use tracing::{error, info};
use wampsub::broker::Broker;
use wampsub::config::load_config;
use wampsub::transport::start_websocket_server;
use wampsub::utils::logging;

#[derive(Parser)]
#[command(name = "wampsub", about = "Publish/subscribe broker over WebSocket")]
struct Args {
    /// Interface to bind, overriding the configured host
    #[arg(long)]
    host: Option<String>,
    /// Port to bind, overriding the configured port
    #[arg(long)]
    port: Option<u16>,
    /// Log level: error, warn, info, debug or trace
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    dotenvy::dotenv().ok();

    let mut config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            logging::init("info");
            error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(level) = args.log_level {
        config.log.level = level;
    }
    logging::init(&config.log.level);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let broker = Arc::new(Mutex::new(Broker::new()));

    tokio::select! {
        result = start_websocket_server(&addr, broker, config) => {
            if let Err(e) = result {
                error!("Server failed: {e}");
                std::process::exit(1);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Shutdown signal received. Exiting gracefully.");
        }
    }
}
