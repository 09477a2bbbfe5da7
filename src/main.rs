//! Assistant chat web server
//!
//! Entry point for the browser chat front-end.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::sync::Arc;

use assistant_chat_web::{config::AppConfig, server, telemetry};
use dotenvy::dotenv;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present)
    let _ = dotenv();

    // Initialize tracing (M-LOG-STRUCTURED)
    telemetry::init();

    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {e}");
            std::process::exit(1);
        }
    };

    info!(
        name: "config.loaded",
        backend = %config.backend.base_url,
        address = %config.bind_address(),
        "Configuration loaded"
    );

    server::start_server(Arc::new(config)).await
}
