//! Slack AFK bot entry point
//!
//! Run with:
//! ```bash
//! cargo run -p afk-gateway --bin slack-afk
//! ```
//!
//! Configuration is loaded from environment variables (and `.env`).

use afk_common::{try_init_tracing, try_init_tracing_with_config, AppConfig, AppError, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(code = e.error_code(), error = %e, "Bot failed");
        std::process::exit(e.exit_code());
    }
}

async fn run() -> Result<(), AppError> {
    // Load configuration
    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            if let Err(init) = try_init_tracing() {
                eprintln!("Warning: Failed to initialize tracing: {init}");
            }
            return Err(e.into());
        }
    };

    // Initialize tracing
    if let Err(e) = try_init_tracing_with_config(TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        env = ?config.app.env,
        store = ?config.store.backend,
        "Configuration loaded"
    );

    afk_gateway::run(config).await
}
