//! Application wiring
//!
//! Builds the store, Slack clients, handlers, and session from configuration.

use crate::dispatch::EventDispatcher;
use crate::handlers::{CommandRouter, MessageHandler};
use crate::session::{SessionConfig, SessionManager};
use crate::slack::SlackApi;
use afk_cache::{KeyValueBackend, MemoryBackend, PresenceStore, RedisPool};
use afk_common::{AppConfig, AppError, AppResult, StoreBackendKind, StoreConfig};
use afk_core::{Clock, ConnectionOpener, MessagingGateway, SystemClock};
use std::sync::Arc;

/// Create the key-value backend selected by configuration
pub async fn create_backend(config: &StoreConfig) -> AppResult<Arc<dyn KeyValueBackend>> {
    match config.backend {
        StoreBackendKind::Redis => {
            tracing::info!("Connecting to Redis...");
            let pool =
                RedisPool::from_config(&config.redis).map_err(|e| AppError::Cache(e.to_string()))?;
            match pool.health_check().await {
                Ok(()) => tracing::info!("Redis connection established"),
                Err(e) => tracing::warn!(error = %e, "Redis not reachable yet"),
            }
            Ok(Arc::new(pool))
        }
        StoreBackendKind::Memory => {
            tracing::warn!("Using in-memory store; presence state is lost on restart");
            Ok(Arc::new(MemoryBackend::new()))
        }
    }
}

/// Wire every component into a session that has not been started yet
pub async fn build_session(config: &AppConfig) -> AppResult<Arc<SessionManager>> {
    let backend = create_backend(&config.store).await?;
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store = PresenceStore::new(backend, clock.clone());

    let messaging: Arc<dyn MessagingGateway> = Arc::new(SlackApi::new(
        config.slack.api_base.clone(),
        config.slack.bot_token.clone(),
    ));
    let opener: Arc<dyn ConnectionOpener> = Arc::new(SlackApi::new(
        config.slack.api_base.clone(),
        config.slack.app_token.clone(),
    ));

    let commands = CommandRouter::new(store.clone(), messaging.clone(), clock)
        .with_finish_message(config.app.finish_message.clone());
    let dispatcher = EventDispatcher::new(MessageHandler::new(store, messaging), commands);

    Ok(SessionManager::new(
        opener,
        Arc::new(dispatcher),
        SessionConfig::from(&config.session),
    ))
}

/// Run the bot until Ctrl+C
pub async fn run(config: AppConfig) -> AppResult<()> {
    let session = build_session(&config).await?;
    session.start();
    tracing::info!(app = %config.app.name, "Bot is running. Press Ctrl+C to stop.");

    let signal = tokio::signal::ctrl_c().await;
    tracing::info!("Shutting down...");
    session.stop().await;

    signal.map_err(AppError::internal)
}
