use std::sync::Arc;

use teloxide::prelude::*;
use thiserror::Error;
use tokio::sync::watch;

use board_ai::agents::{AgentRegistry, Orchestrator, OrchestratorConfig};
use board_ai::api::{self, AppState};
use board_ai::bot::handler::DEFAULT_SHUTDOWN_GRACE;
use board_ai::bot::{BoundedLastResultStore, HandlerConfig, RequestHandler, StateManager};
use board_ai::config::{Config, ConfigError};
use board_ai::domain::repositories::RepositoryError;
use board_ai::infrastructure::llm::HttpLlmClient;
use board_ai::infrastructure::repositories::PostgresAnalysisRepository;
use board_ai::infrastructure::telegram::{dispatcher, TelegramTransport};

#[derive(Debug, Error)]
enum StartupError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] RepositoryError),

    #[error("Failed to bind HTTP address: {0}")]
    Bind(#[from] std::io::Error),

    #[error("Telegram authorization failed: {0}")]
    Telegram(#[from] teloxide::RequestError),
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    // Load environment variables
    dotenv::dotenv().ok();

    if let Err(e) = run().await {
        tracing::error!(error = %e, "Startup failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), StartupError> {
    let config = Config::from_env()?;

    tracing::info!("Connecting to database...");
    let repository = PostgresAnalysisRepository::connect(&config.database_url).await?;
    repository.migrate().await?;
    tracing::info!("Database connected successfully");
    let repository = Arc::new(repository);

    let llm = Arc::new(HttpLlmClient::new(
        config.llm_base_url.clone(),
        config.llm_api_token.clone(),
    ));
    let registry = AgentRegistry::from_config(llm, &config.models);
    let orchestrator = Orchestrator::new(
        registry,
        OrchestratorConfig {
            mode: config.execution_mode,
            ..OrchestratorConfig::default()
        },
    );
    tracing::info!(
        llm = %config.llm_base_url,
        mode = ?config.execution_mode,
        "Board assembled"
    );

    let bot = Bot::new(config.telegram_bot_token.clone());
    let me = bot.get_me().await?;
    tracing::info!(
        username = me.user.username.as_deref().unwrap_or_default(),
        "Authorized on Telegram"
    );

    let handler = RequestHandler::new(
        Arc::new(TelegramTransport::new(bot.clone())),
        repository.clone(),
        Arc::new(orchestrator),
        Arc::new(StateManager::new()),
        Arc::new(BoundedLastResultStore::new(config.last_result_capacity)),
        HandlerConfig::default(),
    );

    // Start HTTP server
    let app = api::router(AppState::new(repository));
    let listener = tokio::net::TcpListener::bind(config.http_addr).await?;
    tracing::info!("Server listening on {}", config.http_addr);

    let (stop_tx, mut stop_rx) = watch::channel(false);
    let server = tokio::spawn(async move {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = stop_rx.changed().await;
            })
            .await
    });

    dispatcher::run(bot, handler.clone(), shutdown_signal()).await;

    tracing::info!("Shutting down");
    let _ = stop_tx.send(true);
    handler.shutdown(DEFAULT_SHUTDOWN_GRACE).await;

    match server.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => tracing::error!(error = %e, "Server failed"),
        Err(e) => tracing::error!(error = %e, "Server task panicked"),
    }

    tracing::info!("Stopped");
    Ok(())
}

/// Resolves on SIGINT or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
