//! notekeep - musical phrase tracker service
//!
//! Serves the phrase tracker page and JSON API on a single port. Phrases
//! are stored per user in SQLite; sheet images are transcribed by an
//! external multimodal inference service.

use anyhow::Result;
use std::sync::Arc;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use notekeep::config::Settings;
use notekeep::services::TranscriptionClient;
use notekeep::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting notekeep");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let settings = Settings::resolve().map_err(|e| anyhow::anyhow!("{}", e))?;
    info!("Database: {}", settings.db_path.display());

    let db_pool = notekeep::db::init_database_pool(&settings.db_path).await?;
    info!("Database connection established");

    let transcriber = TranscriptionClient::with_endpoint(
        settings.openai_api_key.clone(),
        settings.openai_base_url.clone(),
        settings.openai_model.clone(),
    )
    .map_err(|e| anyhow::anyhow!("Failed to create transcription client: {}", e))?;

    let state = AppState::new(db_pool, Arc::new(transcriber));

    let app = notekeep::build_router(state);

    let listener =
        tokio::net::TcpListener::bind(("127.0.0.1", settings.port)).await?;
    info!("Listening on http://127.0.0.1:{}", settings.port);
    info!("Health check: http://127.0.0.1:{}/health", settings.port);

    axum::serve(listener, app).await?;

    Ok(())
}
