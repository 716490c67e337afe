mod config;
mod routes;

use flashcards::{MemoryStore, WordService};
use flashcards_translate::GoogleTranslateProvider;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use routes::{AppState, router};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    // Initialize the translation gateway
    let translator = GoogleTranslateProvider::with_timeout(
        &config.translate_url,
        &config.source_lang,
        &config.target_lang,
        config.translate_timeout,
    )
    .map_err(|e| format!("Failed to initialize translator: {}", e))?;

    let service = WordService::new(Arc::new(MemoryStore::new()), Arc::new(translator))
        .with_duplicate_cache_policy(config.duplicate_cache_policy);

    info!(
        "📚 Starting flashcards server ({} → {})",
        config.source_lang, config.target_lang
    );

    let app = router(AppState { service });

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("🚀 Server running at http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
