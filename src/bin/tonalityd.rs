//! tonalityd — Tonality daemon.
//!
//! Serves the [`BatchAnalyzer`](tonality::BatchAnalyzer) over HTTP so that
//! every request shares one summarization client and one loaded model.

use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing::info;

use tonality::UploadStore;
use tonality::server::config::{Config, Secrets};
use tonality::server::{AppState, router_with_limit, serve};

/// Tonality daemon — summarize + sentiment analysis service.
#[derive(Parser)]
#[command(name = "tonalityd")]
#[command(version = tonality::PKG_VERSION)]
#[command(about = "Tonality sentiment analysis daemon")]
struct Args {
    /// Path to configuration file.
    #[arg(short, long)]
    config: Option<std::path::PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    // Load configuration
    let config = Config::load(args.config.as_deref())?;
    let secrets = Secrets::load()?;

    // Model loading is synchronous and may download weights.
    let builder = config.builder(&secrets)?;
    let analyzer = tokio::task::spawn_blocking(move || builder.build()).await?;

    let mut state = AppState::new(Arc::new(analyzer));
    if let Some(ref dir) = config.server.upload_dir {
        let store = UploadStore::open(dir).await?;
        info!(dir = %store.root().display(), "persisting uploads");
        state = state.with_store(store);
    }

    let listener = TcpListener::bind(&config.server.address).await.map_err(|e| {
        tonality::TonalityError::Configuration(format!(
            "failed to bind {}: {e}",
            config.server.address
        ))
    })?;

    info!(
        version = tonality::version_string(),
        address = %config.server.address,
        "tonalityd starting"
    );

    let router = router_with_limit(state, config.server.body_limit_bytes());
    serve(listener, router).await?;

    Ok(())
}
