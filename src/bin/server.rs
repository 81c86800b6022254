use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use yatzy_advisor::advisor::HttpAdvisoryEngine;
use yatzy_advisor::choice_cache::ChoiceCache;
use yatzy_advisor::env_config;
use yatzy_advisor::score_domains::score_domains;
use yatzy_advisor::server::create_router;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let domains = score_domains();
    info!(bits = domains.total_bits(), "state codec ready");

    let advisor_url = env_config::advisor_url();
    let engine = HttpAdvisoryEngine::new(&advisor_url, env_config::advisor_timeout())
        .context("failed to build advisory engine client")?;
    let capacity = env_config::choice_cache_capacity();
    info!(advisor_url = engine.base_url(), "advisory engine configured");
    let cache = Arc::new(ChoiceCache::new(Arc::new(engine), capacity));
    info!(capacity = cache.capacity(), "choice cache ready");

    let app = create_router(cache);

    let port = env_config::server_port();
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port))
        .await
        .with_context(|| format!("failed to bind port {port}"))?;
    info!(port, "server listening, press Ctrl+C to stop");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server failed")?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install Ctrl+C handler");
        std::future::pending::<()>().await;
    }
}
