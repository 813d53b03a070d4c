use anyhow::Context;
use clap::Parser;
use refvoice_server::{AppState, Args, router, setup};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    setup::configure_tracing();

    let args = Args::parse();
    let config = args.gate_config()?;
    setup::ensure_references_dir(&config.references_dir)?;

    let synthesizer = args.synthesizer();
    match &synthesizer {
        Some(s) => tracing::info!(backend = %s.describe().name, "synthesis backend configured"),
        None => tracing::warn!("no synthesis backend configured; /api/tts and /tts will fail"),
    }

    tracing::info!(
        references_dir = %config.references_dir.display(),
        min_duration = config.min_duration_secs,
        target_peak_dbfs = config.target_peak_dbfs,
        text_policy = ?config.text_policy,
        "configuration resolved"
    );

    let state = AppState::new(config, synthesizer).context("failed to build text filter")?;
    let app = router(state);

    let addr = args.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    tracing::info!("listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
