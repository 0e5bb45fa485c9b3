use eyre::Context;
use jiff::Timestamp;
use std::io::IsTerminal;
use tokio::sync::watch;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use yt_live_status::{Config, Refresher, ResolvedState, StateStore, YouTubeClient, server};

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .from_env_lossy(),
        )
        .with_ansi(std::io::stdout().is_terminal())
        .init();

    let config = Config::load();
    let cors = config.cors()?;

    let yt = YouTubeClient::new(config.api_key.clone(), config.request_timeout())
        .context("set up YouTube API client")?
        .with_base_url(&config.api_base_url)
        .with_origin(config.api_origin.clone())
        .with_max_results(config.max_results);

    // The first cycle completes before the listener opens. If it fails, "none" is served.
    let store = StateStore::new(ResolvedState::none(Timestamp::now()));
    let refresher = Refresher::new(yt.clone(), yt, config.channel_id.clone(), store.clone());
    refresher.refresh_once().await;

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let refresh_task = refresher.spawn(config.refresh_interval(), shutdown_rx.clone());

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("bind to {}", config.listen_addr))?;

    tokio::spawn(async move {
        shutdown_signal().await;
        tracing::info!("shutdown requested");
        let _ = shutdown_tx.send(true);
    });

    server::serve(listener, store, cors, shutdown_rx)
        .await
        .context("run query server")?;
    refresh_task.await.context("join refresh task")?;

    Ok(())
}

/// Resolves on Ctrl-C, or on SIGTERM where that exists.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
