use crate::app_config::AppConfig;
use crate::metrics_api::serve_exposition;
use anyhow::Context;
use kafka_exporter::refresh::{start_refresh_schedule, Refresher};
use kafka_exporter::snapshot::SnapshotStore;
use kafka_exporter::upstream::UpstreamClient;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::Arc;
use tokio::net::UnixListener;
use tokio::select;
use tokio::signal::unix::{signal, SignalKind};
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

pub async fn run_until_stopped(config: AppConfig) -> Result<(), anyhow::Error> {
    let upstream = UpstreamClient::new(config.upstream.settings())
        .context("While creating upstream client")?;
    info!("Polling {}", upstream.base_url());

    let store = Arc::new(SnapshotStore::new());
    let refresher = Arc::new(Refresher::new(upstream, store.clone()));

    let socket_path = &config.listen.unix_socket;
    let listener = bind_unix_socket(socket_path)
        .await
        .with_context(|| format!("While binding {}", socket_path.display()))?;
    info!(
        "Listening {}, metrics on {}",
        socket_path.display(),
        config.listen.metrics_path
    );

    let cancellation_token = CancellationToken::new();
    let schedule = start_refresh_schedule(
        refresher,
        config.refresh.interval(),
        cancellation_token.clone(),
    );

    let served = serve_exposition(
        listener,
        store,
        &config.listen.metrics_path,
        shutdown_signal(cancellation_token.clone()),
    )
    .await;

    cancellation_token.cancel();
    schedule.await.context("While joining refresh schedule")?;
    remove_socket_file(socket_path)
        .await
        .context("While removing socket file")?;

    served
}

/// Removes a stale socket file left by a previous run before binding.
pub async fn bind_unix_socket(path: &Path) -> Result<UnixListener, anyhow::Error> {
    remove_socket_file(path)
        .await
        .context("While removing stale socket file")?;

    let listener = UnixListener::bind(path).context("While binding unix socket")?;
    Ok(listener)
}

async fn remove_socket_file(path: &Path) -> Result<(), std::io::Error> {
    match tokio::fs::remove_file(path).await {
        Err(e) if e.kind() != ErrorKind::NotFound => Err(e),
        _ => Ok(()),
    }
}

async fn shutdown_signal(cancellation_token: CancellationToken) {
    let terminate = async {
        match signal(SignalKind::terminate()) {
            Ok(mut terminate) => {
                terminate.recv().await;
            }
            Err(e) => {
                error!("Can't listen for SIGTERM\n{e:?}");
                std::future::pending::<()>().await
            }
        }
    };

    select! {
        _ = tokio::signal::ctrl_c() => info!("Received Ctrl-C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
        _ = cancellation_token.cancelled() => {}
    }

    cancellation_token.cancel();
}
