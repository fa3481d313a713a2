use anyhow::Context;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::any;
use axum::Router;
use http::header::{CONTENT_TYPE, LAST_MODIFIED};
use http::{HeaderMap, HeaderValue};
use kafka_exporter::snapshot::SnapshotStore;
use std::future::Future;
use std::sync::Arc;
use tokio::net::UnixListener;
use tower_http::trace::TraceLayer;
use tracing::debug;

pub const METRICS_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";
const LANDING_CONTENT_TYPE: &str = "text/html; charset=utf-8";
const HTTP_DATE_FORMAT: &str = "%a, %d %b %Y %H:%M:%S GMT";

#[derive(Clone)]
struct ExpositionState {
    store: Arc<SnapshotStore>,
    landing_page: Arc<str>,
}

pub fn landing_page(metrics_path: &str) -> String {
    format!(
        "<html>\n\
         <head><title>Kafka Exporter</title></head>\n\
         <body>\n\
         <h1>Kafka Exporter</h1>\n\
         <p><a href='{metrics_path}'>Metrics</a></p>\n\
         </body>\n\
         </html>"
    )
}

/// Serves the current snapshot on `metrics_path` for any method and the
/// landing page on every other path.
pub fn router(store: Arc<SnapshotStore>, metrics_path: &str) -> Router {
    let state = ExpositionState {
        store,
        landing_page: landing_page(metrics_path).into(),
    };

    Router::new()
        .route(metrics_path, any(metrics))
        .fallback(landing)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tracing::instrument(skip_all)]
async fn metrics(State(state): State<ExpositionState>) -> impl IntoResponse {
    let snapshot = state.store.read_snapshot().await;
    debug!(
        "Serving snapshot v{}, {} bytes",
        snapshot.version(),
        snapshot.body().len()
    );

    let mut headers = HeaderMap::new();
    headers.insert(CONTENT_TYPE, HeaderValue::from_static(METRICS_CONTENT_TYPE));
    if let Some(published_at) = snapshot.published_at() {
        let last_modified = published_at.format(HTTP_DATE_FORMAT).to_string();
        if let Ok(value) = HeaderValue::from_str(&last_modified) {
            headers.insert(LAST_MODIFIED, value);
        }
    }

    (headers, snapshot.body().clone())
}

async fn landing(State(state): State<ExpositionState>) -> impl IntoResponse {
    (
        [(CONTENT_TYPE, LANDING_CONTENT_TYPE)],
        state.landing_page.to_string(),
    )
}

pub async fn serve_exposition(
    listener: UnixListener,
    store: Arc<SnapshotStore>,
    metrics_path: &str,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), anyhow::Error> {
    axum::serve(listener, router(store, metrics_path))
        .with_graceful_shutdown(shutdown)
        .await
        .context("While serving exposition")?;

    Ok(())
}
