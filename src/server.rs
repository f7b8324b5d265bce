use axum::{
    Json, Router,
    extract::{Request, State},
    http::{HeaderValue, StatusCode, header},
    middleware::Next,
    response::IntoResponse,
    routing::{get, get_service},
};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;

use tower_http::services::{ServeDir, ServeFile};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use tracing::{info, warn};

use crate::AppState;
use crate::api;
use crate::catalog::Catalog;
use crate::config::AppConfig;
use crate::remote::{ApifyClient, RemoteApi};

/// Start the Axum server with the provided configuration.
pub async fn start_server(config: Arc<AppConfig>) -> anyhow::Result<()> {
    if !config.remote.has_credential() {
        warn!(
            name: "remote.credential.missing",
            "APIFY_API_KEY is not set; the remote API will reject run and status calls"
        );
    }

    let catalog = Arc::new(
        Catalog::load_or_empty(&config.catalog.path).with_listing_cap(config.catalog.max_listed),
    );
    let remote: Arc<dyn RemoteApi> = Arc::new(ApifyClient::new(&config.remote)?);

    info!(
        name: "remote.config.loaded",
        base_url = %config.remote.base_url,
        credential = config.remote.has_credential(),
        "Remote API configuration loaded"
    );

    let state = AppState::new(Arc::clone(&config), catalog, remote);
    let app = build_app(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(
        name: "server.started",
        address = %addr,
        "Server started"
    );

    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}

/// Build the full application router: UI, JSON API, health check and the
/// middleware stack.
pub fn build_app(state: AppState) -> Router {
    let static_dir = Path::new(&state.config.server.static_dir).to_path_buf();
    let timeout_duration = state.config.server.request_timeout();

    Router::new()
        .route(
            "/",
            get_service(ServeFile::new(static_dir.join("index.html"))),
        )
        .nest_service("/static", ServeDir::new(&static_dir))
        .merge(api::router())
        .route("/healthz", get(healthz))
        .fallback(not_found)
        .layer(axum::middleware::from_fn(
            move |req: Request, next: Next| {
                let duration = timeout_duration;
                async move {
                    match tokio::time::timeout(duration, next.run(req)).await {
                        Ok(res) => res,
                        Err(_) => {
                            (StatusCode::REQUEST_TIMEOUT, "Request timed out").into_response()
                        }
                    }
                }
            },
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-cache, no-store, must-revalidate"),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// GET /healthz
async fn healthz(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "actors": state.catalog.len(),
        "credentialConfigured": state.config.remote.has_credential(),
    }))
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, "Not Found")
}
