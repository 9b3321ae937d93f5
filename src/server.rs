//! HTTP server for the search front-end.
//!
//! ## Endpoints
//!
//! - `GET /search?q=<text>`: HTML results page; empty `q` redirects to `/`
//!   with `302 Found`
//! - `POST /search` and `POST /api/search`: the same search as JSON
//! - `GET /health`: liveness check
//! - anything else: static files from the configured directory

use axum::extract::{Query, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use erowid_es::{DisplayResult, EsClient, SearchQuery};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::Path;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::AppConfig;
use crate::error::{AppError, Result};
use crate::render::{self, ResultsPage};

/// Shared state for axum handlers. Read-only across requests.
#[derive(Clone)]
struct AppState {
    client: EsClient,
}

/// Query string of `GET /search`.
#[derive(Debug, Deserialize)]
pub struct SearchParams {
    pub q: Option<String>,
}

/// Body of `POST /api/search`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiSearchRequest {
    #[serde(default)]
    pub query: Option<String>,
}

/// Response of `POST /api/search`.
#[derive(Debug, Serialize)]
pub struct ApiSearchResponse {
    pub query: String,
    pub reports: Vec<DisplayResult>,
}

/// Build the application router.
pub fn router(client: EsClient, static_dir: &Path) -> Router {
    Router::new()
        .route("/search", get(search_page).post(api_search))
        .route("/api/search", post(api_search))
        .route("/health", get(health))
        .fallback_service(ServeDir::new(static_dir))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState { client })
}

/// Bind the configured address and serve until Ctrl-C.
///
/// # Errors
///
/// Returns an error if the configuration is invalid, the listener cannot
/// bind, or the server stops with an I/O error.
pub async fn run(config: &AppConfig) -> Result<()> {
    let app = app_for(config)?;
    let listener = TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        es = %config.search.host,
        index = %config.search.index,
        "search front-end listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("search front-end stopped");
    Ok(())
}

fn app_for(config: &AppConfig) -> Result<Router> {
    config.validate()?;
    let client = EsClient::new(&config.search)?;
    Ok(router(client, &config.server.static_dir))
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

/// A server running in a background tokio task.
///
/// Used by tests and embedders that need the bound address; the binary uses
/// [`run`] instead.
pub struct Server {
    /// The address the server is listening on.
    addr: SocketAddr,
    /// Handle to the background server task.
    handle: JoinHandle<()>,
}

impl Server {
    /// Start serving in the background.
    ///
    /// Binds to `{server.host}:{server.port}` (use port `0` for auto-assign).
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the listener
    /// cannot bind.
    pub async fn start(config: &AppConfig) -> Result<Self> {
        let app = app_for(config)?;
        let listener = TcpListener::bind(config.bind_addr()).await?;
        let addr = listener.local_addr()?;

        tracing::info!("search front-end listening on http://{addr}");

        let handle = tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!("search front-end error: {e}");
            }
        });

        Ok(Self { addr, handle })
    }

    /// Returns the address the server is listening on.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Returns the port the server is listening on.
    pub fn port(&self) -> u16 {
        self.addr.port()
    }

    /// Abort the server task.
    pub fn shutdown(&self) {
        self.handle.abort();
    }
}

impl Drop for Server {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// `GET /search`: run the query and render the results page.
async fn search_page(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> std::result::Result<Response, AppError> {
    let Some(query) = SearchQuery::new(params.q) else {
        return Ok(redirect_home());
    };

    let reports = erowid_es::search(&state.client, query.clone()).await?;
    let html = render::results_page(&ResultsPage {
        query: query.as_str(),
        reports: &reports,
    });
    Ok(Html(html).into_response())
}

/// `302 Found` to `/` with an empty body.
fn redirect_home() -> Response {
    (StatusCode::FOUND, [(header::LOCATION, "/")]).into_response()
}

/// `POST /search`, `POST /api/search`: run the query and return the display model as JSON.
async fn api_search(
    State(state): State<AppState>,
    Json(request): Json<ApiSearchRequest>,
) -> std::result::Result<Response, AppError> {
    let Some(query) = SearchQuery::new(request.query) else {
        let body = serde_json::json!({ "error": "query must not be empty" });
        return Ok((StatusCode::BAD_REQUEST, Json(body)).into_response());
    };

    let reports = erowid_es::search(&state.client, query.clone()).await?;
    Ok(Json(ApiSearchResponse {
        query: query.into_inner(),
        reports,
    })
    .into_response())
}

/// `GET /health`: liveness check. Does not touch the engine.
async fn health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok"
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_params_accept_missing_q() {
        let params: SearchParams = serde_json::from_str("{}").unwrap();
        assert!(params.q.is_none());
    }

    #[test]
    fn api_request_query_is_optional() {
        let request: ApiSearchRequest = serde_json::from_str("{}").unwrap();
        assert!(request.query.is_none());
        let request: ApiSearchRequest = serde_json::from_str(r#"{"query":"dmt"}"#).unwrap();
        assert_eq!(request.query.as_deref(), Some("dmt"));
    }

    #[test]
    fn redirect_home_is_found_to_root() {
        let response = redirect_home();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/"
        );
    }

    #[test]
    fn app_for_rejects_invalid_config() {
        let mut config = AppConfig::default();
        config.search.index = String::new();
        assert!(matches!(app_for(&config), Err(AppError::Config(_))));
    }

    #[tokio::test]
    async fn start_binds_ephemeral_port() {
        let mut config = AppConfig::default();
        config.server.host = "127.0.0.1".into();
        config.server.port = 0;
        let server = Server::start(&config).await.unwrap();
        assert_ne!(server.port(), 0);
        assert!(server.addr().ip().is_loopback());
        server.shutdown();
    }
}
