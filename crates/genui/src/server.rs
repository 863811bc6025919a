use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    Json, Router,
    extract::State,
    http::{Method, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use genui_config::{Config, credential::MemoryStore};
use genui_core::{DeclinePrompt, HostPage, OutputRenderer, Pipeline};
use serde_json::json;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};

/// Shared by every page request. The credential is already resolved into
/// `store`, so requests never prompt.
pub(crate) struct PageState {
    pub(crate) config: Config,
    pub(crate) store: MemoryStore,
    pub(crate) client: reqwest::Client,
}

/// Binds `host:port` and serves `app` until Ctrl-C or SIGTERM.
///
/// # Errors
///
/// This function will return an error if axum fails binding to the provided host/port
pub(crate) async fn serve(host: &str, port: u16, app: Router, name: &str) -> Result<()> {
    let addr = format!("{host}:{port}");
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context(format!("Failed binding {name} to {addr}"))?;

    info!("{name} listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down...");
    Ok(())
}

/// Host page router. Every `GET /` runs the full pipeline against a fresh page.
pub(crate) fn create_page_router(state: Arc<PageState>) -> Router {
    Router::new()
        .route("/", get(render_page))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

async fn render_page(State(state): State<Arc<PageState>>) -> Html<String> {
    let page = HostPage::new(&state.config.page, state.config.backend.base_url());
    let mut renderer = OutputRenderer::deferred(page);

    let pipeline = Pipeline::with_client(
        &state.config,
        &state.store,
        &DeclinePrompt,
        state.client.clone(),
    );

    // the error panel is already in the page
    if let Err(e) = pipeline.run(&mut renderer).await {
        warn!(err = %e, "Serving page with error panel");
    }

    Html(renderer.into_page().to_html())
}

/// Demo backend handing out `script` as the DSL and accepting form posts
/// on any path.
pub(crate) fn create_backend_router(data_path: &str, script: String) -> Router {
    let path = format!("/{}", data_path.trim_start_matches('/'));

    Router::new()
        .route(&path, get(initial_data).post(form_response))
        .fallback(catch_all)
        .with_state(Arc::new(script))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn initial_data(State(script): State<Arc<String>>) -> Json<serde_json::Value> {
    Json(json!({ "script": script.as_str() }))
}

async fn form_response() -> Json<&'static str> {
    Json("i_am_a_response")
}

async fn catch_all(method: Method) -> Response {
    if method == Method::POST {
        form_response().await.into_response()
    } else {
        StatusCode::NOT_FOUND.into_response()
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(err = %e, "Failed installing Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(err = %e, "Failed installing SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("Shutdown signal received, cleaning up...");
}
