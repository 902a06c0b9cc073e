mod routes;
pub mod templates;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::Router;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::client::{PostsApi, PostsClient};
use crate::config::Config;
use crate::controller::Controller;

/// Shared application state.
///
/// The controller sits behind one async mutex, so user actions apply one at
/// a time in arrival order.
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<Mutex<Controller<PostsClient>>>,
}

impl AppState {
    #[must_use]
    pub fn new(controller: Controller<PostsClient>) -> Self {
        Self {
            controller: Arc::new(Mutex::new(controller)),
        }
    }
}

/// Fetch the listing again.
///
/// The controller lock is released while the request is in flight, so pages
/// served meanwhile show the loading indicator.
pub async fn refresh_posts(state: &AppState) {
    let api = {
        let mut controller = state.controller.lock().await;
        controller.begin_load();
        controller.api().clone()
    };
    let result = api.list_posts().await;
    state.controller.lock().await.finish_load(result);
}

/// Run the web server until `shutdown` completes.
///
/// # Errors
///
/// Returns an error if the address is invalid, the bind fails or the server
/// stops with an error.
pub async fn serve<F>(config: &Config, state: AppState, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let addr: SocketAddr = format!("{}:{}", config.web_host, config.web_port)
        .parse()
        .context("Invalid web server address")?;

    let app = create_app(state);

    info!(addr = %addr, "Starting HTTP web server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind web server")?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .context("Web server error")?;

    info!("Web server stopped");
    Ok(())
}

/// Create the main application router.
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(routes::router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
