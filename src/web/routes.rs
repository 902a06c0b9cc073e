use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;

use super::templates;
use super::AppState;
use crate::client::PostsClient;
use crate::controller::{Controller, ControllerError, PostForm};
use crate::model::PostId;

/// Create the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/posts", post(submit_primary))
        .route("/editor", post(submit_edit))
        .route("/editor/cancel", post(cancel_edit))
        .route("/controls/:control_id", post(click_control))
        .route("/reload", post(reload))
        .route("/healthz", get(health))
}

/// Fields of the primary form. An empty `id` means create.
#[derive(Debug, Deserialize)]
pub struct PrimaryFormInput {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    body: String,
}

impl From<PrimaryFormInput> for PostForm {
    fn from(input: PrimaryFormInput) -> Self {
        let id = Some(input.id.trim())
            .filter(|s| !s.is_empty())
            .map(PostId::from);
        Self {
            id,
            title: input.title,
            body: input.body,
        }
    }
}

/// Fields of the editing area, including the id of the post it was
/// rendered for.
#[derive(Debug, Deserialize)]
pub struct EditFormInput {
    #[serde(default)]
    id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    body: String,
}

async fn home(State(state): State<AppState>) -> Response {
    let mut controller = state.controller.lock().await;
    Html(render_once(&mut controller)).into_response()
}

/// Render the page, then drop the notice it showed.
fn render_once(controller: &mut Controller<PostsClient>) -> String {
    let page = templates::render_page(&*controller);
    controller.clear_notice();
    page
}

async fn submit_primary(
    State(state): State<AppState>,
    Form(input): Form<PrimaryFormInput>,
) -> Response {
    let mut controller = state.controller.lock().await;
    let result = controller.submit_primary(input.into()).await;
    after_action(result, || render_once(&mut controller))
}

async fn submit_edit(State(state): State<AppState>, Form(input): Form<EditFormInput>) -> Response {
    let mut controller = state.controller.lock().await;
    let id = PostId::from(input.id.trim());
    let result = controller.submit_edit(&id, input.title, input.body).await;
    after_action(result, || render_once(&mut controller))
}

async fn cancel_edit(State(state): State<AppState>) -> Redirect {
    state.controller.lock().await.cancel_edit();
    Redirect::to("/")
}

async fn click_control(State(state): State<AppState>, Path(control_id): Path<String>) -> Response {
    let mut controller = state.controller.lock().await;
    let result = controller.click(&control_id).await;
    after_action(result, || render_once(&mut controller))
}

async fn reload(State(state): State<AppState>) -> Redirect {
    super::refresh_posts(&state).await;
    Redirect::to("/")
}

async fn health() -> &'static str {
    "OK"
}

/// Redirect home on success; otherwise re-render the page (with its notice)
/// under a status that matches the failure.
fn after_action(result: Result<(), ControllerError>, page: impl FnOnce() -> String) -> Response {
    let status = match result {
        Ok(()) => return Redirect::to("/").into_response(),
        Err(ControllerError::Remote(_)) => StatusCode::BAD_GATEWAY,
        Err(ControllerError::NoPostSelected | ControllerError::StaleEditor { .. }) => {
            StatusCode::CONFLICT
        }
        Err(ControllerError::UnknownPost(_) | ControllerError::UnknownControl(_)) => {
            StatusCode::NOT_FOUND
        }
    };
    (status, Html(page())).into_response()
}
