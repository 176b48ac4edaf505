use crate::client::{ClientConfig, SolverBackend};
use crate::controller::{ClueSubmission, SolveMode};
use crate::error::SolveError;
use crate::html::{self, FormState};
use crate::layout::GridLayout;
use crate::mock::{MOCK_CLUE, mock_result};
use crate::page::Page;
use axum::{
    Form, Json, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use std::fmt;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::compression::CompressionLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{error, info};

type SharedState = Arc<AppState>;

pub struct AppState {
    pub mode: SolveMode,
    pub backend: SolverBackend,
    pub layout: GridLayout,
}

impl AppState {
    fn page(&self) -> Page {
        Page::new(self.mode, self.layout)
    }
}

#[derive(Debug, Clone)]
pub struct WebConfig {
    pub addr: SocketAddr,
    /// Solving service to forward clues to. Mock mode without one answers
    /// from the built-in result.
    pub solver: Option<ClientConfig>,
    pub mode: SolveMode,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            solver: None,
            mode: SolveMode::default(),
        }
    }
}

#[derive(Debug)]
pub enum WebError {
    Io(std::io::Error),
    Solver(SolveError),
}

impl fmt::Display for WebError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WebError::Io(err) => write!(f, "io error: {err}"),
            WebError::Solver(err) => write!(f, "solver setup failed: {err}"),
        }
    }
}

impl std::error::Error for WebError {}

impl From<std::io::Error> for WebError {
    fn from(value: std::io::Error) -> Self {
        WebError::Io(value)
    }
}

impl From<SolveError> for WebError {
    fn from(value: SolveError) -> Self {
        WebError::Solver(value)
    }
}

pub async fn serve(config: WebConfig) -> Result<(), WebError> {
    let backend = SolverBackend::from_config(config.mode, config.solver.clone())?;
    info!(
        %config.addr,
        mode = %config.mode,
        solver = %backend.describe(),
        "Binding HTTP listener"
    );
    let state = Arc::new(AppState {
        mode: config.mode,
        backend,
        layout: GridLayout::default(),
    });
    let router = build_router(state);
    let listener = TcpListener::bind(config.addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("HTTP server exited");
    Ok(())
}

pub fn build_router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/solve", post(solve_form))
        .route("/api/submit_clue_mock", post(submit_clue_mock))
        .route("/healthz", get(health))
        .route("/api/health", get(api_health))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().include_headers(true))
                .on_response(DefaultOnResponse::new().include_headers(true)),
        )
        .layer(CompressionLayer::new())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = signal::ctrl_c().await;
    };
    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        if let Ok(mut stream) = signal(SignalKind::terminate()) {
            let _ = stream.recv().await;
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

async fn home(State(state): State<SharedState>) -> Response {
    let page = state.page();
    render(&page, &FormState::default())
}

async fn solve_form(
    State(state): State<SharedState>,
    Form(submission): Form<ClueSubmission>,
) -> Response {
    let mut page = state.page();
    // A blocked submission leaves the page as it was.
    let _ = page.solve(&state.backend, &submission).await;
    let form = FormState {
        clue: submission.clue.clone(),
        length: submission.expected_length.clone().unwrap_or_default(),
    };
    render(&page, &form)
}

async fn submit_clue_mock() -> impl IntoResponse {
    Json(json!({ "clue": MOCK_CLUE, "solution": mock_result() }))
}

async fn health() -> impl IntoResponse {
    Json(json!({ "status": "ok" }))
}

/// Health check at the solving service's path, for clients probing it.
async fn api_health() -> impl IntoResponse {
    Json(json!({ "status": "healthy" }))
}

fn render(page: &Page, form: &FormState) -> Response {
    match html::render_page(page.surface(), page.controller().mode(), form) {
        Ok(body) => Html(body).into_response(),
        Err(err) => {
            error!(error = %err, "Page template failed to render");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(render_error_page("The page could not be rendered.")),
            )
                .into_response()
        }
    }
}

fn render_error_page(message: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
  <head>
    <meta charset="utf-8" />
    <title>Cryptic Lens • Error</title>
  </head>
  <body>
    <main>
      <h1>Something went wrong</h1>
      <p>{message}</p>
      <a href="/">Back to the solver</a>
    </main>
  </body>
</html>"#
    )
}
