use crate::controller::{SolveMode, Ticket};
use crate::error::SolveError;
use crate::mock::MockSolver;
use crate::model::SolveResult;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use tracing::debug;

/// Anything that can turn an issued ticket into a solve result.
pub trait SolveService {
    fn solve(&self, ticket: &Ticket) -> impl Future<Output = Result<SolveResult, SolveError>> + Send;
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:5000".to_string(),
            timeout: Duration::from_secs(10),
        }
    }
}

#[derive(Deserialize)]
struct SolveEnvelope {
    solution: SolveResult,
}

/// JSON-over-HTTP client for the solving service.
#[derive(Debug, Clone)]
pub struct HttpSolveClient {
    client: Client,
    base_url: String,
}

impl HttpSolveClient {
    pub fn new(config: ClientConfig) -> Result<Self, SolveError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self, mode: SolveMode) -> String {
        format!("{}{}", self.base_url, mode.endpoint_path())
    }
}

impl SolveService for HttpSolveClient {
    async fn solve(&self, ticket: &Ticket) -> Result<SolveResult, SolveError> {
        let url = self.endpoint(ticket.mode);
        debug!(%url, generation = ticket.generation, "Posting clue");
        let response = self.client.post(&url).json(&ticket.request).send().await?;
        let status = response.status();
        // An undecodable body counts as a transport fault, whatever the status.
        let body: Value = response.json().await?;
        if status.is_success() {
            let envelope: SolveEnvelope = serde_json::from_value(body)
                .map_err(|err| SolveError::Transport(format!("malformed solve result: {err}")))?;
            Ok(envelope.solution)
        } else {
            let message = body
                .get("error")
                .and_then(Value::as_str)
                .map(str::to_string);
            Err(SolveError::Service {
                status: status.as_u16(),
                message,
            })
        }
    }
}

/// The solver a front end talks to: a remote service, or the built-in
/// canned result when mock mode runs without a service URL.
#[derive(Debug, Clone)]
pub enum SolverBackend {
    Remote(HttpSolveClient),
    Canned(MockSolver),
}

impl SolverBackend {
    pub fn from_config(mode: SolveMode, config: Option<ClientConfig>) -> Result<Self, SolveError> {
        match (mode, config) {
            (SolveMode::Mock, None) => Ok(SolverBackend::Canned(MockSolver)),
            (_, config) => Ok(SolverBackend::Remote(HttpSolveClient::new(
                config.unwrap_or_default(),
            )?)),
        }
    }

    pub fn describe(&self) -> String {
        match self {
            SolverBackend::Remote(client) => client.base_url().to_string(),
            SolverBackend::Canned(_) => "built-in mock".to_string(),
        }
    }
}

impl SolveService for SolverBackend {
    async fn solve(&self, ticket: &Ticket) -> Result<SolveResult, SolveError> {
        match self {
            SolverBackend::Remote(client) => client.solve(ticket).await,
            SolverBackend::Canned(mock) => mock.solve(ticket).await,
        }
    }
}
