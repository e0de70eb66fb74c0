//! Local development server
//!
//! Serves the resolved pipeline configuration over HTTP. Every response
//! advertises the server's keep-alive timeout.

use axum::{
    extract::{Request, State},
    http::{header::HeaderName, HeaderValue},
    middleware::{self, Next},
    response::Response,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::config::{NetworkProfile, PipelineConfig};

/// Keep-alive timeout of a freshly created server
pub const DEFAULT_KEEP_ALIVE: Duration = Duration::from_secs(5);

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

/// The mutable surface of a server exposed to creation hooks
pub trait ServerHandle {
    fn keep_alive_timeout(&self) -> Duration;

    /// Set the keep-alive timeout. On [`DevServer`] this is the value
    /// advertised in the `Keep-Alive: timeout=N` response header; the
    /// connection's idle handling stays with hyper's defaults.
    fn set_keep_alive_timeout(&mut self, timeout: Duration);
}

/// A local server instance
pub struct DevServer {
    port: u16,
    keep_alive_timeout: Duration,
    config: Arc<PipelineConfig>,
}

impl ServerHandle for DevServer {
    fn keep_alive_timeout(&self) -> Duration {
        self.keep_alive_timeout
    }

    fn set_keep_alive_timeout(&mut self, timeout: Duration) {
        self.keep_alive_timeout = timeout;
    }
}

#[derive(Clone)]
struct ServerState {
    config: Arc<PipelineConfig>,
    keep_alive: Duration,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    keep_alive_secs: u64,
}

#[derive(Serialize)]
struct NetworkEntry {
    name: String,
    default: bool,
    #[serde(flatten)]
    profile: NetworkProfile,
}

impl DevServer {
    pub fn new(port: u16, config: Arc<PipelineConfig>) -> Self {
        Self {
            port,
            keep_alive_timeout: DEFAULT_KEEP_ALIVE,
            config,
        }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    /// Build the router
    pub fn router(&self) -> Router {
        let state = ServerState {
            config: self.config.clone(),
            keep_alive: self.keep_alive_timeout,
        };

        let cors = CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);

        Router::new()
            .route("/health", get(health))
            .route("/api/config", get(get_config))
            .route("/api/networks", get(list_networks))
            .with_state(state.clone())
            .layer(middleware::from_fn_with_state(state, keep_alive_header))
            .layer(cors)
    }

    /// Bind `0.0.0.0:<port>` and serve until the process exits
    pub async fn serve(self) -> Result<(), ServerError> {
        let listener = TcpListener::bind(("0.0.0.0", self.port)).await?;
        self.serve_on(listener).await
    }

    /// Serve on an already bound listener
    pub async fn serve_on(self, listener: TcpListener) -> Result<(), ServerError> {
        log::info!(
            "Dev server listening on {} (keep-alive {}s)",
            listener.local_addr()?,
            self.keep_alive_timeout.as_secs()
        );
        axum::serve(listener, self.router()).await?;
        Ok(())
    }
}

async fn keep_alive_header(
    State(state): State<ServerState>,
    request: Request,
    next: Next,
) -> Response {
    let mut response = next.run(request).await;
    if let Ok(value) = HeaderValue::from_str(&format!("timeout={}", state.keep_alive.as_secs())) {
        response
            .headers_mut()
            .insert(HeaderName::from_static("keep-alive"), value);
    }
    response
}

async fn health(State(state): State<ServerState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        keep_alive_secs: state.keep_alive.as_secs(),
    })
}

async fn get_config(State(state): State<ServerState>) -> Json<PipelineConfig> {
    Json(state.config.as_ref().clone())
}

async fn list_networks(State(state): State<ServerState>) -> Json<Vec<NetworkEntry>> {
    let networks = &state.config.networks;
    Json(
        networks
            .iter()
            .map(|(name, profile)| NetworkEntry {
                name: name.to_string(),
                default: name == networks.default_network,
                profile: profile.clone(),
            })
            .collect(),
    )
}
