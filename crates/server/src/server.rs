use axum::{Router, routing::get};
use url::Url;

use std::{sync::Arc, time::Duration};

use crate::export;
use engine::{Engine, ExportSettings};

/// Deadline of a whole export unless configured otherwise.
pub const DEFAULT_EXPORT_TIMEOUT: Duration = Duration::from_secs(5);

/// How the export endpoint behaves.
#[derive(Clone, Debug)]
pub struct ExportConfig {
    pub settings: ExportSettings,
    /// Applies to the whole export: every page fetch, the estimate and the render.
    pub timeout: Duration,
    /// Base of manifest links. When unset the links point back at the
    /// `Host` the request came in on.
    pub public_url: Option<Url>,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            settings: ExportSettings::default(),
            timeout: DEFAULT_EXPORT_TIMEOUT,
            public_url: None,
        }
    }
}

#[derive(Clone)]
pub struct ServerState {
    pub engine: Arc<Engine>,
    pub export: Arc<ExportConfig>,
}

impl ServerState {
    pub fn new(engine: Engine, export: ExportConfig) -> Self {
        Self {
            engine: Arc::new(engine),
            export: Arc::new(export),
        }
    }
}

pub fn router(state: ServerState) -> Router {
    Router::new()
        .route("/v1/transactions/export.csv", get(export::export_csv))
        .with_state(state)
}

pub async fn run_with_listener(
    engine: Engine,
    export: ExportConfig,
    listener: tokio::net::TcpListener,
) -> Result<(), std::io::Error> {
    let addr = listener.local_addr()?;
    tracing::info!(
        "Server listening on {}, export parts of {} bytes",
        addr,
        export.settings.chunk_limit_bytes
    );

    axum::serve(listener, router(ServerState::new(engine, export))).await
}

pub fn spawn_with_listener(
    engine: Engine,
    export: ExportConfig,
    listener: tokio::net::TcpListener,
) -> Result<std::net::SocketAddr, std::io::Error> {
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(err) = run_with_listener(engine, export, listener).await {
            tracing::error!("server failed: {err}");
        }
    });

    Ok(addr)
}
