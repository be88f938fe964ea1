use api_types::Envelope;
use axum::{Json, http::StatusCode, response::IntoResponse};
use engine::EngineError;

pub use server::{
    DEFAULT_EXPORT_TIMEOUT, ExportConfig, ServerState, router, run_with_listener,
    spawn_with_listener,
};

mod export;
mod server;

const INTERNAL_ERROR: &str = "internal server error";

#[derive(Debug)]
pub enum ServerError {
    Engine(EngineError),
    /// Rejected request, answered with `400` and the message as is.
    Generic(String),
    /// The export deadline elapsed before a response could be built.
    Timeout,
    /// Failure on our side; the detail is logged, not sent.
    Internal(String),
}

fn status_for_engine_error(err: &EngineError) -> StatusCode {
    match err {
        EngineError::InvalidPart(_)
        | EngineError::InvalidFilter(_)
        | EngineError::InvalidTransaction(_)
        | EngineError::InvalidCsv(_) => StatusCode::BAD_REQUEST,
        EngineError::KeyNotFound(_) => StatusCode::NOT_FOUND,
        EngineError::ExistingKey(_) => StatusCode::CONFLICT,
        EngineError::Csv(_) | EngineError::Io(_) | EngineError::Database(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn message_for_engine_error(err: EngineError) -> String {
    match err {
        EngineError::Database(db_err) => {
            tracing::error!("database error: {db_err}");
            INTERNAL_ERROR.to_string()
        }
        EngineError::Csv(csv_err) => {
            tracing::error!("csv error: {csv_err}");
            INTERNAL_ERROR.to_string()
        }
        EngineError::Io(io_err) => {
            tracing::error!("io error: {io_err}");
            INTERNAL_ERROR.to_string()
        }
        other => other.to_string(),
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            ServerError::Engine(err) => {
                (status_for_engine_error(&err), message_for_engine_error(err))
            }
            ServerError::Generic(err) => (StatusCode::BAD_REQUEST, err),
            ServerError::Timeout => {
                tracing::error!("export deadline elapsed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "export timed out".to_string(),
                )
            }
            ServerError::Internal(err) => {
                tracing::error!("{err}");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR.to_string())
            }
        };

        (status, Json(Envelope::<()>::error(message))).into_response()
    }
}

impl From<EngineError> for ServerError {
    fn from(value: EngineError) -> Self {
        Self::Engine(value)
    }
}
