use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// ServiceError
///
/// The error taxonomy shared by the repository, the policy synchronizer and
/// the HTTP handlers. Persistence failures are never retried here; they
/// propagate upward with `?` until a handler translates them into a status
/// code via the `IntoResponse` impl below.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The requested record (user, role, menu, article, config entry) does
    /// not exist.
    #[error("record not found")]
    NotFound,

    /// A unique-name constraint would be violated (duplicate username or
    /// role name). Detected before any write or policy synchronization.
    #[error("record already exists")]
    Conflict,

    /// The persistence layer failed on a read or write.
    #[error("store error: {0}")]
    Store(#[from] sqlx::Error),

    /// An unexpected failure outside the persistence layer, e.g. a panicked
    /// aggregation task.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = match &self {
            ServiceError::NotFound => StatusCode::NOT_FOUND,
            ServiceError::Conflict => StatusCode::CONFLICT,
            ServiceError::Store(e) => {
                tracing::error!("store error: {:?}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            }
            ServiceError::Internal(msg) => {
                tracing::error!("internal error: {}", msg);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}
