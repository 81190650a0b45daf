use axum::{http::StatusCode, response::IntoResponse, response::Response, Json};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// Application-wide error type.
///
/// Every rejection the engine can produce is a variant here; callers decide
/// how to react based on the variant, never on a panic. The HTTP mapping
/// lives in the `IntoResponse` impl below.
#[derive(Debug, Error)]
pub enum AppError {
    /// Missing or malformed request data: unknown location, cabin out of
    /// range, a slot that is not on the grid, a request without any leg.
    #[error("{0}")]
    InvalidInput(String),
    /// The requested date failed the date-window check. The message states
    /// which check failed (format, past date, or not an offered date).
    #[error("{0}")]
    DateNotAllowed(String),
    /// Capacity for the named leg was exhausted at commit time.
    #[error("selected {0} slot is no longer available")]
    SlotUnavailable(String),
    /// A schedule update was rejected before being applied. Carries every
    /// violation so an administrator can fix them in one pass.
    #[error("configuration rejected: {}", .0.join("; "))]
    ConfigurationInvalid(Vec<String>),
    #[error("{0}")]
    EntityNotFound(String),
    #[error(transparent)]
    ValidationError(#[from] garde::Report),
    #[error("admin token missing or not accepted")]
    UnauthenticatedError,
    #[error("transaction could not be completed")]
    TransactionError(#[source] sqlx::Error),
    #[error("storage operation failed")]
    SpecificOperationError(#[source] sqlx::Error),
    #[error("no rows affected: {0}")]
    NoRowsAffectedError(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status_code = match self {
            AppError::InvalidInput(_) | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::DateNotAllowed(_) | AppError::ConfigurationInvalid(_) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            AppError::SlotUnavailable(_) => StatusCode::CONFLICT,
            AppError::EntityNotFound(_) => StatusCode::NOT_FOUND,
            AppError::UnauthenticatedError => StatusCode::UNAUTHORIZED,
            AppError::TransactionError(_)
            | AppError::SpecificOperationError(_)
            | AppError::NoRowsAffectedError(_)
            | AppError::UnexpectedError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status_code == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(
                error.cause_chain = ?self,
                error.message = %self,
                "unexpected error happened"
            );
        }

        (status_code, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
