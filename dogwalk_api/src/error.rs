use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};

use crate::api::ErrorResponse;
use crate::walk_repository::WalkRepositoryError;

pub const USER_NOT_FOUND: &str = "user not found";
pub const PATH_NOT_FOUND: &str = "path not found";

/// Failure of a service call, each variant maps to one HTTP status
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// Well-formed request carrying a value the operation rejects
    #[error("{0}")]
    InvalidArgument(String),

    /// Request that failed type or range validation
    #[error("{0}")]
    Unprocessable(String),

    #[error("{0}")]
    NotFound(String),

    #[error("datastore unavailable")]
    Unavailable(#[source] WalkRepositoryError),
}

impl From<WalkRepositoryError> for ServiceError {
    fn from(err: WalkRepositoryError) -> Self {
        match err {
            WalkRepositoryError::UserNotFound(_) => ServiceError::NotFound(USER_NOT_FOUND.into()),
            WalkRepositoryError::PathNotFound(_) => ServiceError::NotFound(PATH_NOT_FOUND.into()),
            other => {
                tracing::error!("Datastore failure {}", other);
                ServiceError::Unavailable(other)
            }
        }
    }
}

impl ResponseError for ServiceError {
    fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ServiceError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorResponse {
            detail: self.to_string(),
        })
    }
}
