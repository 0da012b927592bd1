mod middleware;
mod todos;

pub use todos::{HttpState, build_router};

use axum::http::StatusCode;

use crate::application::error::HttpError;
use crate::application::repos::RepoError;
use crate::application::todos::TodoServiceError;
use crate::domain::error::DomainError;

pub(crate) const TODO_NOT_FOUND_MESSAGE: &str = "Todo not found or unauthorized";
pub(crate) const INVALID_METHOD_MESSAGE: &str = "Invalid method";

/// Map a service error to a consistent HTTP error response.
pub fn todo_error_to_http(source: &'static str, err: TodoServiceError) -> HttpError {
    match err {
        TodoServiceError::Domain(DomainError::NotFound { .. }) => HttpError::new(
            source,
            StatusCode::NOT_FOUND,
            TODO_NOT_FOUND_MESSAGE,
            "no todo matched the requested id and owner",
        ),
        TodoServiceError::Domain(DomainError::Validation { message }) => HttpError::new(
            source,
            StatusCode::BAD_REQUEST,
            INVALID_METHOD_MESSAGE,
            message,
        ),
        TodoServiceError::MissingTask => HttpError::new(
            source,
            StatusCode::UNPROCESSABLE_ENTITY,
            "Missing task",
            "edit submitted without a `task` field",
        ),
        TodoServiceError::Repo(err @ RepoError::Integrity { .. }) => HttpError::from_error(
            source,
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error",
            &err,
        ),
    }
}
