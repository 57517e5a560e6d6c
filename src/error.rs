use axum::response::Redirect;
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum FrontdeskError {
    #[error("Database error: {0}")]
    Database(#[from] SqlxError),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] bcrypt::BcryptError),

    #[error("Email already registered")]
    DuplicateEmail,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Access denied")]
    AccessDenied,

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("Book is already borrowed")]
    AlreadyBorrowed,

    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl IntoResponse for FrontdeskError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match self {
            // Role-gate failures follow the UI contract: bounce to the login page.
            FrontdeskError::AccessDenied => return Redirect::to("/login").into_response(),
            FrontdeskError::Database(ref e) => {
                error!(error = %e, "database failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorBody {
                        code: "INTERNAL_ERROR".to_string(),
                        message: "An internal server error occurred.".to_string(),
                    },
                )
            }
            FrontdeskError::PasswordHash(ref e) => {
                error!(error = %e, "password hashing failure");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ApiErrorBody {
                        code: "INTERNAL_ERROR".to_string(),
                        message: "An internal server error occurred.".to_string(),
                    },
                )
            }
            FrontdeskError::DuplicateEmail => (
                StatusCode::CONFLICT,
                ApiErrorBody {
                    code: "DUPLICATE_EMAIL".to_string(),
                    message: "Email already registered.".to_string(),
                },
            ),
            // One answer for unknown email and wrong password.
            FrontdeskError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ApiErrorBody {
                    code: "INVALID_CREDENTIALS".to_string(),
                    message: "Invalid credentials.".to_string(),
                },
            ),
            FrontdeskError::NotFound(what) => (
                StatusCode::NOT_FOUND,
                ApiErrorBody {
                    code: "NOT_FOUND".to_string(),
                    message: format!("{what} not found."),
                },
            ),
            FrontdeskError::AlreadyBorrowed => (
                StatusCode::CONFLICT,
                ApiErrorBody {
                    code: "ALREADY_BORROWED".to_string(),
                    message: "This book is already borrowed.".to_string(),
                },
            ),
            FrontdeskError::BadRequest(message) => (
                StatusCode::BAD_REQUEST,
                ApiErrorBody {
                    code: "BAD_REQUEST".to_string(),
                    message,
                },
            ),
        };
        (status, Json(ApiErrorResponse { error: body })).into_response()
    }
}

/// Standardized API error response body
#[derive(Serialize)]
pub struct ApiErrorBody {
    pub code: String,
    pub message: String,
}

#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: ApiErrorBody,
}
