//! Market Error Types
//!
//! This module provides market-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use auth::Denial;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

/// Market-specific result type alias
pub type MarketResult<T> = Result<T, MarketError>;

/// Market-specific error variants
#[derive(Debug, Error)]
pub enum MarketError {
    /// Input failed validation (user-correctable)
    #[error("{0}")]
    Validation(String),

    /// Status value outside the FOR_SALE / RESERVED / SOLD_OUT vocabulary
    #[error("Invalid status value")]
    InvalidStatus,

    /// No valid session presented
    #[error("Authentication required")]
    Unauthenticated,

    /// Authenticated but not entitled
    #[error("You do not have permission to do that")]
    Forbidden,

    /// Product not found
    #[error("Product not found")]
    ProductNotFound,

    /// Comment not found
    #[error("Comment not found")]
    CommentNotFound,

    /// User not found (moderation)
    #[error("User not found")]
    UserNotFound,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl MarketError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            MarketError::Validation(_) | MarketError::InvalidStatus => StatusCode::BAD_REQUEST,
            MarketError::Unauthenticated => StatusCode::UNAUTHORIZED,
            MarketError::Forbidden => StatusCode::FORBIDDEN,
            MarketError::ProductNotFound
            | MarketError::CommentNotFound
            | MarketError::UserNotFound => StatusCode::NOT_FOUND,
            MarketError::Database(_) | MarketError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            MarketError::Validation(_) | MarketError::InvalidStatus => ErrorKind::BadRequest,
            MarketError::Unauthenticated => ErrorKind::Unauthorized,
            MarketError::Forbidden => ErrorKind::Forbidden,
            MarketError::ProductNotFound
            | MarketError::CommentNotFound
            | MarketError::UserNotFound => ErrorKind::NotFound,
            MarketError::Database(_) | MarketError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    /// Convert to AppError
    ///
    /// Server-side errors are flattened to a generic message so no query
    /// text or driver detail reaches the client.
    pub fn to_app_error(&self) -> AppError {
        match self {
            MarketError::Database(_) | MarketError::Internal(_) => {
                AppError::new(self.kind(), "Something went wrong")
            }
            _ => AppError::new(self.kind(), self.to_string()),
        }
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            MarketError::Database(e) => {
                tracing::error!(error = %e, "Market database error");
            }
            MarketError::Internal(msg) => {
                tracing::error!(message = %msg, "Market internal error");
            }
            _ => {
                tracing::debug!(error = %self, "Market error");
            }
        }
    }
}

impl IntoResponse for MarketError {
    fn into_response(self) -> Response {
        self.log();
        self.to_app_error().into_response()
    }
}

impl From<Denial> for MarketError {
    fn from(denial: Denial) -> Self {
        match denial {
            Denial::Unauthenticated => MarketError::Unauthenticated,
            Denial::Forbidden => MarketError::Forbidden,
        }
    }
}

impl From<AppError> for MarketError {
    fn from(err: AppError) -> Self {
        match err.kind() {
            ErrorKind::BadRequest => MarketError::Validation(err.message().to_string()),
            _ => MarketError::Internal(err.to_string()),
        }
    }
}
