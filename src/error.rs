//! Error types and HTTP error response handling.
//!
//! One application-wide error enum; each variant maps to an HTTP status code
//! and a JSON body of the form `{"error": "<message>"}`.
//!
//! # Error Categories
//!
//! - **Authorization errors**: missing/invalid tokens, insufficient scope
//! - **Business-rule errors**: unknown accounts, insufficient funds
//! - **Validation errors**: malformed or rejected request payloads
//! - **Store/operational errors**: database faults, exhausted retries,
//!   missing configuration

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Application-wide error type.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// No token, or a token whose signature or expiry failed verification.
    ///
    /// Returns HTTP 401 Unauthorized.
    #[error("authentication required")]
    Unauthenticated,

    /// A valid token that lacks the required scope, or that references an
    /// account the caller is not authorized to act on.
    ///
    /// Returns HTTP 403 Forbidden.
    #[error("permission denied")]
    Forbidden,

    /// Login failed. Deliberately generic: unknown account and wrong
    /// password produce the same message so accounts cannot be enumerated.
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("could not authenticate")]
    AuthenticationFailed,

    /// Request payload was rejected (non-positive amount, self-transfer,
    /// unknown role value, ...).
    ///
    /// Returns HTTP 400 Bad Request.
    #[error("{0}")]
    Validation(String),

    /// Referenced account does not exist.
    ///
    /// Returns HTTP 404 Not Found.
    #[error("account not found")]
    AccountNotFound,

    /// Source account balance does not cover the requested amount.
    ///
    /// Returns HTTP 422 Unprocessable Entity.
    #[error("insufficient funds")]
    InsufficientFunds,

    /// The transfer engine exhausted its retries or exceeded its deadline.
    /// The string carries the last underlying cause.
    ///
    /// Returns HTTP 500 Internal Server Error.
    #[error("transfer failed: {0}")]
    TransferFailed(String),

    /// Required configuration (e.g. the signing secret) is missing.
    ///
    /// Returns HTTP 500 Internal Server Error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database operation failed. Transient store faults (serialization
    /// conflicts, connection errors) are retried inside the transfer engine
    /// and never surface individually; anything reaching a response through
    /// this variant is terminal.
    ///
    /// Returns HTTP 500 Internal Server Error.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Unexpected internal fault (e.g. password hashing failure).
    ///
    /// Returns HTTP 500 Internal Server Error.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Convert AppError into an HTTP response.
///
/// 500-class variants log the detail and return a generic body; internals
/// never leak to clients.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Unauthenticated => (StatusCode::UNAUTHORIZED, self.to_string()),
            AppError::Forbidden => (StatusCode::FORBIDDEN, self.to_string()),
            AppError::AuthenticationFailed => (StatusCode::BAD_REQUEST, self.to_string()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::AccountNotFound => (StatusCode::NOT_FOUND, self.to_string()),
            AppError::InsufficientFunds => (StatusCode::UNPROCESSABLE_ENTITY, self.to_string()),
            AppError::TransferFailed(_)
            | AppError::Config(_)
            | AppError::Database(_)
            | AppError::Internal(_) => {
                tracing::error!("request failed: {self}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "an internal error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({ "error": message }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn authorization_errors_map_to_401_and_403() {
        assert_eq!(
            AppError::Unauthenticated.into_response().status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::Forbidden.into_response().status(),
            StatusCode::FORBIDDEN
        );
    }

    #[test]
    fn login_failure_is_a_generic_400() {
        let resp = AppError::AuthenticationFailed.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn business_rule_errors_keep_their_statuses() {
        assert_eq!(
            AppError::AccountNotFound.into_response().status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AppError::InsufficientFunds.into_response().status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn internal_errors_do_not_leak_detail() {
        let resp = AppError::TransferFailed("pool timed out".into()).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
