//! Bearer-token authentication middleware.
//!
//! Runs in front of every protected route:
//! 1. Extract the token from the `x-jwt-token` header
//! 2. Verify signature and expiry against the server secret
//! 3. Insert the decoded, typed `Claims` into request extensions
//! 4. Short-circuit with 401/403 on failure
//!
//! The middleware is stateless — nothing is retained between requests and no
//! store lookup is needed, so it scales horizontally. Per-route scope
//! decisions (admin vs. self) happen in the handlers via `AuthPolicy`, which
//! reads the claims this middleware deposited.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::{auth::token::TOKEN_HEADER, error::AppError, state::AppState};

/// Validate the request's bearer token and attach its claims.
///
/// # Errors
///
/// - `Unauthenticated` (401): header missing, signature invalid, or expired
/// - `Forbidden` (403): well-signed token with undecodable claim fields
pub async fn require_token(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(TOKEN_HEADER)
        .and_then(|h| h.to_str().ok())
        .ok_or(AppError::Unauthenticated)?;

    let claims = state.tokens.validate(token)?;

    // Handlers extract this with Extension<Claims>
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}
