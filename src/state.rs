//! Shared application state injected into handlers and middleware.

use crate::{auth::token::TokenSigner, db::DbPool, retry::RetryPolicy};

/// Everything a request handler needs: the connection pool, the token
/// signer, and the retry policy injected into the transfer engine.
///
/// Cloned per request by axum; all members are cheap handles.
#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub tokens: TokenSigner,
    pub retry: RetryPolicy,
}
