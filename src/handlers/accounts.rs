//! Account management HTTP handlers.
//!
//! - `POST /login` — exchange account number + password for a bearer token
//! - `GET /accounts` (admin) — list all accounts
//! - `POST /account` (admin) — create an account
//! - `DELETE /account/{id}` (admin) — delete an account by surrogate id
//! - `GET /account` (self-or-admin) — fetch one account by number

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use serde_json::{Value, json};

use crate::{
    auth::{password, policy::AuthPolicy, token::Claims},
    error::AppError,
    models::account::{
        Account, AccountResponse, ActsOnAccount, CreateAccountRequest, GetAccountRequest,
        LoginRequest, LoginResponse,
    },
    services::account_service,
    state::AppState,
};

/// Exchange credentials for a signed token.
///
/// Every failure — unknown account number, wrong password — collapses into
/// the same generic 400 so callers cannot probe which accounts exist.
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    let account = account_service::find_by_number(&state.pool, request.number)
        .await
        .map_err(|_| AppError::AuthenticationFailed)?
        .ok_or(AppError::AuthenticationFailed)?;

    if !password::verify(&account.encrypted_password, &request.password) {
        return Err(AppError::AuthenticationFailed);
    }

    let token = state.tokens.issue(&account);

    Ok(Json(LoginResponse {
        number: account.number,
        token,
    }))
}

/// List every account, newest first. Admin scope only.
pub async fn list_accounts(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<AccountResponse>>, AppError> {
    AuthPolicy::RequireAdmin.authorize(&claims, None)?;

    let accounts = sqlx::query_as::<_, Account>(
        r#"
        SELECT id, first_name, last_name, number, encrypted_password, balance, role, created_at
        FROM account
        ORDER BY created_at DESC
        "#,
    )
    .fetch_all(&state.pool)
    .await?;

    let responses: Vec<AccountResponse> = accounts.into_iter().map(Into::into).collect();

    Ok(Json(responses))
}

/// Create an account. Admin scope only.
///
/// `role` defaults to `"user"` and must be one of the two known roles.
pub async fn create_account(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<CreateAccountRequest>,
) -> Result<Json<AccountResponse>, AppError> {
    AuthPolicy::RequireAdmin.authorize(&claims, None)?;

    if request.role != "user" && request.role != "admin" {
        return Err(AppError::Validation(format!(
            "unknown role: {}",
            request.role
        )));
    }

    let account = account_service::create_account(&state.pool, request).await?;
    tracing::info!(number = account.number, "account created");

    Ok(Json(account.into()))
}

/// Delete an account by surrogate id. Admin scope only.
pub async fn delete_account(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<i64>,
) -> Result<Json<Value>, AppError> {
    AuthPolicy::RequireAdmin.authorize(&claims, None)?;

    let result = sqlx::query("DELETE FROM account WHERE id = $1")
        .bind(id)
        .execute(&state.pool)
        .await?;

    if result.rows_affected() == 0 {
        return Err(AppError::AccountNotFound);
    }

    Ok(Json(json!({ "deleted": id })))
}

/// Fetch one account by number. Users may only fetch their own; admins any.
pub async fn get_account(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<GetAccountRequest>,
) -> Result<Json<AccountResponse>, AppError> {
    AuthPolicy::RequireSelfOrAdmin.authorize(&claims, Some(request.account_number()))?;

    let account = account_service::find_by_number(&state.pool, request.number)
        .await?
        .ok_or(AppError::AccountNotFound)?;

    Ok(Json(account.into()))
}
