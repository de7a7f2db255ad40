//! Funds transfer HTTP handler.
//!
//! Validation and authorization happen here, at the boundary; the transfer
//! engine only ever sees well-formed, authorized intents.

use axum::{Extension, Json, extract::State};

use crate::{
    auth::{policy::AuthPolicy, token::Claims},
    error::AppError,
    models::account::{AccountResponse, ActsOnAccount, TransferRequest},
    services::transfer_service,
    state::AppState,
};

/// `POST /transfer` — move funds between two accounts.
///
/// Users may only transfer out of their own account; admins out of any.
/// Returns the updated source account as the authoritative post-state.
pub async fn transfer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(request): Json<TransferRequest>,
) -> Result<Json<AccountResponse>, AppError> {
    AuthPolicy::RequireSelfOrAdmin.authorize(&claims, Some(request.account_number()))?;

    validate(&request)?;

    let updated = transfer_service::execute_transfer(
        &state.pool,
        &state.retry,
        request.from_number,
        request.to_number,
        request.amount,
    )
    .await?;

    Ok(Json(updated.into()))
}

/// Reject malformed transfer intents before they reach the engine.
fn validate(request: &TransferRequest) -> Result<(), AppError> {
    if request.amount <= 0 {
        return Err(AppError::Validation("amount must be positive".to_string()));
    }

    if request.from_number == request.to_number {
        return Err(AppError::Validation(
            "cannot transfer to the same account".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(from_number: i64, to_number: i64, amount: i64) -> TransferRequest {
        TransferRequest {
            from_number,
            to_number,
            amount,
        }
    }

    #[test]
    fn positive_amount_between_distinct_accounts_is_valid() {
        assert!(validate(&request(9901, 9902, 500)).is_ok());
    }

    #[test]
    fn zero_and_negative_amounts_are_rejected() {
        assert!(matches!(
            validate(&request(9901, 9902, 0)),
            Err(AppError::Validation(_))
        ));
        assert!(matches!(
            validate(&request(9901, 9902, -5)),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn self_transfer_is_rejected() {
        assert!(matches!(
            validate(&request(9901, 9901, 500)),
            Err(AppError::Validation(_))
        ));
    }
}
