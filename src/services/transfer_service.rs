//! Transfer engine: atomic balance movement between two accounts.
//!
//! # Atomicity
//!
//! Both balance updates happen inside one PostgreSQL transaction with the
//! involved rows locked `FOR UPDATE`; no observer ever sees only one side
//! applied. The sufficient-funds check reads the locked balance *inside*
//! that same transaction, so two concurrent transfers cannot both pass the
//! check and overdraw the source account — the loser blocks on the row lock
//! and re-reads the post-commit balance.
//!
//! # Retries
//!
//! The commit is wrapped in the injected [`RetryPolicy`]: transient store
//! faults (serialization conflicts, deadlocks, connection errors) are
//! retried with backoff under a wall-clock deadline; business-rule failures
//! (`InsufficientFunds`, `AccountNotFound`) roll back and propagate on the
//! first attempt.

use crate::{
    db::DbPool,
    error::AppError,
    models::account::Account,
    retry::RetryPolicy,
    services::account_service,
};

/// Move `amount` cents from one account to another and return the updated
/// source account.
///
/// Preconditions (`amount > 0`, distinct account numbers) are enforced by
/// the handler layer; this engine assumes a well-formed intent.
///
/// # Errors
///
/// - `AccountNotFound`: either account number is unknown
/// - `InsufficientFunds`: source balance does not cover `amount`
/// - `TransferFailed`: retries or the deadline were exhausted by transient
///   store faults
pub async fn execute_transfer(
    pool: &DbPool,
    retry: &RetryPolicy,
    from_number: i64,
    to_number: i64,
    amount: i64,
) -> Result<Account, AppError> {
    retry
        .run(|| transfer_once(pool, from_number, to_number, amount))
        .await?;

    tracing::info!(from_number, to_number, amount, "transfer committed");

    // Authoritative post-state: re-fetch rather than trust any pre-commit
    // snapshot, since concurrent transfers may have landed in between.
    account_service::find_by_number(pool, from_number)
        .await?
        .ok_or(AppError::AccountNotFound)
}

/// One attempt: lock, check, mutate, commit.
async fn transfer_once(
    pool: &DbPool,
    from_number: i64,
    to_number: i64,
    amount: i64,
) -> Result<(), AppError> {
    let mut tx = pool.begin().await?;

    // Lock the source row; the balance read below is the authoritative one.
    let from_balance: i64 =
        sqlx::query_scalar("SELECT balance FROM account WHERE number = $1 FOR UPDATE")
            .bind(from_number)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(AppError::AccountNotFound)?;

    if from_balance < amount {
        tx.rollback().await?;
        return Err(AppError::InsufficientFunds);
    }

    // Lock the destination row before touching either balance.
    let to_exists: bool =
        sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM account WHERE number = $1 FOR UPDATE)")
            .bind(to_number)
            .fetch_one(&mut *tx)
            .await?;

    if !to_exists {
        tx.rollback().await?;
        return Err(AppError::AccountNotFound);
    }

    sqlx::query("UPDATE account SET balance = balance - $1 WHERE number = $2")
        .bind(amount)
        .bind(from_number)
        .execute(&mut *tx)
        .await?;

    sqlx::query("UPDATE account SET balance = balance + $1 WHERE number = $2")
        .bind(amount)
        .bind(to_number)
        .execute(&mut *tx)
        .await?;

    // Both updates become visible together or not at all.
    tx.commit().await?;

    Ok(())
}
