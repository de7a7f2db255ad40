//! Account creation and lookup.

use crate::{
    auth::password,
    db::DbPool,
    error::AppError,
    models::account::{Account, CreateAccountRequest},
};

/// How many random account numbers to try before giving up on a collision
/// streak.
const NUMBER_ALLOCATION_ATTEMPTS: u32 = 5;

const ACCOUNT_COLUMNS: &str =
    "id, first_name, last_name, number, encrypted_password, balance, role, created_at";

/// Create an account: hash the password, allocate a unique account number,
/// insert the row.
///
/// Account numbers are drawn at random from an 8-digit range. A draw that
/// collides with an existing row trips the unique constraint and is simply
/// re-drawn, up to a small bound.
///
/// # Errors
///
/// - `Validation`: opening balance is negative
/// - `Database`: insert failed, or the number space produced repeated
///   collisions
pub async fn create_account(
    pool: &DbPool,
    request: CreateAccountRequest,
) -> Result<Account, AppError> {
    if request.balance < 0 {
        return Err(AppError::Validation(
            "opening balance cannot be negative".to_string(),
        ));
    }

    let encrypted_password = password::hash(&request.password)?;

    let mut last_err: Option<sqlx::Error> = None;
    for _ in 0..NUMBER_ALLOCATION_ATTEMPTS {
        let number: i64 = rand::random_range(10_000_000..100_000_000);

        let inserted = sqlx::query_as::<_, Account>(&format!(
            r#"
            INSERT INTO account (first_name, last_name, number, encrypted_password, balance, role)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {ACCOUNT_COLUMNS}
            "#
        ))
        .bind(&request.first_name)
        .bind(&request.last_name)
        .bind(number)
        .bind(&encrypted_password)
        .bind(request.balance)
        .bind(&request.role)
        .fetch_one(pool)
        .await;

        match inserted {
            Ok(account) => return Ok(account),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                tracing::debug!(number, "account number collision, redrawing");
                last_err = Some(sqlx::Error::Database(db));
            }
            Err(err) => return Err(err.into()),
        }
    }

    Err(last_err
        .map(AppError::from)
        .unwrap_or_else(|| AppError::Internal("account number allocation failed".to_string())))
}

/// Point lookup by caller-facing account number.
pub async fn find_by_number(pool: &DbPool, number: i64) -> Result<Option<Account>, AppError> {
    let account = sqlx::query_as::<_, Account>(&format!(
        "SELECT {ACCOUNT_COLUMNS} FROM account WHERE number = $1"
    ))
    .bind(number)
    .fetch_optional(pool)
    .await?;

    Ok(account)
}
