//! Account data model and API request/response types.
//!
//! This module defines:
//! - `Account`: database entity (never serialized to clients directly)
//! - `AccountResponse`: outward representation with the credential stripped
//! - Request bodies for login, account creation, lookup, and transfer
//!
//! # Balance Storage
//!
//! Balances are stored as `i64` in the smallest currency unit (cents) to
//! avoid floating-point precision issues. The database enforces
//! `balance >= 0`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Represents an account row from the `account` table.
///
/// Deliberately does **not** implement `Serialize`: the password hash must
/// never be written to a response. Convert to [`AccountResponse`] before
/// returning an account to a client.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Account {
    /// Surrogate primary key, assigned by the store
    pub id: i64,

    pub first_name: String,

    pub last_name: String,

    /// Caller-facing account number. Unique, immutable after creation.
    pub number: i64,

    /// Argon2 PHC hash of the account password
    pub encrypted_password: String,

    /// Current balance in cents, never negative
    pub balance: i64,

    /// `"user"` or `"admin"`
    pub role: String,

    pub created_at: DateTime<Utc>,
}

/// Response body for account endpoints.
///
/// # JSON Example
///
/// ```json
/// {
///   "id": 1,
///   "firstName": "John",
///   "lastName": "Doe",
///   "number": 99017263,
///   "balance": 1000,
///   "role": "user",
///   "createdAt": "2025-06-01T10:00:00Z"
/// }
/// ```
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub number: i64,
    pub balance: i64,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

/// Convert the database entity to the outward representation, dropping the
/// credential hash.
impl From<Account> for AccountResponse {
    fn from(account: Account) -> Self {
        Self {
            id: account.id,
            first_name: account.first_name,
            last_name: account.last_name,
            number: account.number,
            balance: account.balance,
            role: account.role,
            created_at: account.created_at,
        }
    }
}

/// A request payload that names the account it claims to act on.
///
/// The authorization gate compares this number against the caller's claimed
/// account number (admins are exempt from the match). Implemented by every
/// payload accepted on a self-or-admin route.
pub trait ActsOnAccount {
    fn account_number(&self) -> i64;
}

/// Request body for `POST /login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub number: i64,
    pub password: String,
}

/// Response body for `POST /login`.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub number: i64,
    pub token: String,
}

/// Request body for `POST /account` (admin only).
///
/// `role` defaults to `"user"`; `password` and `balance` default to empty
/// and zero respectively.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub first_name: String,

    pub last_name: String,

    #[serde(default)]
    pub password: String,

    #[serde(default = "default_role")]
    pub role: String,

    /// Opening balance in cents
    #[serde(default)]
    pub balance: i64,
}

fn default_role() -> String {
    "user".to_string()
}

/// Request body for `GET /account`.
#[derive(Debug, Deserialize)]
pub struct GetAccountRequest {
    pub number: i64,
}

impl ActsOnAccount for GetAccountRequest {
    fn account_number(&self) -> i64 {
        self.number
    }
}

/// Request body for `POST /transfer`.
///
/// # JSON Example
///
/// ```json
/// { "from_number": 9901, "to_number": 9902, "amount": 500 }
/// ```
#[derive(Debug, Deserialize)]
pub struct TransferRequest {
    pub from_number: i64,
    pub to_number: i64,

    /// Amount in cents; must be positive
    pub amount: i64,
}

impl ActsOnAccount for TransferRequest {
    fn account_number(&self) -> i64 {
        self.from_number
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_account() -> Account {
        Account {
            id: 1,
            first_name: "John".to_string(),
            last_name: "Doe".to_string(),
            number: 99017263,
            encrypted_password: "$argon2id$v=19$m=19456,t=2,p=1$c2FsdA$hash".to_string(),
            balance: 1000,
            role: "user".to_string(),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn response_omits_the_credential_hash() {
        let value = serde_json::to_value(AccountResponse::from(sample_account())).unwrap();
        let obj = value.as_object().unwrap();

        assert!(obj.contains_key("firstName"));
        assert!(obj.contains_key("balance"));
        assert!(!obj.contains_key("encryptedPassword"));
        assert!(!obj.contains_key("encrypted_password"));
    }

    #[test]
    fn create_request_defaults_role_to_user() {
        let req: CreateAccountRequest =
            serde_json::from_str(r#"{"firstName": "John", "lastName": "Doe"}"#).unwrap();

        assert_eq!(req.role, "user");
        assert_eq!(req.balance, 0);
        assert!(req.password.is_empty());
    }

    #[test]
    fn transfer_request_acts_on_the_source_account() {
        let req: TransferRequest =
            serde_json::from_str(r#"{"from_number": 9901, "to_number": 9902, "amount": 500}"#)
                .unwrap();

        assert_eq!(req.account_number(), 9901);
    }
}
