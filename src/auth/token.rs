//! Bearer token issuing and validation.
//!
//! Tokens are three URL-safe base64 segments, `header.claims.signature`,
//! signed with HMAC-SHA256 over the first two segments. The header pins the
//! algorithm; validation rejects anything other than `HS256` before looking
//! at the signature, so a token cannot talk the server into a different
//! scheme.
//!
//! Claims are stateless: created at login or account creation, decoded on
//! every request, never persisted server-side.

use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::{Deserialize, Serialize};
use sha2::Sha256;

use crate::{error::AppError, models::account::Account};

type HmacSha256 = Hmac<Sha256>;

/// Token lifetime from issue to expiry.
const TOKEN_TTL_HOURS: i64 = 24;

/// Header carrying the bearer token on every protected request.
pub const TOKEN_HEADER: &str = "x-jwt-token";

/// Role carried in token claims and account rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    /// Map a stored role string to a role, defaulting unknown values to the
    /// least-privileged role.
    pub fn from_db(role: &str) -> Self {
        match role {
            "admin" => Role::Admin,
            _ => Role::User,
        }
    }
}

/// Decoded token payload: the caller's identity, scope, and expiry.
///
/// Inserted into request extensions by the auth middleware and consumed by
/// the per-route policy gate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Claims {
    pub account_number: i64,
    pub role: Role,
    /// Expiry as unix seconds
    pub expires_at: i64,
}

#[derive(Debug, Serialize, Deserialize)]
struct Header {
    alg: String,
    typ: String,
}

/// Why a token was rejected.
///
/// Structural, signature, and expiry failures all mean the caller is not
/// authenticated; a well-signed token whose claim fields cannot be decoded
/// is treated as a scope problem instead.
#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    #[error("invalid token")]
    Invalid,

    #[error("token expired")]
    Expired,

    #[error("malformed claims")]
    MalformedClaims,
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Invalid | TokenError::Expired => AppError::Unauthenticated,
            TokenError::MalformedClaims => AppError::Forbidden,
        }
    }
}

/// Issues and validates tokens with a server-held symmetric secret.
#[derive(Clone)]
pub struct TokenSigner {
    secret: String,
}

impl TokenSigner {
    /// Build a signer from the configured secret.
    ///
    /// # Errors
    ///
    /// An empty secret is a configuration error; refusing to start beats
    /// silently signing tokens anyone can forge.
    pub fn new(secret: &str) -> Result<Self, AppError> {
        if secret.is_empty() {
            return Err(AppError::Config("JWT_SECRET is not set".to_string()));
        }

        Ok(Self {
            secret: secret.to_string(),
        })
    }

    /// Issue a token for an account, expiring 24 hours from now.
    pub fn issue(&self, account: &Account) -> String {
        self.issue_with_expiry(
            account.number,
            Role::from_db(&account.role),
            Utc::now().timestamp() + TOKEN_TTL_HOURS * 3600,
        )
    }

    /// Issue a token with an explicit expiry timestamp.
    pub(crate) fn issue_with_expiry(&self, account_number: i64, role: Role, expires_at: i64) -> String {
        let header = Header {
            alg: "HS256".to_string(),
            typ: "JWT".to_string(),
        };
        let claims = Claims {
            account_number,
            role,
            expires_at,
        };

        // Serializing plain structs with derived impls cannot fail
        let header_b64 = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&header).unwrap_or_default());
        let claims_b64 = URL_SAFE_NO_PAD.encode(serde_json::to_vec(&claims).unwrap_or_default());

        let signing_input = format!("{header_b64}.{claims_b64}");
        let signature = URL_SAFE_NO_PAD.encode(self.mac(&signing_input));

        format!("{signing_input}.{signature}")
    }

    /// Verify a token and return its claims.
    ///
    /// Checks, in order: segment structure, pinned algorithm, signature
    /// (constant-time), expiry, claim decoding.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        let mut segments = token.split('.');
        let (Some(header_b64), Some(claims_b64), Some(signature_b64), None) = (
            segments.next(),
            segments.next(),
            segments.next(),
            segments.next(),
        ) else {
            return Err(TokenError::Invalid);
        };

        let header_bytes = URL_SAFE_NO_PAD
            .decode(header_b64)
            .map_err(|_| TokenError::Invalid)?;
        let header: Header =
            serde_json::from_slice(&header_bytes).map_err(|_| TokenError::Invalid)?;
        if header.alg != "HS256" {
            return Err(TokenError::Invalid);
        }

        let signature = URL_SAFE_NO_PAD
            .decode(signature_b64)
            .map_err(|_| TokenError::Invalid)?;
        let signing_input = format!("{header_b64}.{claims_b64}");
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(signing_input.as_bytes());
        mac.verify_slice(&signature)
            .map_err(|_| TokenError::Invalid)?;

        let claims_bytes = URL_SAFE_NO_PAD
            .decode(claims_b64)
            .map_err(|_| TokenError::MalformedClaims)?;
        let claims: Claims =
            serde_json::from_slice(&claims_bytes).map_err(|_| TokenError::MalformedClaims)?;

        if claims.expires_at <= Utc::now().timestamp() {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }

    fn mac(&self, input: &str) -> Vec<u8> {
        let mut mac = HmacSha256::new_from_slice(self.secret.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(input.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signer() -> TokenSigner {
        TokenSigner::new("test-secret").unwrap()
    }

    fn future_expiry() -> i64 {
        Utc::now().timestamp() + 3600
    }

    #[test]
    fn empty_secret_is_a_config_error() {
        assert!(matches!(
            TokenSigner::new(""),
            Err(AppError::Config(_))
        ));
    }

    #[test]
    fn issued_token_round_trips_its_claims() {
        let token = signer().issue_with_expiry(9901, Role::User, future_expiry());
        let claims = signer().validate(&token).unwrap();

        assert_eq!(claims.account_number, 9901);
        assert_eq!(claims.role, Role::User);
    }

    #[test]
    fn expired_token_is_rejected_even_with_a_valid_signature() {
        let token = signer().issue_with_expiry(9901, Role::User, Utc::now().timestamp() - 60);

        assert_eq!(signer().validate(&token), Err(TokenError::Expired));
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let token = signer().issue_with_expiry(9901, Role::User, future_expiry());
        let mut parts: Vec<&str> = token.split('.').collect();
        let forged = URL_SAFE_NO_PAD.encode(b"not-the-real-signature");
        parts[2] = &forged;
        let tampered = parts.join(".");

        assert_eq!(signer().validate(&tampered), Err(TokenError::Invalid));
    }

    #[test]
    fn tampered_claims_break_the_signature() {
        let token = signer().issue_with_expiry(9901, Role::User, future_expiry());
        let parts: Vec<&str> = token.split('.').collect();
        let forged_claims = URL_SAFE_NO_PAD.encode(
            serde_json::to_vec(&Claims {
                account_number: 9902,
                role: Role::Admin,
                expires_at: future_expiry(),
            })
            .unwrap(),
        );
        let tampered = format!("{}.{}.{}", parts[0], forged_claims, parts[2]);

        assert_eq!(signer().validate(&tampered), Err(TokenError::Invalid));
    }

    #[test]
    fn unexpected_algorithm_is_rejected_before_the_signature_is_checked() {
        // Correctly signed token that claims the "none" algorithm
        let s = signer();
        let header_b64 = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
        let claims_b64 = URL_SAFE_NO_PAD.encode(
            serde_json::to_vec(&Claims {
                account_number: 9901,
                role: Role::User,
                expires_at: future_expiry(),
            })
            .unwrap(),
        );
        let signing_input = format!("{header_b64}.{claims_b64}");
        let signature = URL_SAFE_NO_PAD.encode(s.mac(&signing_input));
        let token = format!("{signing_input}.{signature}");

        assert_eq!(s.validate(&token), Err(TokenError::Invalid));
    }

    #[test]
    fn garbage_tokens_are_invalid() {
        assert_eq!(signer().validate("garbage"), Err(TokenError::Invalid));
        assert_eq!(signer().validate("a.b"), Err(TokenError::Invalid));
        assert_eq!(signer().validate("a.b.c.d"), Err(TokenError::Invalid));
    }

    #[test]
    fn wrong_secret_cannot_validate() {
        let token = signer().issue_with_expiry(9901, Role::User, future_expiry());
        let other = TokenSigner::new("different-secret").unwrap();

        assert_eq!(other.validate(&token), Err(TokenError::Invalid));
    }
}
