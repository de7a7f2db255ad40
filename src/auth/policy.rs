//! Per-route authorization policies.
//!
//! Each route declares the scope it requires; one gate function evaluates
//! the caller's verified claims against it. This replaces role checks
//! scattered through middleware with a single decision point.

use crate::{
    auth::token::{Claims, Role},
    error::AppError,
};

/// Scope a route requires before its handler runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthPolicy {
    /// Caller may only act on their own account number.
    RequireSelf,

    /// Caller must hold the admin role; the target account is irrelevant.
    RequireAdmin,

    /// Admins may act on any account; users only on their own.
    RequireSelfOrAdmin,
}

impl AuthPolicy {
    /// Decide allow/deny for a caller acting on an optional target account.
    ///
    /// `target` is the account number the request payload claims to act on;
    /// admin-scoped routes carry none.
    ///
    /// # Errors
    ///
    /// `Forbidden` on any scope or account-number mismatch.
    pub fn authorize(&self, claims: &Claims, target: Option<i64>) -> Result<(), AppError> {
        match self {
            AuthPolicy::RequireAdmin => {
                if claims.role == Role::Admin {
                    Ok(())
                } else {
                    Err(AppError::Forbidden)
                }
            }
            AuthPolicy::RequireSelf => {
                if target == Some(claims.account_number) {
                    Ok(())
                } else {
                    Err(AppError::Forbidden)
                }
            }
            AuthPolicy::RequireSelfOrAdmin => {
                if claims.role == Role::Admin || target == Some(claims.account_number) {
                    Ok(())
                } else {
                    Err(AppError::Forbidden)
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(account_number: i64, role: Role) -> Claims {
        Claims {
            account_number,
            role,
            expires_at: i64::MAX,
        }
    }

    #[test]
    fn user_may_act_on_own_account() {
        let c = claims(9901, Role::User);

        assert!(AuthPolicy::RequireSelf.authorize(&c, Some(9901)).is_ok());
        assert!(AuthPolicy::RequireSelfOrAdmin.authorize(&c, Some(9901)).is_ok());
    }

    #[test]
    fn user_may_not_act_on_a_foreign_account() {
        let c = claims(9901, Role::User);

        assert!(matches!(
            AuthPolicy::RequireSelf.authorize(&c, Some(9902)),
            Err(AppError::Forbidden)
        ));
        assert!(matches!(
            AuthPolicy::RequireSelfOrAdmin.authorize(&c, Some(9902)),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn admin_bypasses_the_account_match() {
        let c = claims(1337, Role::Admin);

        assert!(AuthPolicy::RequireSelfOrAdmin.authorize(&c, Some(9902)).is_ok());
    }

    #[test]
    fn admin_scope_rejects_users_regardless_of_target() {
        let c = claims(9901, Role::User);

        assert!(matches!(
            AuthPolicy::RequireAdmin.authorize(&c, Some(9901)),
            Err(AppError::Forbidden)
        ));
        assert!(matches!(
            AuthPolicy::RequireAdmin.authorize(&c, None),
            Err(AppError::Forbidden)
        ));
    }

    #[test]
    fn admin_scope_accepts_admins_without_a_target() {
        let c = claims(1337, Role::Admin);

        assert!(AuthPolicy::RequireAdmin.authorize(&c, None).is_ok());
    }

    #[test]
    fn missing_target_denies_self_scoped_users() {
        let c = claims(9901, Role::User);

        assert!(matches!(
            AuthPolicy::RequireSelfOrAdmin.authorize(&c, None),
            Err(AppError::Forbidden)
        ));
    }
}
