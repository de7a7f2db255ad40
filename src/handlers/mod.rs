//! HTTP request handlers.
//!
//! Each handler extracts its inputs (state, verified claims, JSON body),
//! evaluates its route's authorization policy, and delegates anything
//! non-trivial to a service.

/// Account management and login endpoints
pub mod accounts;
/// Service health endpoint
pub mod health;
/// Funds transfer endpoint
pub mod transfers;
