//! HTTP middleware components.

/// Bearer-token validation middleware
pub mod auth;
