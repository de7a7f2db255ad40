//! Data models representing database entities and API payloads.

/// Account entity plus request/response types
pub mod account;
