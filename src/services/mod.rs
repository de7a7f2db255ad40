//! Business logic services.
//!
//! Services hold the store-facing logic that is more than a single query:
//! account creation with number allocation, and the retried atomic transfer.

pub mod account_service;
pub mod transfer_service;
