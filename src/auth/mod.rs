//! Authentication and authorization building blocks.
//!
//! - `token`: issuing and validating signed, time-bounded bearer tokens
//! - `password`: salted one-way credential hashing and verification
//! - `policy`: per-route authorization policies evaluated against claims

pub mod password;
pub mod policy;
pub mod token;
