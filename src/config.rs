//! Application configuration management.
//!
//! Configuration comes from environment variables, deserialized into a
//! type-safe struct by the `envy` crate. A `.env` file is loaded first if
//! present.

use serde::Deserialize;

/// Application configuration loaded from environment variables.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (required): PostgreSQL connection string
/// - `JWT_SECRET` (required): symmetric secret used to sign and verify tokens
/// - `SERVER_PORT` (optional): HTTP server port, defaults to 3000
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,

    /// Signing secret for bearer tokens. Supplied out-of-band; a missing or
    /// empty secret is a startup configuration error, not a request error.
    pub jwt_secret: String,

    #[serde(default = "default_port")]
    pub server_port: u16,
}

/// Default port if SERVER_PORT is not set.
fn default_port() -> u16 {
    3000
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns an error if a required variable is missing or a value cannot
    /// be parsed into the expected type.
    pub fn from_env() -> Result<Self, envy::Error> {
        // Try to load .env file if it exists (does nothing if not found)
        dotenvy::dotenv().ok();

        envy::from_env::<Config>()
    }
}
