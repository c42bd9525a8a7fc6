//! Environment-backed configuration.

use anyhow::Context;

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub jwt_secret: String,
    /// Base URL of the frontend, used when building email links.
    pub app_url: String,
    pub nats_url: Option<String>,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            database_url: std::env::var("DATABASE_URL").context("DATABASE_URL is required")?,
            port: std::env::var("PORT")
                .ok()
                .map(|p| p.parse())
                .transpose()
                .context("PORT must be a number")?
                .unwrap_or(8080),
            jwt_secret: std::env::var("JWT_SECRET").context("JWT_SECRET is required")?,
            app_url: std::env::var("APP_URL").unwrap_or_else(|_| "http://localhost:5173".to_string()),
            nats_url: std::env::var("NATS_URL").ok(),
        })
    }
}
