use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;

/// Insecure fallback signing secret, kept for parity with local setups.
/// Production deployments must set SECRET_KEY.
pub const DEFAULT_SECRET_KEY: &str = "secretKey";

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_url: String,
    pub secret_key: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let port = match env::var("PORT") {
            Ok(raw) => raw
                .parse()
                .map_err(|e| Error::Config(format!("Invalid value for PORT: {}", e)))?,
            Err(_) => 3000,
        };

        let secret_key =
            env::var("SECRET_KEY").unwrap_or_else(|_| DEFAULT_SECRET_KEY.to_string());
        if secret_key == DEFAULT_SECRET_KEY {
            tracing::warn!("SECRET_KEY is not set; using the insecure default signing secret");
        }

        Ok(Self {
            port,
            database_url: get_env("DATABASE_URL")?,
            secret_key,
        })
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}
