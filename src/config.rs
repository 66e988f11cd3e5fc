use std::time::Duration;

use crate::catalog::ProviderKind;
use crate::error::{AppError, Result};

const DEFAULT_BIND_ADDR: &str = "127.0.0.1:8080";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct Config {
    pub provider: ProviderKind,
    pub deezer_rapidapi_key: String,
    pub spotify_client_id: String,
    pub spotify_client_secret: String,
    pub pushover_token: Option<String>,
    pub pushover_user: Option<String>,
    pub bind_addr: String,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let provider = match std::env::var("CATALOG_PROVIDER") {
            Ok(value) => value.parse()?,
            Err(_) => ProviderKind::Deezer,
        };

        let http_timeout_secs = match std::env::var("HTTP_TIMEOUT_SECS") {
            Ok(value) => value.trim().parse::<u64>().map_err(|_| {
                AppError::Config(format!("HTTP_TIMEOUT_SECS is not a number: {}", value))
            })?,
            Err(_) => DEFAULT_HTTP_TIMEOUT_SECS,
        };

        Ok(Self {
            provider,
            deezer_rapidapi_key: std::env::var("X_RAPIDAPI_KEY_DEEZER").unwrap_or_default(),
            spotify_client_id: std::env::var("SPOTIFY_CLIENT_ID").unwrap_or_default(),
            spotify_client_secret: std::env::var("SPOTIFY_CLIENT_SECRET").unwrap_or_default(),
            pushover_token: non_empty_var("PUSHOVER_TOKEN"),
            pushover_user: non_empty_var("PUSHOVER_USER"),
            bind_addr: std::env::var("BIND_ADDR")
                .unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            http_timeout: Duration::from_secs(http_timeout_secs),
        })
    }

    /// Settings the selected provider needs but does not have.
    pub fn get_missing_config(&self) -> Vec<String> {
        let mut missing = Vec::new();

        if self.provider == ProviderKind::Spotify {
            if self.spotify_client_id.is_empty() {
                missing.push("SPOTIFY_CLIENT_ID".to_string());
            }
            if self.spotify_client_secret.is_empty() {
                missing.push("SPOTIFY_CLIENT_SECRET".to_string());
            }
        }

        missing
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
impl Config {
    pub fn mock(provider: ProviderKind) -> Self {
        Self {
            provider,
            deezer_rapidapi_key: String::new(),
            spotify_client_id: String::new(),
            spotify_client_secret: String::new(),
            pushover_token: None,
            pushover_user: None,
            bind_addr: DEFAULT_BIND_ADDR.to_string(),
            http_timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}
