// SPDX-License-Identifier: MIT

//! Application configuration loaded from environment variables.

use std::env;

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server port
    pub port: u16,
    /// Frontend URL for post-login redirects and CORS
    pub frontend_url: String,
    /// SQLite database URL; when unset the in-memory store is used
    pub database_url: Option<String>,

    // --- OIDC provider ---
    /// Authorization endpoint of the OIDC provider
    pub oidc_auth_url: String,
    /// Token endpoint of the OIDC provider
    pub oidc_token_url: String,
    /// OIDC client ID (public)
    pub oidc_client_id: String,
    /// OIDC client secret
    pub oidc_client_secret: String,

    // --- Secrets ---
    /// JWT signing key for session tokens (raw bytes)
    pub jwt_signing_key: Vec<u8>,
    /// HMAC key for signing the OAuth `state` parameter
    pub oauth_state_key: Vec<u8>,

    /// OpenAI API key; when unset the assistant always uses the fallback responder
    pub openai_api_key: Option<String>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let jwt_signing_key = env::var("JWT_SIGNING_KEY")
            .map_err(|_| ConfigError::Missing("JWT_SIGNING_KEY"))?
            .into_bytes();

        Ok(Self {
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()
                .unwrap_or(8080),
            frontend_url: env::var("FRONTEND_URL")
                .unwrap_or_else(|_| "http://localhost:5173".to_string()),
            database_url: env::var("DATABASE_URL").ok(),

            oidc_auth_url: env::var("OIDC_AUTH_URL")
                .map_err(|_| ConfigError::Missing("OIDC_AUTH_URL"))?,
            oidc_token_url: env::var("OIDC_TOKEN_URL")
                .map_err(|_| ConfigError::Missing("OIDC_TOKEN_URL"))?,
            oidc_client_id: env::var("OIDC_CLIENT_ID")
                .map_err(|_| ConfigError::Missing("OIDC_CLIENT_ID"))?,
            oidc_client_secret: env::var("OIDC_CLIENT_SECRET")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("OIDC_CLIENT_SECRET"))?,

            // The state key falls back to the JWT key so a minimal deployment
            // only has to manage one secret.
            oauth_state_key: env::var("OAUTH_STATE_KEY")
                .map(String::into_bytes)
                .unwrap_or_else(|_| jwt_signing_key.clone()),
            jwt_signing_key,

            openai_api_key: env::var("OPENAI_API_KEY").ok(),
        })
    }

    /// Default config for tests only.
    pub fn test_default() -> Self {
        Self {
            port: 8080,
            frontend_url: "http://localhost:5173".to_string(),
            database_url: None,
            oidc_auth_url: "https://auth.example.com/authorize".to_string(),
            oidc_token_url: "https://auth.example.com/token".to_string(),
            oidc_client_id: "test_client_id".to_string(),
            oidc_client_secret: "test_secret".to_string(),
            jwt_signing_key: b"test_jwt_key_32_bytes_minimum!!".to_vec(),
            oauth_state_key: b"test_state_key_32_bytes_minimum".to_vec(),
            openai_api_key: None,
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("OIDC_AUTH_URL", "https://auth.test/authorize");
        env::set_var("OIDC_TOKEN_URL", "https://auth.test/token");
        env::set_var("OIDC_CLIENT_ID", "test_id");
        env::set_var("OIDC_CLIENT_SECRET", "test_secret");
        env::set_var("JWT_SIGNING_KEY", "test_jwt_key_32_bytes_minimum!!");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.oidc_client_id, "test_id");
        assert_eq!(config.oidc_client_secret, "test_secret");
        assert_eq!(config.port, 8080);
        // State key defaults to the JWT key when unset
        assert_eq!(config.oauth_state_key, config.jwt_signing_key);
    }
}
