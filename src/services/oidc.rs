// SPDX-License-Identifier: MIT

//! OIDC authorization-code flow against an external identity provider.
//!
//! The provider owns the login UI and credential handling; this client
//! builds the authorization redirect and exchanges the returned code for
//! an ID token whose claims seed our user profile.

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::config::Config;
use crate::error::{AppError, Result};

const OIDC_SCOPES: &str = "openid email profile";

/// Claims we consume from the provider's ID token.
#[derive(Debug, Clone, Deserialize)]
pub struct IdClaims {
    /// Stable subject identifier, used as our user ID
    pub sub: String,
    pub email: Option<String>,
    pub given_name: Option<String>,
    pub family_name: Option<String>,
    pub picture: Option<String>,
    pub exp: usize,
}

#[derive(Deserialize)]
struct TokenResponse {
    id_token: String,
}

/// Client for the configured OIDC provider.
#[derive(Clone)]
pub struct OidcClient {
    auth_url: String,
    token_url: String,
    client_id: String,
    client_secret: String,
    http: reqwest::Client,
}

impl OidcClient {
    pub fn new(config: &Config) -> Self {
        Self {
            auth_url: config.oidc_auth_url.clone(),
            token_url: config.oidc_token_url.clone(),
            client_id: config.oidc_client_id.clone(),
            client_secret: config.oidc_client_secret.clone(),
            http: reqwest::Client::new(),
        }
    }

    /// Build the provider authorization URL for the login redirect.
    pub fn authorization_url(&self, callback_url: &str, state: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&response_type=code&scope={}&state={}",
            self.auth_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(callback_url),
            urlencoding::encode(OIDC_SCOPES),
            state,
        )
    }

    /// Exchange an authorization code for the user's identity claims.
    pub async fn exchange_code(&self, code: &str, callback_url: &str) -> Result<IdClaims> {
        let response = self
            .http
            .post(&self.token_url)
            .form(&[
                ("grant_type", "authorization_code"),
                ("code", code),
                ("client_id", &self.client_id),
                ("client_secret", &self.client_secret),
                ("redirect_uri", callback_url),
            ])
            .send()
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Token exchange failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, body = %body, "Token endpoint rejected the code");
            return Err(AppError::InvalidToken);
        }

        let tokens: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid token response: {}", e)))?;

        decode_id_token(&tokens.id_token)
    }
}

/// Decode the claims of an ID token received directly from the token
/// endpoint. The token arrived over TLS from the provider itself, so the
/// signature is not re-verified here.
fn decode_id_token(id_token: &str) -> Result<IdClaims> {
    let mut validation = Validation::new(Algorithm::RS256);
    validation.insecure_disable_signature_validation();
    validation.validate_aud = false;

    let token_data = decode::<IdClaims>(id_token, &DecodingKey::from_secret(&[]), &validation)
        .map_err(|e| {
            tracing::warn!(error = %e, "Failed to decode ID token");
            AppError::InvalidToken
        })?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde::Serialize;

    #[derive(Serialize)]
    struct TestClaims {
        sub: String,
        email: String,
        given_name: String,
        exp: usize,
    }

    fn make_id_token() -> String {
        let claims = TestClaims {
            sub: "user-123".to_string(),
            email: "zen@example.com".to_string(),
            given_name: "Zen".to_string(),
            exp: 4_102_444_800, // far future
        };
        encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"irrelevant"),
        )
        .unwrap()
    }

    #[test]
    fn test_decode_id_token_claims() {
        let claims = decode_id_token(&make_id_token()).unwrap();
        assert_eq!(claims.sub, "user-123");
        assert_eq!(claims.email.as_deref(), Some("zen@example.com"));
        assert_eq!(claims.given_name.as_deref(), Some("Zen"));
        assert!(claims.family_name.is_none());
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_id_token("not-a-jwt"),
            Err(AppError::InvalidToken)
        ));
    }

    #[test]
    fn test_authorization_url_encodes_callback() {
        let client = OidcClient::new(&Config::test_default());
        let url = client.authorization_url("http://localhost:8080/auth/callback", "abc123");
        assert!(url.starts_with("https://auth.example.com/authorize?"));
        assert!(url.contains("redirect_uri=http%3A%2F%2Flocalhost%3A8080%2Fauth%2Fcallback"));
        assert!(url.contains("state=abc123"));
    }
}
