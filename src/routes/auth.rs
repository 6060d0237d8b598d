// SPDX-License-Identifier: MIT

//! OIDC login routes: redirect to the provider, handle the callback,
//! issue the session cookie.

use axum::{
    extract::{Query, State},
    response::Redirect,
    routing::get,
    Router,
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use chrono::Utc;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use sha2::Sha256;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, SESSION_COOKIE};
use crate::models::User;
use crate::AppState;

type HmacSha256 = Hmac<Sha256>;

/// Maximum age of the OAuth state parameter before it is rejected.
const STATE_MAX_AGE_MILLIS: u128 = 10 * 60 * 1000;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/login", get(auth_start))
        .route("/auth/callback", get(auth_callback))
        .route("/auth/logout", get(logout))
}

/// Query parameters for starting the login flow.
#[derive(Deserialize)]
pub struct AuthStartParams {
    /// Frontend URL to redirect back to after login completes.
    /// If not provided, uses the configured frontend URL.
    #[serde(default)]
    redirect_uri: Option<String>,
}

/// Start the login flow - redirect to the OIDC provider.
async fn auth_start(
    State(state): State<Arc<AppState>>,
    Query(params): Query<AuthStartParams>,
    headers: axum::http::HeaderMap,
) -> Result<Redirect> {
    let frontend_url = params
        .redirect_uri
        .unwrap_or_else(|| state.config.frontend_url.clone());

    let oauth_state = sign_state(&frontend_url, &state.config.oauth_state_key)?;
    let callback_url = callback_url_from_headers(&headers);
    let auth_url = state.oidc.authorization_url(&callback_url, &oauth_state);

    tracing::info!(
        client_id = %state.config.oidc_client_id,
        frontend_url = %frontend_url,
        "Starting login flow, redirecting to OIDC provider"
    );

    Ok(Redirect::temporary(&auth_url))
}

#[derive(Deserialize)]
pub struct CallbackParams {
    #[serde(default)]
    code: Option<String>,
    state: String,
    #[serde(default)]
    error: Option<String>,
}

/// OIDC callback - exchange the code, upsert the user, set the session cookie.
async fn auth_callback(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
    headers: axum::http::HeaderMap,
    Query(params): Query<CallbackParams>,
) -> Result<(CookieJar, Redirect)> {
    // Decode and verify the frontend URL from the state parameter
    let frontend_url = verify_and_decode_state(&params.state, &state.config.oauth_state_key)
        .unwrap_or_else(|| {
            tracing::warn!(
                "Invalid or tampered state parameter, falling back to default frontend URL"
            );
            state.config.frontend_url.clone()
        });

    // Check for provider errors
    if let Some(error) = params.error {
        tracing::warn!(error = %error, "OIDC error from provider");
        let redirect = format!("{}?error={}", frontend_url, urlencoding::encode(&error));
        return Ok((jar, Redirect::temporary(&redirect)));
    }

    let code = params
        .code
        .ok_or_else(|| AppError::BadRequest("Missing authorization code".to_string()))?;

    tracing::info!("Exchanging authorization code for tokens");
    let callback_url = callback_url_from_headers(&headers);
    let claims = state.oidc.exchange_code(&code, &callback_url).await?;

    // Upsert the user profile from the ID token claims
    let now = Utc::now();
    let existing = state.storage.get_user(&claims.sub).await?;
    let user = User {
        id: claims.sub.clone(),
        email: claims.email,
        first_name: claims.given_name,
        last_name: claims.family_name,
        profile_image_url: claims.picture,
        created_at: existing.map_or(now, |u| u.created_at),
        updated_at: now,
    };
    state.storage.upsert_user(&user).await?;

    tracing::info!(user_id = %user.id, "Login successful, user stored");

    let token = create_jwt(&user.id, &state.config.jwt_signing_key)?;
    let cookie = Cookie::build((SESSION_COOKIE, token))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .max_age(time::Duration::days(30))
        .build();

    Ok((jar.add(cookie), Redirect::temporary(&frontend_url)))
}

/// Clear the session cookie.
async fn logout(
    State(state): State<Arc<AppState>>,
    jar: CookieJar,
) -> Result<(CookieJar, Redirect)> {
    let cookie = Cookie::build((SESSION_COOKIE, "")).path("/").build();
    Ok((
        jar.remove(cookie),
        Redirect::temporary(&state.config.frontend_url),
    ))
}

/// Compute our callback URL from the request's Host header.
fn callback_url_from_headers(headers: &axum::http::HeaderMap) -> String {
    let host = headers
        .get(axum::http::header::HOST)
        .and_then(|h| h.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| {
            std::env::var("API_HOST").unwrap_or_else(|_| "localhost:8080".to_string())
        });

    let scheme = if host.contains("localhost") || host.contains("127.0.0.1") {
        "http"
    } else {
        "https"
    };

    format!("{}://{}/auth/callback", scheme, host)
}

/// Sign "frontend_url|timestamp" with HMAC-SHA256 and base64-encode it.
fn sign_state(frontend_url: &str, key: &[u8]) -> Result<String> {
    let timestamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("System time error: {}", e)))?
        .as_millis();

    let payload = format!("{}|{:x}", frontend_url, timestamp);

    let mut mac = HmacSha256::new_from_slice(key)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("HMAC init failed: {}", e)))?;
    mac.update(payload.as_bytes());
    let signature = mac.finalize().into_bytes();

    let signed = format!("{}|{}", payload, hex::encode(signature));
    Ok(URL_SAFE_NO_PAD.encode(signed.as_bytes()))
}

/// Verify a signed state parameter and return the embedded frontend URL.
/// Returns None on any tampering, malformed input, or expiry.
fn verify_and_decode_state(state: &str, key: &[u8]) -> Option<String> {
    let decoded = URL_SAFE_NO_PAD.decode(state).ok()?;
    let decoded = String::from_utf8(decoded).ok()?;

    // "frontend_url|timestamp_hex|signature_hex"; URLs never contain '|'
    let parts: Vec<&str> = decoded.split('|').collect();
    if parts.len() != 3 {
        return None;
    }
    let (frontend_url, timestamp_hex, signature_hex) = (parts[0], parts[1], parts[2]);

    let mut mac = HmacSha256::new_from_slice(key).ok()?;
    mac.update(format!("{}|{}", frontend_url, timestamp_hex).as_bytes());
    let signature = hex::decode(signature_hex).ok()?;
    mac.verify_slice(&signature).ok()?;

    let timestamp = u128::from_str_radix(timestamp_hex, 16).ok()?;
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()?
        .as_millis();
    if now.saturating_sub(timestamp) > STATE_MAX_AGE_MILLIS {
        return None;
    }

    Some(frontend_url.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &[u8] = b"test_state_key_32_bytes_minimum";

    #[test]
    fn test_state_round_trip() {
        let state = sign_state("http://localhost:5173", KEY).unwrap();
        let url = verify_and_decode_state(&state, KEY);
        assert_eq!(url.as_deref(), Some("http://localhost:5173"));
    }

    #[test]
    fn test_state_rejects_tampered_url() {
        let state = sign_state("http://localhost:5173", KEY).unwrap();
        let decoded = String::from_utf8(URL_SAFE_NO_PAD.decode(&state).unwrap()).unwrap();
        let tampered = decoded.replacen("localhost", "evil.example", 1);
        let tampered = URL_SAFE_NO_PAD.encode(tampered.as_bytes());

        assert!(verify_and_decode_state(&tampered, KEY).is_none());
    }

    #[test]
    fn test_state_rejects_wrong_key() {
        let state = sign_state("http://localhost:5173", KEY).unwrap();
        assert!(verify_and_decode_state(&state, b"another_key_entirely_32_bytes!!").is_none());
    }

    #[test]
    fn test_state_rejects_garbage() {
        assert!(verify_and_decode_state("not-base64!", KEY).is_none());
        assert!(verify_and_decode_state("", KEY).is_none());
    }

    #[test]
    fn test_callback_url_scheme_selection() {
        let mut headers = axum::http::HeaderMap::new();
        headers.insert(axum::http::header::HOST, "localhost:8080".parse().unwrap());
        assert_eq!(
            callback_url_from_headers(&headers),
            "http://localhost:8080/auth/callback"
        );

        headers.insert(axum::http::header::HOST, "api.zengym.app".parse().unwrap());
        assert_eq!(
            callback_url_from_headers(&headers),
            "https://api.zengym.app/auth/callback"
        );
    }
}
