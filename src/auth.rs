//! Bearer token verification.
//!
//! Accounts and login live in an external identity service that signs
//! HS256 JWTs with a shared secret. This module only verifies them and
//! exposes the `sub` claim as the owning user id. `issue_token` exists
//! for operator tooling and tests.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Owning user id.
    pub sub: String,
    pub iat: u64,
    pub exp: u64,
}

#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Token expired")]
    Expired,
    #[error("Invalid token: {0}")]
    Invalid(String),
    #[error("Token has no subject")]
    MissingSubject,
    #[error("Failed to sign token: {0}")]
    Signing(String),
    #[error("System clock error: {0}")]
    Clock(String),
}

/// Signing and verification keys derived from one shared secret.
#[derive(Clone)]
pub struct AuthKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl std::fmt::Debug for AuthKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AuthKeys(..)")
    }
}

impl AuthKeys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }

    /// Random per-process secret. Tokens signed elsewhere will not verify.
    pub fn ephemeral() -> Self {
        use base64::Engine;
        let bytes: [u8; 32] = rand::random();
        let secret = base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(bytes);
        Self::from_secret(secret.as_bytes())
    }
}

fn now_secs() -> Result<u64, AuthError> {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .map_err(|e| AuthError::Clock(e.to_string()))
}

/// Sign a token for `user_id` valid for `ttl_secs`.
pub fn issue_token(keys: &AuthKeys, user_id: &str, ttl_secs: u64) -> Result<String, AuthError> {
    let now = now_secs()?;
    let claims = Claims {
        sub: user_id.to_string(),
        iat: now,
        exp: now + ttl_secs,
    };
    encode(&Header::new(Algorithm::HS256), &claims, &keys.encoding)
        .map_err(|e| AuthError::Signing(e.to_string()))
}

/// Verify signature and expiry; return the claims.
pub fn verify_token(keys: &AuthKeys, token: &str) -> Result<Claims, AuthError> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;

    let data = decode::<Claims>(token, &keys.decoding, &validation).map_err(|e| {
        match e.kind() {
            jsonwebtoken::errors::ErrorKind::ExpiredSignature => AuthError::Expired,
            _ => AuthError::Invalid(e.to_string()),
        }
    })?;

    if data.claims.sub.trim().is_empty() {
        return Err(AuthError::MissingSubject);
    }
    Ok(data.claims)
}
