//! JWT issuing, verification, and logout blacklisting.
//!
//! # Purpose
//! Tokens are HS256 JWTs carrying the user id and email. Logout blacklists
//! the token's digest in the cache for exactly its remaining lifetime, so a
//! blacklist entry never outlives the token it blocks.
//!
//! # Notes
//! The blacklist lives in the cache backend. Per the cache policy, a failing
//! backend is logged and treated as "not blacklisted"; the signature and
//! expiry checks still stand on their own.
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;
use tastytales_cache::{keys, CacheStore};
use thiserror::Error;

use crate::model::User;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token is required")]
    MissingToken,
    #[error("invalid token")]
    InvalidToken,
    #[error("token is blacklisted")]
    Blacklisted,
    #[error("failed to sign token")]
    Signing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: String,
    pub email: String,
    /// Expiry, seconds since the epoch.
    pub exp: i64,
}

pub struct AuthVerifier {
    encoding: EncodingKey,
    decoding: DecodingKey,
    expires_in: Duration,
    cache: Arc<dyn CacheStore>,
}

impl AuthVerifier {
    pub fn new(secret: &str, expires_in: Duration, cache: Arc<dyn CacheStore>) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            expires_in,
            cache,
        }
    }

    /// Issue a token for a freshly authenticated user.
    pub fn mint(&self, user: &User) -> Result<String, AuthError> {
        let claims = Claims {
            sub: user.id.clone(),
            email: user.email.clone(),
            exp: Utc::now().timestamp() + self.expires_in.as_secs() as i64,
        };
        encode(&Header::default(), &claims, &self.encoding).map_err(|_| AuthError::Signing)
    }

    /// Verify a token's signature, expiry, and blacklist status.
    pub async fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        if self.is_blacklisted(token).await {
            return Err(AuthError::Blacklisted);
        }
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)
    }

    pub async fn is_blacklisted(&self, token: &str) -> bool {
        let key = keys::auth_blacklist(&digest(token));
        match self.cache.get(&key).await {
            Ok(entry) => entry.is_some(),
            Err(err) => {
                tracing::warn!(error = %err, "blacklist lookup failed; treating token as live");
                false
            }
        }
    }

    /// Blacklist a token for the remainder of its lifetime.
    ///
    /// The token must at least be well-formed and carry a valid signature;
    /// expiry is not enforced here because an expired token needs no
    /// blacklist entry at all.
    pub async fn blacklist(&self, token: &str) -> Result<(), AuthError> {
        let mut validation = Validation::default();
        validation.validate_exp = false;
        let claims = decode::<Claims>(token, &self.decoding, &validation)
            .map(|data| data.claims)
            .map_err(|_| AuthError::InvalidToken)?;

        let remaining = claims.exp - Utc::now().timestamp();
        if remaining <= 0 {
            return Ok(());
        }

        let key = keys::auth_blacklist(&digest(token));
        if let Err(err) = self
            .cache
            .set(&key, "1", Duration::from_secs(remaining as u64))
            .await
        {
            tracing::warn!(error = %err, "failed to persist token blacklist entry");
        }
        Ok(())
    }
}

fn digest(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}
