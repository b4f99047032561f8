//! Bearer session verification
//!
//! Keys are derived once at startup and shared through `AppState`.

use anyhow::Result;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

const ACCESS_TOKEN_TYPE: &str = "access";

/// Claims carried by a session token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (user ID)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Token type; only "access" tokens open a session
    pub token_type: String,
}

/// Resolves bearer sessions to user ids
#[derive(Clone)]
pub struct UserDirectory {
    encoding: Arc<EncodingKey>,
    decoding: Arc<DecodingKey>,
    access_token_expiry_secs: i64,
}

impl UserDirectory {
    /// Derive keys from the shared secret. Call once at startup.
    pub fn new(secret: &str, access_token_expiry_secs: i64) -> Self {
        Self {
            encoding: Arc::new(EncodingKey::from_secret(secret.as_bytes())),
            decoding: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
            access_token_expiry_secs,
        }
    }

    /// Issue a session token the way the credentials provider does.
    /// Used by operational tooling and tests.
    pub fn issue_session(&self, user_id: Uuid) -> Result<String> {
        let now = Utc::now();
        let claims = SessionClaims {
            sub: user_id.to_string(),
            exp: (now + Duration::seconds(self.access_token_expiry_secs)).timestamp(),
            iat: now.timestamp(),
            token_type: ACCESS_TOKEN_TYPE.to_string(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| anyhow::anyhow!("Failed to issue session token: {}", e))
    }

    /// Validate a bearer token and return the user it belongs to
    pub fn resolve(&self, token: &str) -> Result<Uuid> {
        let claims = decode::<SessionClaims>(token, &self.decoding, &Validation::default())
            .map_err(|e| anyhow::anyhow!("Invalid token: {}", e))?
            .claims;

        if claims.token_type != ACCESS_TOKEN_TYPE {
            return Err(anyhow::anyhow!("Not an access token"));
        }

        Uuid::parse_str(&claims.sub).map_err(|_| anyhow::anyhow!("Invalid user ID in token"))
    }
}
