//! Access and refresh tokens.
//!
//! Access tokens are short-lived HS256 JWTs. Refresh tokens are random
//! alphanumeric strings; `core_session` only stores their SHA-256 digest.

use chrono::{DateTime, Duration, Utc};
use hyperion_core::types::DbId;
use hyperion_core::users::generate_token;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

use crate::config::env_parse;

/// Length of the opaque refresh tokens.
pub const REFRESH_TOKEN_LENGTH: usize = 48;

/// Payload of an access token. Permissions come from group memberships,
/// looked up per request, so no role travels in the token.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub sub: DbId,
    pub exp: i64,
    pub iat: i64,
    pub jti: String,
}

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_token_expiry_mins: i64,
    pub refresh_token_expiry_days: i64,
}

impl JwtConfig {
    /// | Env var                   | Default |
    /// |---------------------------|---------|
    /// | `JWT_SECRET`              | required |
    /// | `JWT_ACCESS_EXPIRY_MINS`  | `15`    |
    /// | `JWT_REFRESH_EXPIRY_DAYS` | `7`     |
    ///
    /// # Panics
    ///
    /// Panics if `JWT_SECRET` is unset or empty.
    pub fn from_env() -> Self {
        let secret = std::env::var("JWT_SECRET").unwrap_or_default();
        assert!(!secret.is_empty(), "JWT_SECRET must be set and not empty");

        Self {
            secret,
            access_token_expiry_mins: env_parse("JWT_ACCESS_EXPIRY_MINS", 15),
            refresh_token_expiry_days: env_parse("JWT_REFRESH_EXPIRY_DAYS", 7),
        }
    }

    pub fn access_ttl(&self) -> Duration {
        Duration::minutes(self.access_token_expiry_mins)
    }

    pub fn refresh_ttl(&self) -> Duration {
        Duration::days(self.refresh_token_expiry_days)
    }
}

/// Tokens handed to a client at login or refresh, plus what the session
/// row needs.
#[derive(Debug, Clone)]
pub struct IssuedTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub refresh_token_hash: String,
    pub refresh_expires_at: DateTime<Utc>,
}

/// Issue an access token and a fresh refresh token for `user_id`.
pub fn issue_tokens(
    user_id: DbId,
    config: &JwtConfig,
) -> Result<IssuedTokens, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let access_token = encode_access_token(user_id, config, now)?;
    let refresh_token = generate_token(REFRESH_TOKEN_LENGTH);

    Ok(IssuedTokens {
        access_token,
        refresh_token_hash: refresh_token_digest(&refresh_token),
        refresh_token,
        refresh_expires_at: now + config.refresh_ttl(),
    })
}

/// Sign an access token for `user_id` issued at `now`.
pub fn encode_access_token(
    user_id: DbId,
    config: &JwtConfig,
    now: DateTime<Utc>,
) -> Result<String, jsonwebtoken::errors::Error> {
    let claims = Claims {
        sub: user_id,
        exp: (now + config.access_ttl()).timestamp(),
        iat: now.timestamp(),
        jti: Uuid::new_v4().to_string(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
}

/// Verify signature and expiry of an access token.
pub fn decode_access_token(
    token: &str,
    config: &JwtConfig,
) -> Result<Claims, jsonwebtoken::errors::Error> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
}

/// Hex SHA-256 digest under which a refresh token is stored.
pub fn refresh_token_digest(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(secret: &str) -> JwtConfig {
        JwtConfig {
            secret: secret.to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        }
    }

    #[test]
    fn issued_access_token_decodes_to_user() {
        let config = config("hyperion-test-secret");
        let user_id = Uuid::new_v4();

        let tokens = issue_tokens(user_id, &config).unwrap();
        let claims = decode_access_token(&tokens.access_token, &config).unwrap();

        assert_eq!(claims.sub, user_id);
        assert_eq!(claims.exp - claims.iat, 15 * 60);
    }

    #[test]
    fn refresh_token_is_stored_as_digest() {
        let tokens = issue_tokens(Uuid::new_v4(), &config("s")).unwrap();

        assert_eq!(tokens.refresh_token.len(), REFRESH_TOKEN_LENGTH);
        assert_eq!(tokens.refresh_token_hash, refresh_token_digest(&tokens.refresh_token));
        assert_eq!(tokens.refresh_token_hash.len(), 64);
        assert!(tokens.refresh_expires_at > Utc::now() + Duration::days(6));
    }

    #[test]
    fn expired_token_is_rejected() {
        let config = config("hyperion-test-secret");
        // Beyond the 60 s default leeway.
        let issued = Utc::now() - Duration::hours(1);
        let token = encode_access_token(Uuid::new_v4(), &config, issued).unwrap();

        assert!(decode_access_token(&token, &config).is_err());
    }

    #[test]
    fn foreign_signature_is_rejected() {
        let token = encode_access_token(Uuid::new_v4(), &config("alpha"), Utc::now()).unwrap();
        assert!(decode_access_token(&token, &config("bravo")).is_err());
    }
}
