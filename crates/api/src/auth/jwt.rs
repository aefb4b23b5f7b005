//! JWT access tokens and opaque refresh tokens.
//!
//! Access tokens are short-lived HS256 JWTs carrying the user id, role and
//! (for staff) the unit the user is scoped to. Refresh tokens are opaque
//! random strings; only their SHA-256 hash is stored in the sessions table,
//! so a database leak does not expose usable tokens.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use kiss_core::types::DbId;
use rand::distr::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::error::{AppError, AppResult};

/// Length of the opaque refresh token string.
const REFRESH_TOKEN_LENGTH: usize = 64;

/// JWT settings loaded from the environment.
///
/// | Variable | Default | Notes |
/// |---|---|---|
/// | `JWT_SECRET` | (required) | HS256 signing key |
/// | `JWT_ACCESS_TTL_SECS` | `900` | access token lifetime |
/// | `JWT_REFRESH_TTL_SECS` | `604800` | refresh token lifetime (7 days) |
#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub access_ttl_secs: i64,
    pub refresh_ttl_secs: i64,
}

impl JwtConfig {
    pub fn from_env() -> Result<Self, String> {
        let secret = std::env::var("JWT_SECRET")
            .map_err(|_| "JWT_SECRET must be set".to_string())?;
        if secret.len() < 32 {
            return Err("JWT_SECRET must be at least 32 bytes".to_string());
        }
        let access_ttl_secs = std::env::var("JWT_ACCESS_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(900);
        let refresh_ttl_secs = std::env::var("JWT_REFRESH_TTL_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(604_800);
        Ok(Self {
            secret,
            access_ttl_secs,
            refresh_ttl_secs,
        })
    }
}

/// Claims embedded in an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id.
    pub sub: DbId,
    /// Role name (`superadmin`, `admin`, `staff`).
    pub role: String,
    /// Unit the user is scoped to, present only for staff.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_id: Option<DbId>,
    pub exp: i64,
    pub iat: i64,
}

/// Issue a signed access token for the given user.
pub fn generate_access_token(
    config: &JwtConfig,
    user_id: DbId,
    role: &str,
    unit_id: Option<DbId>,
) -> AppResult<String> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        role: role.to_string(),
        unit_id,
        exp: (now + Duration::seconds(config.access_ttl_secs)).timestamp(),
        iat: now.timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(config.secret.as_bytes()),
    )
    .map_err(|e| AppError::InternalError(format!("failed to sign token: {e}")))
}

/// Validate an access token and return its claims.
pub fn validate_token(config: &JwtConfig, token: &str) -> AppResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|_| AppError::Core(kiss_core::error::CoreError::Unauthorized("invalid or expired token".into())))
}

/// Mint a new refresh token. Returns the plaintext (sent to the client once)
/// and its SHA-256 hash (stored in the sessions table).
pub fn generate_refresh_token() -> (String, String) {
    let token: String = rand::rng()
        .sample_iter(&Alphanumeric)
        .take(REFRESH_TOKEN_LENGTH)
        .map(char::from)
        .collect();
    let hash = hash_refresh_token(&token);
    (token, hash)
}

/// Hash a refresh token for storage or lookup.
pub fn hash_refresh_token(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    format!("{digest:x}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> JwtConfig {
        JwtConfig {
            secret: "test-secret-that-is-long-enough-0123".into(),
            access_ttl_secs: 900,
            refresh_ttl_secs: 604_800,
        }
    }

    #[test]
    fn round_trips_claims() {
        let config = test_config();
        let token = generate_access_token(&config, 42, "staff", Some(7)).unwrap();
        let claims = validate_token(&config, &token).unwrap();
        assert_eq!(claims.sub, 42);
        assert_eq!(claims.role, "staff");
        assert_eq!(claims.unit_id, Some(7));
    }

    #[test]
    fn admin_claims_omit_unit() {
        let config = test_config();
        let token = generate_access_token(&config, 1, "admin", None).unwrap();
        let claims = validate_token(&config, &token).unwrap();
        assert_eq!(claims.unit_id, None);
    }

    #[test]
    fn rejects_token_signed_with_other_secret() {
        let config = test_config();
        let other = JwtConfig {
            secret: "another-secret-that-is-long-enough!!".into(),
            ..test_config()
        };
        let token = generate_access_token(&other, 1, "admin", None).unwrap();
        assert!(validate_token(&config, &token).is_err());
    }

    #[test]
    fn rejects_expired_token() {
        // well past the default 60-second validation leeway
        let config = JwtConfig {
            access_ttl_secs: -300,
            ..test_config()
        };
        let token = generate_access_token(&config, 1, "admin", None).unwrap();
        assert!(validate_token(&config, &token).is_err());
    }

    #[test]
    fn refresh_token_hash_is_stable() {
        let (token, hash) = generate_refresh_token();
        assert_eq!(token.len(), REFRESH_TOKEN_LENGTH);
        assert_eq!(hash, hash_refresh_token(&token));
        assert_ne!(token, hash);
    }
}
