use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config;

pub mod password;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "orgId", default)]
    pub org_id: String,
    #[serde(default)]
    pub username: String,
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
}

impl Claims {
    pub fn new(org_id: impl Into<String>, username: impl Into<String>) -> Self {
        let now = Utc::now();
        let expiry_hours = config::config().security.jwt_expiry_hours;
        let exp = (now + Duration::hours(expiry_hours as i64)).timestamp();

        Self {
            org_id: org_id.into(),
            username: username.into(),
            exp,
            iat: now.timestamp(),
        }
    }
}

/// Caller identity threaded through every service call.
/// Built once per request from the bearer token; never stored globally.
#[derive(Debug, Clone)]
pub struct TenantContext {
    pub org_id: String,
    pub username: String,
    /// The raw bearer token as presented by the caller
    pub token: String,
}

impl TenantContext {
    pub fn from_claims(claims: Claims, token: impl Into<String>) -> Self {
        Self {
            org_id: claims.org_id,
            username: claims.username,
            token: token.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum JwtError {
    #[error("JWT generation error: {0}")]
    TokenGeneration(String),

    #[error("Invalid JWT token: {0}")]
    InvalidToken(String),

    #[error("JWT secret not configured")]
    InvalidSecret,
}

pub fn generate_jwt(claims: &Claims) -> Result<String, JwtError> {
    generate_jwt_with_secret(claims, &config::config().security.jwt_secret)
}

pub fn generate_jwt_with_secret(claims: &Claims, secret: &str) -> Result<String, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::default(), claims, &encoding_key).map_err(|e| JwtError::TokenGeneration(e.to_string()))
}

/// Validate signature and expiry, returning the decoded claims
pub fn validate_jwt(token: &str) -> Result<Claims, JwtError> {
    validate_jwt_with_secret(token, &config::config().security.jwt_secret)
}

pub fn validate_jwt_with_secret(token: &str, secret: &str) -> Result<Claims, JwtError> {
    if secret.is_empty() {
        return Err(JwtError::InvalidSecret);
    }

    let decoding_key = DecodingKey::from_secret(secret.as_bytes());
    decode::<Claims>(token, &decoding_key, &Validation::default())
        .map(|data| data.claims)
        .map_err(|e| JwtError::InvalidToken(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "unit-test-secret";

    #[test]
    fn round_trips_claims() {
        let claims = Claims::new("org-1", "alice");
        let token = generate_jwt_with_secret(&claims, SECRET).unwrap();
        let decoded = validate_jwt_with_secret(&token, SECRET).unwrap();
        assert_eq!(decoded.org_id, "org-1");
        assert_eq!(decoded.username, "alice");
    }

    #[test]
    fn claims_use_camel_case_org_id() {
        let value = serde_json::to_value(Claims::new("org-1", "alice")).unwrap();
        assert_eq!(value["orgId"], "org-1");
    }

    #[test]
    fn rejects_wrong_secret() {
        let token = generate_jwt_with_secret(&Claims::new("org-1", "alice"), SECRET).unwrap();
        assert!(matches!(
            validate_jwt_with_secret(&token, "other-secret"),
            Err(JwtError::InvalidToken(_))
        ));
    }

    #[test]
    fn rejects_expired_token() {
        let mut claims = Claims::new("org-1", "alice");
        claims.exp = Utc::now().timestamp() - 3600;
        let token = generate_jwt_with_secret(&claims, SECRET).unwrap();
        assert!(validate_jwt_with_secret(&token, SECRET).is_err());
    }

    #[test]
    fn missing_org_claim_decodes_as_empty() {
        #[derive(Serialize)]
        struct Bare {
            username: String,
            exp: i64,
        }
        let bare = Bare {
            username: "alice".to_string(),
            exp: Utc::now().timestamp() + 3600,
        };
        let token = encode(&Header::default(), &bare, &EncodingKey::from_secret(SECRET.as_bytes())).unwrap();
        let claims = validate_jwt_with_secret(&token, SECRET).unwrap();
        assert!(claims.org_id.is_empty());
    }
}
