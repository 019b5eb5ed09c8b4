// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Session tokens: HS256 JWTs naming an identity.
//!
//! Tokens are stateless. There is no revocation list; rotating the signing
//! key invalidates every outstanding token.

use crate::error::AppError;
use crate::time_utils::Clock;
use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Fixed validity window of a session token.
pub const TOKEN_TTL_DAYS: i64 = 30;

/// JWT claims structure.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Claims {
    /// Subject (identity ID)
    pub sub: String,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
}

#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    clock: Arc<dyn Clock>,
}

impl TokenService {
    pub fn new(signing_key: &[u8], clock: Arc<dyn Clock>) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(signing_key),
            decoding_key: DecodingKey::from_secret(signing_key),
            clock,
        }
    }

    /// Create a JWT for an identity, valid for [`TOKEN_TTL_DAYS`].
    pub fn issue(&self, identity_id: &str) -> Result<String, AppError> {
        let now = self.clock.now();

        let claims = Claims {
            sub: identity_id.to_string(),
            iat: now.timestamp(),
            exp: (now + Duration::days(TOKEN_TTL_DAYS)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AppError::Internal(anyhow::anyhow!("JWT creation failed: {}", e)))
    }

    /// Check signature and expiry, returning the claims.
    ///
    /// Expiry is judged against the injected clock, not the library's wall
    /// clock: the token is expired once `now >= exp`.
    pub fn decode(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        let claims = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Rejected session token");
                AppError::InvalidToken
            })?
            .claims;

        if claims.sub.is_empty() {
            return Err(AppError::InvalidToken);
        }

        if self.clock.now().timestamp() >= claims.exp {
            return Err(AppError::TokenExpired);
        }

        Ok(claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time_utils::MockClock;
    use chrono::DateTime;

    const KEY: &[u8] = b"test_signing_key_32_bytes_long!!";

    fn setup() -> (TokenService, Arc<MockClock>) {
        let clock = Arc::new(MockClock::new(
            DateTime::from_timestamp(1_767_225_600, 0).unwrap(),
        ));
        (TokenService::new(KEY, clock.clone()), clock)
    }

    #[test]
    fn test_issue_and_decode() {
        let (tokens, clock) = setup();
        let token = tokens.issue("user-123").unwrap();
        let claims = tokens.decode(&token).unwrap();

        assert_eq!(claims.sub, "user-123");
        assert_eq!(claims.iat, clock.now().timestamp());
        assert_eq!(claims.exp - claims.iat, TOKEN_TTL_DAYS * 24 * 60 * 60);
    }

    #[test]
    fn test_issue_is_deterministic_for_same_instant() {
        let (tokens, _) = setup();
        assert_eq!(tokens.issue("u").unwrap(), tokens.issue("u").unwrap());
    }

    #[test]
    fn test_expiry_boundary() {
        let (tokens, clock) = setup();
        let token = tokens.issue("user-123").unwrap();

        clock.advance(Duration::days(TOKEN_TTL_DAYS) - Duration::seconds(1));
        assert!(tokens.decode(&token).is_ok());

        clock.advance(Duration::seconds(1));
        assert!(matches!(tokens.decode(&token), Err(AppError::TokenExpired)));
    }

    #[test]
    fn test_wrong_key_rejected() {
        let (tokens, clock) = setup();
        let token = tokens.issue("user-123").unwrap();

        let other = TokenService::new(b"another_signing_key_32_bytes_long", clock);
        assert!(matches!(other.decode(&token), Err(AppError::InvalidToken)));
    }

    #[test]
    fn test_tampered_and_malformed_tokens_rejected() {
        let (tokens, _) = setup();
        let token = tokens.issue("user-123").unwrap();
        let other = tokens.issue("admin-1").unwrap();

        // Payload of one token under the signature of another.
        let parts: Vec<&str> = token.split('.').collect();
        let other_parts: Vec<&str> = other.split('.').collect();
        let tampered = format!("{}.{}.{}", parts[0], other_parts[1], parts[2]);

        assert!(matches!(tokens.decode(&tampered), Err(AppError::InvalidToken)));
        assert!(matches!(tokens.decode("not.a.jwt"), Err(AppError::InvalidToken)));
        assert!(matches!(tokens.decode(""), Err(AppError::InvalidToken)));
    }
}
