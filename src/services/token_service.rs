use std::fmt;

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::errors::internal::TokenError;
use crate::errors::InternalError;
use crate::types::internal::auth::Claims;

/// Validates bearer tokens issued for this service
///
/// Tokens are HS256 JWTs whose `sub` is the identity provider's subject identifier.
pub struct TokenService {
    jwt_secret: String,
}

impl TokenService {
    pub fn new(jwt_secret: String) -> Self {
        Self { jwt_secret }
    }

    /// Validate a JWT and return the claims
    pub fn validate_jwt(&self, token: &str) -> Result<Claims, InternalError> {
        let validation = Validation::new(Algorithm::HS256);

        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_bytes()),
            &validation,
        )
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid { reason: e.to_string() },
        })?;

        Ok(token_data.claims)
    }

    /// Sign a token for `claims`; used by the CLI to mint development tokens
    pub fn issue_jwt(&self, claims: &Claims) -> Result<String, InternalError> {
        encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| InternalError::from(TokenError::Invalid { reason: e.to_string() }))
    }

    /// Claims for `subject_id` valid for `ttl_seconds` from now
    pub fn claims_for(subject_id: &str, username: Option<&str>, ttl_seconds: i64) -> Claims {
        let now = Utc::now().timestamp();
        Claims {
            sub: subject_id.to_string(),
            exp: now + ttl_seconds,
            iat: now,
            preferred_username: username.map(str::to_string),
            email: None,
            given_name: None,
            family_name: None,
        }
    }
}

impl fmt::Debug for TokenService {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenService")
            .field("jwt_secret", &"<redacted>")
            .finish()
    }
}
