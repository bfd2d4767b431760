/// Token service - signing and verifying bearer tokens
use crate::error::{Result, ServerError};
use chrono::{Duration, Utc};
use identity_core::UserId;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// Subject carried by every token this service issues
pub const AUTHORIZED_SUBJECT: &str = "authorized";

#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub iss: String, // Issuer (user ID)
    pub sub: String, // Always "authorized"
    pub jti: String, // Token ID (user ID)
    pub iat: i64,    // Issued at
    pub nbf: i64,    // Not before
    pub exp: i64,    // Expiration time
}

impl TokenService {
    pub fn new(secret: &str, ttl_minutes: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl: Duration::minutes(ttl_minutes as i64),
        }
    }

    /// Sign a token identifying `user_id`
    pub fn issue(&self, user_id: &UserId) -> Result<String> {
        let now = Utc::now();
        let exp = now + self.ttl;

        let claims = Claims {
            iss: user_id.as_str().to_string(),
            sub: AUTHORIZED_SUBJECT.to_string(),
            jti: user_id.as_str().to_string(),
            iat: now.timestamp(),
            nbf: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(ServerError::from)
    }

    /// Verify signature, expiry and not-before, returning the claims
    pub fn verify(&self, token: &str) -> Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_nbf = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "nbf", "iss"]);

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(token_data.claims)
    }

    /// Verify a token and return the identity it was issued to
    pub fn authenticate(&self, token: &str) -> Result<UserId> {
        let claims = self.verify(token)?;
        if claims.iss.is_empty() {
            return Err(ServerError::Unauthorized("Token has no issuer".to_string()));
        }
        Ok(UserId::new(claims.iss))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_creation_and_verification() {
        let tokens = TokenService::new("secret", 60);
        let user_id = UserId::new("user-123");

        let token = tokens.issue(&user_id).unwrap();
        assert_eq!(tokens.authenticate(&token).unwrap(), user_id);
    }

    #[test]
    fn test_claims_shape() {
        let tokens = TokenService::new("secret", 60);
        let token = tokens.issue(&UserId::new("user-123")).unwrap();

        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.iss, "user-123");
        assert_eq!(claims.jti, "user-123");
        assert_eq!(claims.sub, AUTHORIZED_SUBJECT);
        assert_eq!(claims.nbf, claims.iat);
        assert_eq!(claims.exp - claims.iat, 60 * 60);
    }

    #[test]
    fn test_foreign_secret_rejected() {
        let ours = TokenService::new("secret", 60);
        let theirs = TokenService::new("other-secret", 60);

        let token = theirs.issue(&UserId::new("user-123")).unwrap();
        assert!(ours.authenticate(&token).is_err());
    }

    #[test]
    fn test_garbage_rejected() {
        let tokens = TokenService::new("secret", 60);
        assert!(tokens.authenticate("not-a-token").is_err());
        assert!(tokens.authenticate("").is_err());
    }
}
