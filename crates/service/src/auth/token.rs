use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::ServiceError;

/// Signed payload: subject is the user identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// HS256 signing and verification with a server-held secret.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl TokenKeys {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            ttl,
        }
    }

    pub fn from_config(cfg: &configs::AuthConfig) -> Self {
        Self::new(&cfg.jwt_secret, Duration::hours(cfg.token_ttl_hours))
    }

    pub fn ttl(&self) -> Duration { self.ttl }

    pub fn issue(&self, user_id: Uuid) -> Result<String, ServiceError> {
        self.issue_at(user_id, Utc::now())
    }

    pub fn issue_at(&self, user_id: Uuid, issued_at: DateTime<Utc>) -> Result<String, ServiceError> {
        let claims = Claims {
            sub: user_id.to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + self.ttl).timestamp(),
        };
        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| ServiceError::internal(format!("token error: {e}")))
    }

    /// Check signature and expiry and return the identity claim.
    pub fn verify(&self, token: &str) -> Result<Uuid, ServiceError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);
        let data = decode::<Claims>(token, &self.decoding, &validation).map_err(|e| {
            tracing::debug!(error = %e, "token rejected");
            ServiceError::unauthorized("invalid token")
        })?;
        Uuid::parse_str(&data.claims.sub).map_err(|_| ServiceError::unauthorized("invalid token"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys() -> TokenKeys { TokenKeys::new("test-secret", Duration::hours(72)) }

    #[test]
    fn issued_token_round_trips_identity() {
        let id = Uuid::new_v4();
        let token = keys().issue(id).unwrap();
        assert_eq!(keys().verify(&token).unwrap(), id);
    }

    #[test]
    fn expiry_is_issue_time_plus_ttl() {
        let now = Utc::now();
        let token = keys().issue_at(Uuid::new_v4(), now).unwrap();
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        let data = decode::<Claims>(&token, &DecodingKey::from_secret(b"test-secret"), &validation).unwrap();
        assert_eq!(data.claims.exp - data.claims.iat, 72 * 3600);
    }

    #[test]
    fn expired_token_is_unauthorized() {
        let token = keys().issue_at(Uuid::new_v4(), Utc::now() - Duration::hours(100)).unwrap();
        let err = keys().verify(&token).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Unauthorized);
    }

    #[test]
    fn foreign_signature_is_unauthorized() {
        let other = TokenKeys::new("other-secret", Duration::hours(1));
        let token = other.issue(Uuid::new_v4()).unwrap();
        assert!(keys().verify(&token).is_err());
    }

    #[test]
    fn garbage_is_unauthorized() {
        assert!(keys().verify("not.a.jwt").is_err());
        assert!(keys().verify("").is_err());
    }
}
