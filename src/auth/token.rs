use crate::error::AppError;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

/// The only algorithm tokens are signed with or accepted under.
pub const TOKEN_ALGORITHM: Algorithm = Algorithm::HS256;

/// Represents the claims encoded within a JWT (JSON Web Token).
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject of the token: the username it was issued to.
    pub sub: String,
    /// Expiration timestamp (seconds since epoch).
    pub exp: u64,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: u64,
}

/// Issues and validates HS256 bearer tokens.
///
/// The signing secret is handed in once at construction; nothing here reads
/// the environment.
#[derive(Clone)]
pub struct TokenManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl TokenManager {
    pub fn new(secret: &str, ttl: Duration) -> Self {
        let mut validation = Validation::new(TOKEN_ALGORITHM);
        // Expiry is absolute.
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        }
    }

    /// Issues a token for `subject` that expires after the configured ttl.
    pub fn issue(&self, subject: &str) -> Result<String, AppError> {
        self.issue_with_ttl(subject, self.ttl)
    }

    /// Issues a token for `subject` expiring `ttl` from now.
    ///
    /// # Returns
    /// Returns `AppError::InternalServerError` if the timestamps cannot be
    /// represented or if token encoding fails.
    pub fn issue_with_ttl(&self, subject: &str, ttl: Duration) -> Result<String, AppError> {
        let now = Utc::now();
        let expiration = now
            .checked_add_signed(ttl)
            .ok_or_else(|| AppError::InternalServerError("Token expiry out of range".into()))?;

        let claims = Claims {
            sub: subject.to_string(),
            exp: to_epoch_seconds(expiration.timestamp())?,
            iat: to_epoch_seconds(now.timestamp())?,
        };

        encode(&Header::new(TOKEN_ALGORITHM), &claims, &self.encoding_key)
            .map_err(|e| AppError::InternalServerError(format!("Failed to generate token: {}", e)))
    }

    /// Verifies signature, algorithm and expiry and returns the token's subject.
    ///
    /// A token is valid only while `now < exp`. Every failure, including a
    /// missing or empty subject, is an `AppError::InvalidToken`.
    pub fn validate(&self, token: &str) -> Result<String, AppError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation)?;
        // jsonwebtoken still accepts the second where `exp == now`.
        if i64::try_from(data.claims.exp).map_or(false, |exp| exp <= Utc::now().timestamp()) {
            return Err(AppError::InvalidToken("ExpiredSignature".into()));
        }
        if data.claims.sub.is_empty() {
            return Err(AppError::InvalidToken("Token subject is empty".into()));
        }
        Ok(data.claims.sub)
    }
}

fn to_epoch_seconds(timestamp: i64) -> Result<u64, AppError> {
    u64::try_from(timestamp)
        .map_err(|_| AppError::InternalServerError("Timestamp before epoch".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const SECRET: &str = "test_secret_for_tokens";

    fn manager() -> TokenManager {
        TokenManager::new(SECRET, Duration::hours(24))
    }

    fn expect_invalid(result: Result<String, AppError>) -> String {
        match result {
            Err(AppError::InvalidToken(msg)) => msg,
            Ok(subject) => panic!("Token should have been rejected, got subject {}", subject),
            Err(e) => panic!("Unexpected error type: {:?}", e),
        }
    }

    #[test]
    fn test_token_generation_and_verification() {
        let tokens = manager();
        let token = tokens.issue("alice").unwrap();
        assert_eq!(tokens.validate(&token).unwrap(), "alice");
    }

    #[test]
    fn test_token_valid_before_ttl_elapses() {
        let tokens = manager();
        let token = tokens.issue_with_ttl("alice", Duration::seconds(30)).unwrap();
        assert_eq!(tokens.validate(&token).unwrap(), "alice");
    }

    #[test]
    fn test_token_expiration() {
        let tokens = manager();
        let expired = tokens.issue_with_ttl("alice", Duration::hours(-2)).unwrap();
        let msg = expect_invalid(tokens.validate(&expired));
        assert!(msg.contains("ExpiredSignature"), "unexpected message: {}", msg);
    }

    #[test]
    fn test_token_with_zero_ttl_is_expired() {
        let tokens = manager();
        let token = tokens.issue_with_ttl("alice", Duration::zero()).unwrap();
        let msg = expect_invalid(tokens.validate(&token));
        assert!(msg.contains("ExpiredSignature"), "unexpected message: {}", msg);
    }

    #[test]
    fn test_token_expiring_this_second_is_rejected() {
        let exp = Utc::now().timestamp() as u64;
        let claims = Claims {
            sub: "alice".to_string(),
            exp,
            iat: exp - 60,
        };
        let token = encode(
            &Header::new(TOKEN_ALGORITHM),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        expect_invalid(manager().validate(&token));
    }

    #[test]
    fn test_invalid_token_signature() {
        let other = TokenManager::new("a_completely_different_secret", Duration::hours(1));
        let token = other.issue("alice").unwrap();
        let msg = expect_invalid(manager().validate(&token));
        assert!(msg.contains("InvalidSignature"), "unexpected message: {}", msg);
    }

    #[test]
    fn test_algorithm_mismatch_is_rejected() {
        let claims = Claims {
            sub: "alice".to_string(),
            exp: (Utc::now().timestamp() + 3600) as u64,
            iat: Utc::now().timestamp() as u64,
        };
        let token = encode(
            &Header::new(Algorithm::HS512),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        expect_invalid(manager().validate(&token));
    }

    #[test]
    fn test_missing_subject_is_rejected() {
        let claims = json!({ "exp": Utc::now().timestamp() + 3600 });
        let token = encode(
            &Header::new(TOKEN_ALGORITHM),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap();
        expect_invalid(manager().validate(&token));
    }

    #[test]
    fn test_empty_subject_is_rejected() {
        let token = manager().issue("").unwrap();
        expect_invalid(manager().validate(&token));
    }

    #[test]
    fn test_garbage_is_rejected() {
        expect_invalid(manager().validate("not-a-token"));
        expect_invalid(manager().validate(""));
    }
}
