pub mod extractors;
pub mod middleware;
pub mod password;
pub mod resolver;
pub mod token;

use serde::{Deserialize, Serialize};
use validator::Validate;

// Re-export necessary items
pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use password::CredentialManager;
pub use resolver::IdentityResolver;
pub use token::{Claims, TokenManager};

/// Represents the payload for a login request.
///
/// Not validated beyond deserialization: any malformed credential simply
/// fails to authenticate.
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Desired username; between 3 and 100 characters.
    #[validate(length(min = 3, max = 100))]
    pub username: String,
    /// Password for the new account; at least 6 characters.
    /// Only its first 72 bytes are significant.
    #[validate(length(min = 6))]
    pub password: String,
}

/// Response returned by a successful login.
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    /// The signed bearer token.
    pub access_token: String,
    /// Always `"bearer"`.
    pub token_type: String,
}

impl TokenResponse {
    pub fn bearer(access_token: String) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_register_request_validation() {
        let valid_register = RegisterRequest {
            username: "alice".to_string(),
            password: "pw123456".to_string(),
        };
        assert!(valid_register.validate().is_ok());

        let short_username_register = RegisterRequest {
            username: "al".to_string(),
            password: "pw123456".to_string(),
        };
        assert!(short_username_register.validate().is_err());

        let long_username_register = RegisterRequest {
            username: "a".repeat(101),
            password: "pw123456".to_string(),
        };
        assert!(long_username_register.validate().is_err());

        let short_password_register = RegisterRequest {
            username: "alice".to_string(),
            password: "123".to_string(),
        };
        assert!(short_password_register.validate().is_err());
    }

    #[test]
    fn test_token_response_shape() {
        let json = serde_json::to_value(TokenResponse::bearer("abc".into())).unwrap();
        assert_eq!(json["access_token"], "abc");
        assert_eq!(json["token_type"], "bearer");
    }
}
