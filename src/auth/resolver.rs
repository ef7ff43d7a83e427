use crate::{
    auth::{password::CredentialManager, token::TokenManager, RegisterRequest},
    error::AppError,
    models::User,
    repository::UserRepository,
};
use log::{debug, info, warn};
use validator::Validate;

/// Turns presented credentials (a bearer token, or a username and password)
/// into a stored identity.
///
/// Failures are deliberately uninformative: every token problem is
/// `Unauthorized`, every login problem is `InvalidCredentials`.
#[derive(Clone)]
pub struct IdentityResolver {
    users: UserRepository,
    tokens: TokenManager,
    credentials: CredentialManager,
}

impl IdentityResolver {
    pub fn new(users: UserRepository, tokens: TokenManager, credentials: CredentialManager) -> Self {
        Self {
            users,
            tokens,
            credentials,
        }
    }

    /// Resolves the identity a bearer token was issued to.
    ///
    /// An invalid or expired token and a token whose user no longer exists
    /// both fail with `AppError::Unauthorized`.
    pub async fn resolve(&self, token: &str) -> Result<User, AppError> {
        let subject = self.tokens.validate(token).map_err(|e| {
            debug!("Rejected bearer token: {}", e);
            credentials_rejected()
        })?;

        match self.users.find_by_username(&subject).await? {
            Some(user) => Ok(user),
            None => {
                debug!("Token subject '{}' has no matching user", subject);
                Err(credentials_rejected())
            }
        }
    }

    /// Checks a username and password pair.
    ///
    /// Unknown username and wrong password both fail with
    /// `AppError::InvalidCredentials`.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User, AppError> {
        let user = match self.users.find_by_username(username).await? {
            Some(user) => user,
            None => {
                warn!("Failed login attempt");
                return Err(AppError::InvalidCredentials);
            }
        };

        let credentials = self.credentials;
        let plain = password.to_owned();
        let digest = user.password_hash.clone();
        if !run_blocking(move || credentials.verify(&plain, &digest)).await? {
            warn!("Failed login attempt");
            return Err(AppError::InvalidCredentials);
        }

        Ok(user)
    }

    /// Authenticates and mints a token for the identity in one step.
    pub async fn login(&self, username: &str, password: &str) -> Result<String, AppError> {
        let user = self.authenticate(username, password).await?;
        let token = self.tokens.issue(&user.username)?;
        info!("User {} logged in", user.id);
        Ok(token)
    }

    /// Creates a new identity, storing only the digest of `password`.
    ///
    /// Returns `AppError::ValidationError` if the username or password breaks
    /// the length rules, `AppError::Conflict` if the username is taken.
    pub async fn register(&self, username: &str, password: &str) -> Result<User, AppError> {
        let request = RegisterRequest {
            username: username.to_owned(),
            password: password.to_owned(),
        };
        request.validate()?;

        let credentials = self.credentials;
        let plain = request.password;
        let digest = run_blocking(move || credentials.hash(&plain)).await??;

        let user = self.users.create(username, &digest).await?;
        info!("Registered user {}", user.id);
        Ok(user)
    }
}

fn credentials_rejected() -> AppError {
    AppError::Unauthorized("Could not validate credentials".into())
}

/// bcrypt is CPU-bound; keep it off the async workers.
async fn run_blocking<F, T>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::InternalServerError(format!("Blocking task failed: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db;
    use chrono::Duration;

    async fn resolver() -> IdentityResolver {
        let pool = db::connect_in_memory().await.unwrap();
        IdentityResolver::new(
            UserRepository::new(pool),
            TokenManager::new("resolver-test-secret", Duration::hours(1)),
            CredentialManager::new(4),
        )
    }

    #[actix_rt::test]
    async fn test_register_login_and_resolve() {
        let identity = resolver().await;
        let alice = identity.register("alice", "pw123456").await.unwrap();
        assert_ne!(alice.password_hash, "pw123456");

        let token = identity.login("alice", "pw123456").await.unwrap();
        let resolved = identity.resolve(&token).await.unwrap();
        assert_eq!(resolved.id, alice.id);
        assert_eq!(resolved.username, "alice");
    }

    #[actix_rt::test]
    async fn test_bad_username_and_bad_password_are_indistinguishable() {
        let identity = resolver().await;
        identity.register("alice", "pw123456").await.unwrap();

        let wrong_password = identity.authenticate("alice", "not-it").await;
        let unknown_user = identity.authenticate("mallory", "pw123456").await;
        assert!(matches!(wrong_password, Err(AppError::InvalidCredentials)));
        assert!(matches!(unknown_user, Err(AppError::InvalidCredentials)));
    }

    #[actix_rt::test]
    async fn test_token_for_unknown_subject_is_unauthenticated() {
        let identity = resolver().await;
        let token = identity.tokens.issue("ghost").unwrap();
        assert!(matches!(
            identity.resolve(&token).await,
            Err(AppError::Unauthorized(_))
        ));
    }

    #[actix_rt::test]
    async fn test_invalid_and_expired_tokens_are_unauthenticated() {
        let identity = resolver().await;
        identity.register("alice", "pw123456").await.unwrap();

        let expired = identity
            .tokens
            .issue_with_ttl("alice", Duration::minutes(-5))
            .unwrap();
        assert!(matches!(
            identity.resolve(&expired).await,
            Err(AppError::Unauthorized(_))
        ));
        assert!(matches!(
            identity.resolve("garbage").await,
            Err(AppError::Unauthorized(_))
        ));
    }

    #[actix_rt::test]
    async fn test_register_enforces_length_rules() {
        let identity = resolver().await;
        assert!(matches!(
            identity.register("ab", "pw123456").await,
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            identity.register(&"a".repeat(101), "pw123456").await,
            Err(AppError::ValidationError(_))
        ));
        assert!(matches!(
            identity.register("alice", "123").await,
            Err(AppError::ValidationError(_))
        ));
        assert!(identity.authenticate("ab", "pw123456").await.is_err());
    }

    #[actix_rt::test]
    async fn test_duplicate_registration_conflicts() {
        let identity = resolver().await;
        identity.register("alice", "pw123456").await.unwrap();
        assert!(matches!(
            identity.register("alice", "other-password").await,
            Err(AppError::Conflict(_))
        ));
    }
}
