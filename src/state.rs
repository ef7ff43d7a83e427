use crate::{
    auth::{CredentialManager, IdentityResolver, TokenManager},
    config::Config,
    repository::{TaskRepository, UserRepository},
};
use sqlx::SqlitePool;

/// Shared application state, handed to handlers through `web::Data`.
#[derive(Clone)]
pub struct AppState {
    pub pool: SqlitePool,
    pub users: UserRepository,
    pub tasks: TaskRepository,
    pub identity: IdentityResolver,
}

impl AppState {
    pub fn new(pool: SqlitePool, config: &Config) -> Self {
        let users = UserRepository::new(pool.clone());
        let identity = IdentityResolver::new(
            users.clone(),
            TokenManager::new(&config.jwt_secret, config.token_ttl()),
            CredentialManager::new(config.bcrypt_cost),
        );
        Self {
            users,
            tasks: TaskRepository::new(pool.clone()),
            identity,
            pool,
        }
    }
}
