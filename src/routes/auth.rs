use crate::{
    auth::{AuthenticatedUser, LoginRequest, RegisterRequest, TokenResponse},
    error::AppError,
    models::UserProfile,
    state::AppState,
};
use actix_web::{get, post, web, HttpResponse, Responder};

/// Register a new user
///
/// Creates an account and returns its public profile. A taken username is
/// answered with `409 Conflict`.
#[post("/register")]
pub async fn register(
    state: web::Data<AppState>,
    register_data: web::Json<RegisterRequest>,
) -> Result<impl Responder, AppError> {
    let user = state
        .identity
        .register(&register_data.username, &register_data.password)
        .await?;

    Ok(HttpResponse::Created().json(UserProfile::from(&user)))
}

/// Login user
///
/// Exchanges a username and password for a bearer token. Unknown usernames
/// and wrong passwords get the same `401` response.
#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    login_data: web::Json<LoginRequest>,
) -> Result<impl Responder, AppError> {
    let token = state
        .identity
        .login(&login_data.username, &login_data.password)
        .await?;

    Ok(HttpResponse::Ok().json(TokenResponse::bearer(token)))
}

/// Current user
///
/// Returns the `{id, username}` of the identity the bearer token resolves to.
#[get("/me")]
pub async fn me(user: AuthenticatedUser) -> impl Responder {
    HttpResponse::Ok().json(UserProfile::from(&user.0))
}
