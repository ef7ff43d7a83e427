#![allow(dead_code)]

use actix_web::{body::MessageBody, dev::ServiceResponse, http::header, test};
use serde_json::{json, Value};
use taskkeeper::{config::Config, db, AppState};

pub const TEST_SECRET: &str = "integration-test-secret";

/// Fresh state over a private in-memory database.
pub async fn test_state() -> AppState {
    let pool = db::connect_in_memory()
        .await
        .expect("Failed to open in-memory database");
    let config = Config::from_vars(|key| match key {
        "JWT_SECRET" => Some(TEST_SECRET.to_string()),
        "BCRYPT_COST" => Some("4".to_string()),
        _ => None,
    })
    .expect("Test configuration is valid");
    AppState::new(pool, &config)
}

/// Builds the full application around `$state`, the way `main` does.
macro_rules! spawn_app {
    ($state:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($state))
                .wrap(taskkeeper::auth::AuthMiddleware)
                .wrap(actix_web::middleware::Logger::default())
                .configure(taskkeeper::routes::config),
        )
        .await
    };
}

pub fn bearer(token: &str) -> (header::HeaderName, String) {
    (header::AUTHORIZATION, format!("Bearer {}", token))
}

pub async fn register(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    username: &str,
    password: &str,
) -> Value {
    let req = test::TestRequest::post()
        .uri("/auth/register")
        .set_json(json!({ "username": username, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 201, "registration of {} failed", username);
    test::read_body_json(resp).await
}

pub async fn login(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    username: &str,
    password: &str,
) -> String {
    let req = test::TestRequest::post()
        .uri("/auth/login")
        .set_json(json!({ "username": username, "password": password }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 200, "login of {} failed", username);
    let body: Value = test::read_body_json(resp).await;
    body["access_token"]
        .as_str()
        .expect("access_token is a string")
        .to_string()
}

/// Registers `username` and returns a bearer token for it.
pub async fn signup_and_login(
    app: &impl actix_web::dev::Service<
        actix_http::Request,
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
    >,
    username: &str,
    password: &str,
) -> String {
    register(app, username, password).await;
    login(app, username, password).await
}
