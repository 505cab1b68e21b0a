use actix_web::{http::StatusCode, test};
use clock::database::models::{CreateUserInput, LoginInput};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

#[macro_use]
mod common;

#[tokio::test]
async fn test_user_registration() {
    common::setup_test_env();
    let ctx = common::TestContext::new().await.unwrap();

    let response = ctx
        .app_state
        .auth_service
        .register(CreateUserInput {
            username: "register.user".to_string(),
            email: "register@example.com".to_string(),
            password: "password123".to_string(),
        })
        .await
        .unwrap();

    assert!(!response.token.is_empty());
    assert_eq!(response.user.username, "register.user");
    assert_eq!(response.user.email, "register@example.com");

    let claims = ctx.app_state.auth_service.verify_token(&response.token).unwrap();
    assert_eq!(claims.sub, response.user.id);
}

#[tokio::test]
async fn test_duplicate_username_registration() {
    common::setup_test_env();
    let ctx = common::TestContext::new().await.unwrap();

    ctx.register("duplicate").await;

    let result = ctx
        .app_state
        .auth_service
        .register(CreateUserInput {
            username: "duplicate".to_string(),
            email: String::new(),
            password: "different_password".to_string(),
        })
        .await;

    assert!(result
        .unwrap_err()
        .to_string()
        .contains("A user with that username already exists."));
}

#[tokio::test]
async fn test_user_login() {
    common::setup_test_env();
    let ctx = common::TestContext::new().await.unwrap();
    let registered = ctx.register("login_user").await;

    let response = ctx
        .app_state
        .auth_service
        .login(LoginInput {
            username: "login_user".to_string(),
            password: "password123".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(response.user.id, registered.user.id);

    let wrong = ctx
        .app_state
        .auth_service
        .login(LoginInput {
            username: "login_user".to_string(),
            password: "wrong_password".to_string(),
        })
        .await;
    assert!(wrong.is_err());
}

#[actix_web::test]
async fn test_register_endpoint_validates_input() {
    common::setup_test_env();
    let ctx = common::TestContext::new().await.unwrap();
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({ "username": "new user!", "password": "password123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["success"], json!(false));
    assert_eq!(body["data"]["field"], json!("username"));

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({ "username": "new_user", "password": "short" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["field"], json!("password"));

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/register")
        .set_json(json!({ "username": "new_user", "password": "password123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(common::success_data(&body)["user"]["username"], json!("new_user"));
}

#[actix_web::test]
async fn test_login_endpoint_rejects_bad_credentials() {
    common::setup_test_env();
    let ctx = common::TestContext::new().await.unwrap();
    ctx.register("alice").await;
    let app = init_app!(ctx);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "username": "alice", "password": "nope-nope" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/api/v1/auth/login")
        .set_json(json!({ "username": "alice", "password": "password123" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn test_me_requires_token() {
    common::setup_test_env();
    let ctx = common::TestContext::new().await.unwrap();
    let auth = ctx.register("me_user").await;
    let app = init_app!(ctx);

    let req = test::TestRequest::get().uri("/api/v1/auth/me").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(common::auth_header("not-a-token"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::get()
        .uri("/api/v1/auth/me")
        .insert_header(common::auth_header(&auth.token))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key("x-correlation-id"));

    let body: Value = test::read_body_json(resp).await;
    let user = common::success_data(&body);
    assert_eq!(user["id"], json!(auth.user.id));
    assert_eq!(user["username"], json!("me_user"));
    assert!(user.get("password_hash").is_none());
}
