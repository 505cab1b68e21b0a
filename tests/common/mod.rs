#![allow(dead_code, unused_macros)]

use actix_web::web;
use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use sqlx::SqlitePool;
use std::env;
use tempfile::TempDir;

use clock::config::Config;
use clock::database::init_database;
use clock::database::models::{AuthResponse, CreateUserInput};
use clock::database::repositories::{ContractRepository, ShiftRepository, UserRepository};
use clock::{AppState, AuthService, ShiftService};

/// Build a test service with the full route table and the data of a `TestContext`.
macro_rules! init_app {
    ($ctx:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data($ctx.app_state.clone())
                .app_data($ctx.contract_repo.clone())
                .app_data($ctx.shift_repo.clone())
                .app_data($ctx.config_data.clone())
                .wrap(clock::middleware::RequestIdMiddleware)
                .configure(clock::routes::configure),
        )
        .await
    };
}

pub struct TestContext {
    pub pool: SqlitePool,
    pub config: Config,
    pub app_state: web::Data<AppState>,
    pub contract_repo: web::Data<ContractRepository>,
    pub shift_repo: web::Data<ShiftRepository>,
    pub config_data: web::Data<Config>,
    _temp_dir: TempDir,
}

impl TestContext {
    pub async fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let database_url = format!("sqlite:{}/test.db", temp_dir.path().display());

        let config = Config {
            database_url: database_url.clone(),
            ..Config::test_config()
        };

        let pool = init_database(&database_url).await?;

        let user_repository = UserRepository::new(pool.clone());
        let contract_repository = ContractRepository::new(pool.clone());
        let shift_repository = ShiftRepository::new(pool.clone());
        let auth_service = AuthService::new(user_repository, config.clone());
        let shift_service =
            ShiftService::new(shift_repository.clone(), contract_repository.clone());

        Ok(TestContext {
            pool,
            config: config.clone(),
            app_state: web::Data::new(AppState {
                auth_service,
                shift_service,
            }),
            contract_repo: web::Data::new(contract_repository),
            shift_repo: web::Data::new(shift_repository),
            config_data: web::Data::new(config),
            _temp_dir: temp_dir,
        })
    }

    /// Register a user through the auth service and return the response with its token.
    pub async fn register(&self, username: &str) -> AuthResponse {
        self.app_state
            .auth_service
            .register(CreateUserInput {
                username: username.to_string(),
                email: format!("{}@example.com", username),
                password: "password123".to_string(),
            })
            .await
            .expect("Failed to register test user")
    }
}

pub fn auth_header(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

/// Unwrap the `data` of a successful `ApiResponse` body.
pub fn success_data(body: &Value) -> &Value {
    assert_eq!(
        body["success"],
        Value::Bool(true),
        "Expected successful response but got: {}",
        body
    );
    &body["data"]
}

pub fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, hour, minute, 0)
        .single()
        .expect("valid test timestamp")
}

pub fn setup_test_env() {
    unsafe {
        env::set_var("RUST_LOG", "debug");
    }
    let _ = env_logger::builder().is_test(true).try_init();
}
