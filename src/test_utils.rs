use anyhow::Result;
use chrono::{DateTime, TimeZone, Utc};
use fake::Fake;
use fake::faker::internet::en::{SafeEmail, Username};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;
use tempfile::NamedTempFile;

use crate::database::models::{Contract, ContractInput, User};
use crate::database::repositories::{ContractRepository, UserRepository};

/// Test database wrapper that provides isolated testing environment
pub struct TestDb {
    pub pool: SqlitePool,
    _temp_file: NamedTempFile,
}

impl TestDb {
    /// Create a new test database with fresh schema
    pub async fn new() -> Result<Self> {
        let temp_file = NamedTempFile::new()?;
        let database_url = format!("sqlite:{}", temp_file.path().display());

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(&database_url)
            .await?;

        // Run migrations
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(TestDb {
            pool,
            _temp_file: temp_file,
        })
    }
}

pub async fn create_test_user(pool: &SqlitePool) -> User {
    let username: String = Username().fake();
    let email: String = SafeEmail().fake();
    // Keep usernames unique across calls within one database
    let username = format!("{}_{}", username.replace(' ', "_"), uuid::Uuid::new_v4().simple());

    UserRepository::new(pool.clone())
        .create_user(&username, &email, "not-a-real-hash")
        .await
        .expect("Failed to insert test user")
}

pub async fn create_test_contract(pool: &SqlitePool, employee_id: i64, department: &str) -> Contract {
    let input = ContractInput {
        department: department.to_string(),
        department_short: None,
        hours: "20:00".to_string(),
        contact: None,
    }
    .clean()
    .expect("valid contract input");

    ContractRepository::new(pool.clone())
        .create_contract(employee_id, input)
        .await
        .expect("Failed to insert test contract")
}

pub fn at(day: u32, hour: u32, minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, day, hour, minute, 0).unwrap()
}
