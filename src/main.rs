use actix_web::{middleware::Logger, web, App, HttpServer};
use anyhow::Result;

use clock::database::{
    init_database,
    repositories::{ContractRepository, ShiftRepository, UserRepository},
};
use clock::middleware::{build_cors, RequestIdMiddleware};
use clock::{routes, AppState, AuthService, Config, ShiftService};

#[actix_web::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize logger
    env_logger::init();

    log::info!("Starting clock server...");

    // Load configuration
    let config = Config::from_env()?;
    log::info!(
        "Configuration loaded (environment: {})",
        config.environment
    );

    // Initialize database
    let pool = init_database(&config.database_url).await?;
    log::info!("Database initialized");

    // Initialize repositories and services
    let user_repository = UserRepository::new(pool.clone());
    let contract_repository = ContractRepository::new(pool.clone());
    let shift_repository = ShiftRepository::new(pool.clone());
    let auth_service = AuthService::new(user_repository, config.clone());
    let shift_service = ShiftService::new(shift_repository.clone(), contract_repository.clone());

    let app_state = web::Data::new(AppState {
        auth_service,
        shift_service,
    });
    let contract_repo_data = web::Data::new(contract_repository);
    let shift_repo_data = web::Data::new(shift_repository);
    let config_data = web::Data::new(config.clone());

    let server_address = config.server_address();
    log::info!("Server starting on http://{}", server_address);

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(contract_repo_data.clone())
            .app_data(shift_repo_data.clone())
            .app_data(config_data.clone())
            .wrap(build_cors(&config))
            .wrap(RequestIdMiddleware)
            .wrap(Logger::new(
                r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T correlation_id=%{x-correlation-id}o"#,
            ))
            .configure(routes::configure)
    })
    .bind(&server_address)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
