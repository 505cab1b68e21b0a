use actix_cors::Cors;

use crate::config::Config;

const ALLOWED_METHODS: [&str; 5] = ["GET", "POST", "PUT", "DELETE", "OPTIONS"];
const ALLOWED_HEADERS: [&str; 5] = [
    "Authorization",
    "Content-Type",
    "Accept",
    "X-Requested-With",
    "X-Correlation-ID",
];

/// CORS policy for the API. Production only admits the configured client;
/// development also admits any local dev server.
pub fn build_cors(config: &Config) -> Cors {
    let cors = Cors::default()
        .allowed_origin(&config.client_base_url)
        .allowed_methods(ALLOWED_METHODS)
        .allowed_headers(ALLOWED_HEADERS)
        .max_age(3600);

    if config.is_production() {
        return cors;
    }

    if config.is_development() {
        log::warn!("CORS admits any localhost origin in development");
    }

    cors.allowed_origin_fn(|origin, _req| {
        origin
            .to_str()
            .map(is_local_origin)
            .unwrap_or(false)
    })
}

fn is_local_origin(origin: &str) -> bool {
    let host = origin
        .strip_prefix("http://")
        .or_else(|| origin.strip_prefix("https://"))
        .unwrap_or("");
    let host = host.split(':').next().unwrap_or("");

    matches!(host, "localhost" | "127.0.0.1")
}
