//! Environment-based configuration

use std::env;

/// Current deployment environment ("production" enables JSON logs)
pub fn get_environment() -> String {
    env::var("ENVIRONMENT").unwrap_or_else(|_| "sandbox".to_string())
}

/// Postgres connection string for the dashboard store
pub fn get_database_url() -> String {
    env::var("DATABASE_URL")
        .unwrap_or_else(|_| "host=localhost port=5432 user=ragboard dbname=ragboard".to_string())
}

/// HTTP listen port for the API server
pub fn get_port() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080)
}
