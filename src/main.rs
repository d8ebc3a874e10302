use sqlx::postgres::PgPoolOptions;
use std::net::TcpListener;
use std::sync::Arc;

use ecom_api::configuration::get_configuration;
use ecom_api::startup::run;
use ecom_api::store::{PostgresStore, Store};
use ecom_api::telemetry::init_telemetry;

const MIN_SECRET_KEY_LEN: usize = 32;

#[tokio::main]
async fn main() -> std::io::Result<()> {
    init_telemetry();

    tracing::info!("Starting application");

    let configuration = match get_configuration() {
        Ok(config) => {
            tracing::info!("Configuration loaded successfully");
            config
        }
        Err(e) => {
            tracing::error!("Failed to read configuration: {}", e);
            return Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                "Configuration error",
            ));
        }
    };

    if configuration.jwt.secret.len() < MIN_SECRET_KEY_LEN {
        tracing::error!(
            "JWT secret must be at least {} bytes; refusing to start",
            MIN_SECRET_KEY_LEN
        );
        return Err(std::io::Error::new(
            std::io::ErrorKind::InvalidInput,
            "JWT secret too short",
        ));
    }

    let connection_string = configuration.database.connection_string();
    tracing::info!("Attempting to connect to database");

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&connection_string)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create connection pool: {}", e);
            std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                "Database connection error",
            )
        })?;

    tracing::info!("Database connection pool created successfully");

    let store: Arc<dyn Store> = Arc::new(PostgresStore::new(pool));

    let address = format!("127.0.0.1:{}", configuration.application.port);
    let listener = TcpListener::bind(&address)?;
    tracing::info!("Server listening on: {}", address);

    let server = run(listener, store, configuration.jwt.clone())?;

    server.await
}
