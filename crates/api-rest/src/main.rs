//! Standalone REST API server binary.
//!
//! ## Purpose
//! Runs the REST API server on its own, without loading `.env`.
//!
//! ## Intended use
//! Useful for development and debugging. The workspace's main `patientor-run` binary serves
//! the same router after loading `.env`.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{router, AppState};
use patientor_core::{
    config::{seed_path_from_env_value, unknown_field_policy_from_env_value},
    constants::{DEFAULT_REST_ADDR, REST_ADDR_ENV, SEED_FILE_ENV, UNKNOWN_FIELDS_ENV},
    CoreConfig, Services,
};

/// Main entry point for the Patientor REST API server
///
/// # Environment Variables
/// - `PATIENTOR_REST_ADDR`: Server address (default: "0.0.0.0:3000")
/// - `PATIENTOR_SEED_FILE`: YAML seed file (default: built-in seed)
/// - `PATIENTOR_UNKNOWN_FIELDS`: `strip` or `reject` (default: `strip`)
///
/// # Errors
/// Returns an error if:
/// - the logging/tracing configuration cannot be initialised,
/// - the configuration or seed data is invalid,
/// - the server address cannot be bound, or
/// - the HTTP server fails while running.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("api_rest=info".parse()?)
                .add_directive("patientor_core=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let addr = std::env::var(REST_ADDR_ENV).unwrap_or_else(|_| DEFAULT_REST_ADDR.into());

    let cfg = CoreConfig::new(
        seed_path_from_env_value(std::env::var(SEED_FILE_ENV).ok()),
        unknown_field_policy_from_env_value(std::env::var(UNKNOWN_FIELDS_ENV).ok())?,
    )?;
    let services = Services::from_config(&cfg)?;

    tracing::info!("-- Starting Patientor REST API on {}", addr);

    let app = router(AppState::new(services));
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
