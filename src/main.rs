use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_rest::{AppState, router};
use patientor_core::{
    CoreConfig, Services,
    config::{seed_path_from_env_value, unknown_field_policy_from_env_value},
    constants::{DEFAULT_REST_ADDR, REST_ADDR_ENV, SEED_FILE_ENV, UNKNOWN_FIELDS_ENV},
};

/// Main entry point for the Patientor application
///
/// Loads `.env`, resolves configuration once, seeds the in-memory store and serves the
/// REST API.
///
/// # Environment Variables
/// - `PATIENTOR_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `PATIENTOR_SEED_FILE`: YAML seed file (default: built-in seed)
/// - `PATIENTOR_UNKNOWN_FIELDS`: `strip` or `reject` (default: `strip`)
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If configuration, seeding or the server fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("patientor_run=info".parse()?)
                .add_directive("patientor_core=info".parse()?)
                .add_directive("api_rest=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var(REST_ADDR_ENV).unwrap_or_else(|_| DEFAULT_REST_ADDR.into());

    let cfg = CoreConfig::new(
        seed_path_from_env_value(std::env::var(SEED_FILE_ENV).ok()),
        unknown_field_policy_from_env_value(std::env::var(UNKNOWN_FIELDS_ENV).ok())?,
    )?;
    tracing::info!(unknown_fields = %cfg.unknown_fields(), "resolved configuration");

    let services = Services::from_config(&cfg)?;

    tracing::info!("++ Starting Patientor REST on {}", rest_addr);

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, router(AppState::new(services))).await?;

    Ok(())
}
