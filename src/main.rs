use std::env;

use payroll_engine::api::{AppState, create_router};
use payroll_engine::config::ConfigLoader;
use tracing::info;

const DEFAULT_RULES_PATH: &str = "config/rules.yaml";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let rules_path = env::var("PAYROLL_RULES_PATH").unwrap_or_else(|_| DEFAULT_RULES_PATH.into());
    let bind_addr = env::var("PAYROLL_BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.into());

    let config = ConfigLoader::load(&rules_path)?;
    info!(
        rules = %rules_path,
        bind = %bind_addr,
        "Starting payroll engine"
    );

    let app = create_router(AppState::new(config));

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!("Payroll engine listening on http://{}", bind_addr);
    axum::serve(listener, app).await?;
    Ok(())
}
