use anyhow::Result;
use foodtip_core::{config::Config, server, telemetry};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Load configuration
    let config = Config::from_env()?;
    let prometheus_handle = telemetry::init(&config.telemetry)?;

    info!(
        service = %config.telemetry.service_name,
        environment = %config.environment,
        "Starting FoodTip Core"
    );
    info!("HTTP server listening on {}", config.http_addr());

    // Run the server
    server::run(config, prometheus_handle).await
}
