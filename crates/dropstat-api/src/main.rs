//! Binary entrypoint for the Dropstat API server.
use dropstat_api::{run, ServiceConfig};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // DROPSTAT_CONFIG points at the YAML file, DROPSTAT_ADDR overrides the listen address
    let config = ServiceConfig::load()?;
    run(config).await
}
