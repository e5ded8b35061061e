use service_core::observability::{init_metrics, init_tracing};
use simple_service::{config::SimpleConfig, startup::SERVICE, Application};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = SimpleConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        anyhow::anyhow!("Configuration error: {}", e)
    })?;

    init_tracing(
        SERVICE.name,
        &config.common.log_level,
        config.common.otlp_endpoint.as_deref(),
    );

    if let Err(e) = init_metrics() {
        tracing::warn!("Metrics disabled: {}", e);
    }

    Application::build(config).await?.run_until_stopped().await?;

    Ok(())
}
