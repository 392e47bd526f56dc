use recap_core::Config;
use recap_infra::LogFormat;

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::from_env()?;

    recap_infra::init_telemetry(
        recap_api::setup::SERVICE_NAME,
        env!("CARGO_PKG_VERSION"),
        config.environment(),
        LogFormat::parse(Some(config.log_format())),
    )
    .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    let (_state, router) = recap_api::setup::initialize_app(config.clone())?;

    recap_api::setup::server::start_server(&config, router).await?;

    Ok(())
}
