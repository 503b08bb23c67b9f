use clap::Parser;
use dig_gateway::{
    app::App,
    cli::Args,
    config::Config,
    error::{InitError, RuntimeError},
};
use tracing::debug;

#[global_allocator]
static GLOBAL: jemallocator::Jemalloc = jemallocator::Jemalloc;

#[tokio::main]
async fn main() -> Result<(), RuntimeError> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let mut config = match Config::try_read(args.config) {
        Ok(config) => config,
        Err(error) => {
            eprintln!("failed to read config: {error}");
            std::process::exit(1);
        }
    };

    if args.verbose {
        config.telemetry.level = "info,dig_gateway=trace".to_string();
    }

    telemetry::init_telemetry(&config.telemetry).map_err(InitError::Telemetry)?;

    debug!("telemetry initialized");
    let pretty_config =
        serde_yml::to_string(&config).expect("config should always be serializable");
    tracing::debug!(config = pretty_config, "starting gateway with config");

    #[cfg(debug_assertions)]
    tracing::warn!("running in debug mode");

    config.validate().inspect_err(|error| {
        tracing::error!(%error, "configuration validation failed");
    })?;

    let app = App::new(config)?;
    app.serve().await?;

    println!("shut down");
    Ok(())
}
