use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_log::LogTracer;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{EnvFilter, Registry};

/// Installs a bunyan-formatted JSON subscriber on stdout. `RUST_LOG` wins over
/// `default_filter`. Records emitted through the `log` crate, such as the
/// actix request logger, are forwarded into the same stream.
pub fn init_subscriber(app_name: &str, default_filter: &str) -> Result<(), anyhow::Error> {
    LogTracer::init()?;

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));
    let formatting_layer = BunyanFormattingLayer::new(app_name.to_string(), std::io::stdout);
    let subscriber = Registry::default()
        .with(env_filter)
        .with(JsonStorageLayer)
        .with(formatting_layer);
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}
