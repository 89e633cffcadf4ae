//! Tracing subscriber bootstrap.

use anyhow::Context;
use catalog_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the log filter: `RUST_LOG` when set, otherwise the configured level.
pub fn env_filter(settings: &TelemetrySettings) -> anyhow::Result<EnvFilter> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&settings.log_level)
            .with_context(|| format!("invalid log level '{}'", settings.log_level)),
    }
}

/// Install the global tracing subscriber.
///
/// Fails if a subscriber is already installed, so call it once per process.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = env_filter(settings)?;
    let registry = tracing_subscriber::registry().with(filter);

    match settings.log_format {
        LogFormat::Pretty => registry
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .context("failed to install tracing subscriber")?,
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .context("failed to install tracing subscriber")?,
    }

    tracing::debug!(
        target: "catalog-telemetry",
        format = ?settings.log_format,
        "telemetry initialized"
    );

    Ok(())
}
