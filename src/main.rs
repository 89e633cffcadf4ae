use anyhow::Context;
use catalog_app::bootstrap;
use catalog_kernel::settings::Settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().with_context(|| "failed to load catalog settings")?;
    catalog_telemetry::init(&settings.telemetry)?;

    tracing::info!(
        env = ?settings.environment,
        provider = ?settings.database_provider(),
        "catalog-app bootstrap starting"
    );

    let app = bootstrap::assemble(&settings).await?;
    bootstrap::start(&app, &settings).await?;

    tracing::info!(modules = app.registry.len(), "catalog-app bootstrap complete");

    let served = catalog_http::start_server(&app.registry, &settings).await;

    if let Err(err) = app.registry.stop_all().await {
        tracing::error!(error = %err, "failed to stop modules cleanly");
    }
    if let Some(pool) = &app.pool {
        pool.close().await;
        tracing::info!("database pool closed");
    }

    served
}
