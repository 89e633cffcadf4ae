//! Database migration command.

use anyhow::Context;
use catalog_kernel::settings::Settings;

/// Apply every pending module migration to the configured PostgreSQL database.
pub async fn run() -> anyhow::Result<()> {
    let settings = Settings::load().context("failed to load catalog settings")?;

    tracing::info!(env = ?settings.environment, "running catalog migrations");

    let report = catalog_app::bootstrap::migrate(&settings).await?;

    if report.applied_now.is_empty() {
        println!("Database is up to date ({} applied)", report.total_applied);
    } else {
        for migration in &report.applied_now {
            println!("applied {migration}");
        }
        println!(
            "Applied {} migration(s), {} total",
            report.applied_now.len(),
            report.total_applied
        );
    }

    Ok(())
}
