//! Wiring shared by the server binary, the CLI and the integration tests.

use std::sync::Arc;

use anyhow::Context;
use catalog_db::MigrationReport;
use catalog_kernel::settings::{DatabaseProvider, Settings};
use catalog_kernel::{InitCtx, ModuleRegistry};
use sqlx::PgPool;

use crate::modules::{
    self,
    products::{MemoryProductStore, PgProductStore, SharedStore},
};

/// A registry with every module registered, plus the pool backing it (if any)
pub struct App {
    pub registry: ModuleRegistry,
    pub pool: Option<PgPool>,
}

/// Choose the storage backend and register modules against it
pub async fn assemble(settings: &Settings) -> anyhow::Result<App> {
    let provider = settings.database_provider();
    tracing::info!(?provider, "selecting product store");

    let (store, pool): (SharedStore, Option<PgPool>) = match provider {
        DatabaseProvider::Memory => (Arc::new(MemoryProductStore::new()), None),
        DatabaseProvider::Postgres => {
            let pool = catalog_db::create_pool(&settings.database).await?;
            (Arc::new(PgProductStore::new(pool.clone())), Some(pool))
        }
    };

    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, store, settings)?;

    Ok(App { registry, pool })
}

/// Initialize modules, apply pending migrations, then start modules
pub async fn start(app: &App, settings: &Settings) -> anyhow::Result<()> {
    let ctx = InitCtx { settings };

    app.registry.init_all(&ctx).await?;

    if let Some(pool) = &app.pool {
        let migrations = app.registry.collect_migrations();
        catalog_db::run_migrations(pool, &migrations)
            .await
            .context("failed to apply database migrations")?;
    }

    app.registry.start_all(&ctx).await
}

/// Apply pending migrations without starting anything
pub async fn migrate(settings: &Settings) -> anyhow::Result<MigrationReport> {
    if settings.database_provider() != DatabaseProvider::Postgres {
        anyhow::bail!("migrations require the postgres database provider");
    }

    let app = assemble(settings).await?;
    let pool = app
        .pool
        .as_ref()
        .context("postgres provider did not produce a connection pool")?;

    let report = catalog_db::run_migrations(pool, &app.registry.collect_migrations())
        .await
        .context("failed to apply database migrations")?;
    pool.close().await;

    Ok(report)
}
