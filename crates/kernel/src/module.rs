use async_trait::async_trait;
use axum::Router;

/// Context handed to modules during the lifecycle hooks
pub struct InitCtx<'a> {
    pub settings: &'a crate::settings::Settings,
}

/// Schema migration contributed by a module
#[derive(Debug, Clone)]
pub struct Migration {
    pub id: &'static str,
    pub up: &'static str,
}

/// A unit of functionality registered with the kernel.
///
/// A module owns its routes, its slice of the OpenAPI document, the
/// migrations its tables need, and optional start/stop hooks.
#[async_trait]
pub trait Module: Sync + Send {
    /// Unique name; also the URL segment routes are mounted under
    fn name(&self) -> &'static str;

    /// Called during startup, before migrations run
    async fn init(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Routes for this module, mounted under `/api/{name}`
    fn routes(&self) -> Router {
        Router::new()
    }

    /// OpenAPI fragment (`paths` and `components.schemas`) as JSON.
    /// Paths are relative to the module mount point.
    fn openapi(&self) -> Option<serde_json::Value> {
        None
    }

    /// Migrations, applied in id order
    fn migrations(&self) -> Vec<Migration> {
        vec![]
    }

    /// Called once migrations are complete
    async fn start(&self, _ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        Ok(())
    }

    /// Called during shutdown, after the server stops accepting requests
    async fn stop(&self) -> anyhow::Result<()> {
        Ok(())
    }
}
