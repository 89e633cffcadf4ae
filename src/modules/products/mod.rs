pub mod memory;
pub mod models;
mod openapi;
pub mod postgres;
pub mod routes;
pub mod seed;
pub mod store;

use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use axum::Router;
use catalog_kernel::settings::{DatabaseProvider, PaginationSettings};
use catalog_kernel::{InitCtx, Migration, Module};

pub use memory::MemoryProductStore;
pub use models::Product;
pub use postgres::PgProductStore;
pub use store::{ListQuery, Page, ProductStore, SharedStore};

pub const MODULE_NAME: &str = "products";

/// Product catalog CRUD mounted at `/api/products`
pub struct ProductsModule {
    store: SharedStore,
    pagination: PaginationSettings,
}

impl ProductsModule {
    pub fn new(store: SharedStore, pagination: PaginationSettings) -> Self {
        Self { store, pagination }
    }
}

#[async_trait]
impl Module for ProductsModule {
    fn name(&self) -> &'static str {
        MODULE_NAME
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            max_page_size = self.pagination.max_page_size,
            "products module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(routes::ProductsState {
            store: self.store.clone(),
            pagination: self.pagination,
        })
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(openapi::document())
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_create_products",
            up: postgres::CREATE_PRODUCTS,
        }]
    }

    /// Seeds the sample catalog into an empty in-memory store
    async fn start(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        let database = &ctx.settings.database;
        if database.seed_sample_data && ctx.settings.database_provider() == DatabaseProvider::Memory
        {
            let seeded = seed::seed_if_empty(self.store.as_ref())
                .await
                .context("failed to seed sample products")?;
            if seeded > 0 {
                tracing::info!(module = self.name(), seeded, "seeded sample products");
            }
        }

        tracing::info!(module = self.name(), "products module started");
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "products module stopped");
        Ok(())
    }
}

/// Create a new instance of the products module
pub fn create_module(store: SharedStore, pagination: PaginationSettings) -> Arc<dyn Module> {
    Arc::new(ProductsModule::new(store, pagination))
}
