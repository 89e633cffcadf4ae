use anyhow::{bail, Context};
use std::sync::Arc;

use crate::module::{InitCtx, Migration, Module};

/// Ordered collection of modules driving their lifecycle
pub struct ModuleRegistry {
    modules: Vec<Arc<dyn Module>>,
}

impl ModuleRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            modules: Vec::new(),
        }
    }

    /// Register a module. Names double as mount paths, so they must be unique.
    pub fn register(&mut self, module: Arc<dyn Module>) -> anyhow::Result<()> {
        if self.get_module(module.name()).is_some() {
            bail!("module '{}' is already registered", module.name());
        }

        tracing::debug!(module = module.name(), "registered module");
        self.modules.push(module);
        Ok(())
    }

    /// All registered modules in registration order
    pub fn modules(&self) -> &[Arc<dyn Module>] {
        &self.modules
    }

    pub fn get_module(&self, name: &str) -> Option<&Arc<dyn Module>> {
        self.modules.iter().find(|module| module.name() == name)
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }

    /// Initialize modules in registration order
    pub async fn init_all(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!("initializing {} modules", self.modules.len());

        for module in &self.modules {
            tracing::info!(module = module.name(), "initializing module");

            module
                .init(ctx)
                .await
                .with_context(|| format!("failed to initialize module '{}'", module.name()))?;
        }

        Ok(())
    }

    /// Start modules in registration order
    pub async fn start_all(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!("starting {} modules", self.modules.len());

        for module in &self.modules {
            tracing::info!(module = module.name(), "starting module");

            module
                .start(ctx)
                .await
                .with_context(|| format!("failed to start module '{}'", module.name()))?;
        }

        Ok(())
    }

    /// Stop modules in reverse registration order
    pub async fn stop_all(&self) -> anyhow::Result<()> {
        tracing::info!("stopping {} modules", self.modules.len());

        for module in self.modules.iter().rev() {
            tracing::info!(module = module.name(), "stopping module");

            module
                .stop()
                .await
                .with_context(|| format!("failed to stop module '{}'", module.name()))?;
        }

        Ok(())
    }

    /// Collect migrations from every module, ordered by module name then migration id
    pub fn collect_migrations(&self) -> Vec<(String, Migration)> {
        let mut migrations: Vec<(String, Migration)> = self
            .modules
            .iter()
            .flat_map(|module| {
                module
                    .migrations()
                    .into_iter()
                    .map(move |migration| (module.name().to_string(), migration))
            })
            .collect();

        migrations.sort_by(|a, b| a.0.cmp(&b.0).then_with(|| a.1.id.cmp(b.1.id)));

        migrations
    }
}

impl Default for ModuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct TestModule {
        name: &'static str,
        stopped: Arc<AtomicUsize>,
    }

    impl TestModule {
        fn new(name: &'static str) -> Self {
            Self {
                name,
                stopped: Arc::new(AtomicUsize::new(0)),
            }
        }
    }

    #[async_trait::async_trait]
    impl Module for TestModule {
        fn name(&self) -> &'static str {
            self.name
        }

        fn migrations(&self) -> Vec<Migration> {
            vec![
                Migration {
                    id: "002_index",
                    up: "CREATE INDEX test_idx ON test (id);",
                },
                Migration {
                    id: "001_init",
                    up: "CREATE TABLE test (id BIGINT);",
                },
            ]
        }

        async fn stop(&self) -> anyhow::Result<()> {
            self.stopped.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    #[test]
    fn new_registry_is_empty() {
        let registry = ModuleRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.collect_migrations().is_empty());
    }

    #[test]
    fn duplicate_module_names_are_rejected() {
        let mut registry = ModuleRegistry::new();
        registry.register(Arc::new(TestModule::new("products"))).unwrap();

        let err = registry
            .register(Arc::new(TestModule::new("products")))
            .unwrap_err();
        assert!(err.to_string().contains("already registered"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn migrations_are_sorted_by_module_then_id() {
        let mut registry = ModuleRegistry::new();
        registry.register(Arc::new(TestModule::new("zeta"))).unwrap();
        registry.register(Arc::new(TestModule::new("alpha"))).unwrap();

        let order: Vec<(String, &str)> = registry
            .collect_migrations()
            .into_iter()
            .map(|(module, migration)| (module, migration.id))
            .collect();

        assert_eq!(
            order,
            vec![
                ("alpha".to_string(), "001_init"),
                ("alpha".to_string(), "002_index"),
                ("zeta".to_string(), "001_init"),
                ("zeta".to_string(), "002_index"),
            ]
        );
    }

    #[tokio::test]
    async fn lifecycle_runs_every_hook() {
        let mut registry = ModuleRegistry::new();
        let settings = Settings::default();
        let ctx = InitCtx {
            settings: &settings,
        };

        let module = TestModule::new("test");
        let stopped = module.stopped.clone();
        registry.register(Arc::new(module)).unwrap();

        registry.init_all(&ctx).await.unwrap();
        registry.start_all(&ctx).await.unwrap();
        registry.stop_all().await.unwrap();

        assert_eq!(stopped.load(Ordering::SeqCst), 1);
        assert!(registry.get_module("test").is_some());
        assert!(registry.get_module("missing").is_none());
    }
}
