pub mod products;

use catalog_kernel::{settings::Settings, ModuleRegistry};

/// Register all application modules with the registry
pub fn register_all(
    registry: &mut ModuleRegistry,
    store: products::SharedStore,
    settings: &Settings,
) -> anyhow::Result<()> {
    registry.register(products::create_module(store, settings.pagination))
}
