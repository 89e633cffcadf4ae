//! Runs against a live database: `TEST_DATABASE_URL=postgres://... cargo test -- --ignored`

use std::str::FromStr;

use catalog_app::products::{models::ProductDraft, ListQuery, PgProductStore, ProductStore};
use catalog_kernel::settings::{DatabaseProvider, DatabaseSettings};
use catalog_kernel::Module;
use rust_decimal::Decimal;

async fn store() -> PgProductStore {
    let url = std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL must be set");
    let settings = DatabaseSettings {
        provider: Some(DatabaseProvider::Postgres),
        url: Some(url),
        ..DatabaseSettings::default()
    };
    let pool = catalog_db::create_pool(&settings).await.unwrap();

    let module = catalog_app::products::create_module(
        std::sync::Arc::new(PgProductStore::new(pool.clone())),
        Default::default(),
    );
    let migrations: Vec<(String, catalog_kernel::Migration)> = module
        .migrations()
        .into_iter()
        .map(|migration| (module.name().to_string(), migration))
        .collect();
    catalog_db::run_migrations(&pool, &migrations).await.unwrap();

    sqlx::query("TRUNCATE products RESTART IDENTITY")
        .execute(&pool)
        .await
        .unwrap();

    PgProductStore::new(pool)
}

fn draft(name: &str, description: &str) -> ProductDraft {
    ProductDraft {
        name: name.to_string(),
        description: description.to_string(),
        price: Decimal::from_str("19.99").unwrap(),
        image: None,
    }
}

#[tokio::test]
#[ignore]
async fn postgres_store_round_trip() {
    let store = store().await;
    let now = catalog_app::products::models::now();

    let cap = store.insert(&draft("Baseball Cap", "Stylish"), now).await.unwrap();
    store.insert(&draft("Scarf", "100% silk"), now).await.unwrap();

    let page = store
        .list(&ListQuery::new(Some("CAP".to_string()), 1, 10))
        .await
        .unwrap();
    assert_eq!(page.total_count, 1);
    assert_eq!(page.items[0].id, cap.id);

    // `%` is matched literally
    let page = store
        .list(&ListQuery::new(Some("0%".to_string()), 1, 10))
        .await
        .unwrap();
    assert_eq!(page.total_count, 1);

    let updated = store
        .update(cap.id, &draft("Red Cap", "Stylish"), now)
        .await
        .unwrap()
        .unwrap();
    assert!(updated.updated_at > cap.updated_at);
    assert_eq!(updated.created_at, cap.created_at);

    assert!(store.delete(cap.id).await.unwrap());
    assert!(!store.delete(cap.id).await.unwrap());
    assert_eq!(store.get(cap.id).await.unwrap(), None);
    assert_eq!(store.count().await.unwrap(), 1);

    // The total and the window are read from one snapshot while writers run
    let store = std::sync::Arc::new(store);
    let writer = {
        let store = store.clone();
        tokio::spawn(async move {
            for i in 0..50 {
                let name = format!("Item {i}");
                store
                    .insert(&draft(&name, "Thing"), catalog_app::products::models::now())
                    .await
                    .unwrap();
            }
        })
    };
    for _ in 0..50 {
        let page = store.list(&ListQuery::new(None, 1, 1000)).await.unwrap();
        assert_eq!(page.total_count, page.items.len() as u64);
    }
    writer.await.unwrap();
}
