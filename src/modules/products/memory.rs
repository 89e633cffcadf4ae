//! In-process product store used for local runs and tests.

use std::collections::BTreeMap;

use async_trait::async_trait;
use catalog_db::RepositoryError;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use super::models::{next_updated_at, Product, ProductDraft};
use super::store::{ListQuery, Page, ProductStore};

#[derive(Debug)]
struct State {
    products: BTreeMap<i64, Product>,
    next_id: i64,
}

/// Products kept in a `BTreeMap` keyed by id, so iteration is already id-ordered
#[derive(Debug)]
pub struct MemoryProductStore {
    state: RwLock<State>,
}

impl MemoryProductStore {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(State {
                products: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }
}

impl Default for MemoryProductStore {
    fn default() -> Self {
        Self::new()
    }
}

fn matches(product: &Product, needle: &str) -> bool {
    product.name.to_lowercase().contains(needle)
        || product.description.to_lowercase().contains(needle)
}

#[async_trait]
impl ProductStore for MemoryProductStore {
    async fn list(&self, query: &ListQuery) -> Result<Page<Product>, RepositoryError> {
        let state = self.state.read().await;
        let needle = query.search.as_deref().map(str::to_lowercase);

        let matching: Vec<&Product> = state
            .products
            .values()
            .filter(|product| needle.as_deref().map_or(true, |n| matches(product, n)))
            .collect();

        let total_count = matching.len() as u64;
        let items = matching
            .into_iter()
            .skip(usize::try_from(query.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(query.limit()).unwrap_or(usize::MAX))
            .cloned()
            .collect();

        Ok(Page { items, total_count })
    }

    async fn get(&self, id: i64) -> Result<Option<Product>, RepositoryError> {
        Ok(self.state.read().await.products.get(&id).cloned())
    }

    async fn insert(
        &self,
        draft: &ProductDraft,
        now: DateTime<Utc>,
    ) -> Result<Product, RepositoryError> {
        let mut state = self.state.write().await;

        let id = state.next_id;
        state.next_id += 1;

        let product = Product {
            id,
            name: draft.name.clone(),
            description: draft.description.clone(),
            price: draft.price,
            image: draft.image.clone(),
            created_at: now,
            updated_at: now,
        };
        state.products.insert(id, product.clone());

        Ok(product)
    }

    async fn update(
        &self,
        id: i64,
        draft: &ProductDraft,
        now: DateTime<Utc>,
    ) -> Result<Option<Product>, RepositoryError> {
        let mut state = self.state.write().await;

        let Some(product) = state.products.get_mut(&id) else {
            return Ok(None);
        };

        product.name = draft.name.clone();
        product.description = draft.description.clone();
        product.price = draft.price;
        product.image = draft.image.clone();
        product.updated_at = next_updated_at(product.updated_at, now);

        Ok(Some(product.clone()))
    }

    async fn delete(&self, id: i64) -> Result<bool, RepositoryError> {
        Ok(self.state.write().await.products.remove(&id).is_some())
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        Ok(self.state.read().await.products.len() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::products::models::now;
    use rust_decimal::Decimal;

    fn draft(name: &str, description: &str) -> ProductDraft {
        ProductDraft {
            name: name.to_string(),
            description: description.to_string(),
            price: Decimal::new(1999, 2),
            image: None,
        }
    }

    async fn store_with(count: usize) -> MemoryProductStore {
        let store = MemoryProductStore::new();
        for i in 1..=count {
            store
                .insert(&draft(&format!("Item {i}"), "Plain item"), now())
                .await
                .unwrap();
        }
        store
    }

    #[tokio::test]
    async fn insert_assigns_fresh_ids_and_equal_timestamps() {
        let store = MemoryProductStore::new();
        let first = store.insert(&draft("Cap", "A cap"), now()).await.unwrap();
        let second = store.insert(&draft("Hat", "A hat"), now()).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.created_at, first.updated_at);
    }

    #[tokio::test]
    async fn ids_are_not_reused_after_delete() {
        let store = MemoryProductStore::new();
        let first = store.insert(&draft("Cap", "A cap"), now()).await.unwrap();
        assert!(store.delete(first.id).await.unwrap());

        let next = store.insert(&draft("Hat", "A hat"), now()).await.unwrap();
        assert_ne!(next.id, first.id);
    }

    #[tokio::test]
    async fn second_page_holds_items_six_to_ten() {
        let store = store_with(12).await;
        let page = store.list(&ListQuery::new(None, 2, 5)).await.unwrap();

        let ids: Vec<i64> = page.items.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![6, 7, 8, 9, 10]);
        assert_eq!(page.total_count, 12);
    }

    #[tokio::test]
    async fn page_past_the_end_is_empty_but_counted() {
        let store = store_with(3).await;
        let page = store.list(&ListQuery::new(None, 4, 5)).await.unwrap();

        assert!(page.items.is_empty());
        assert_eq!(page.total_count, 3);
    }

    #[tokio::test]
    async fn search_matches_name_or_description_ignoring_case() {
        let store = MemoryProductStore::new();
        store
            .insert(&draft("Baseball Cap", "Stylish"), now())
            .await
            .unwrap();
        store
            .insert(&draft("Hoodie", "Cozy pullover with CAP sleeves"), now())
            .await
            .unwrap();
        store
            .insert(&draft("Scarf", "Silk"), now())
            .await
            .unwrap();

        let page = store
            .list(&ListQuery::new(Some("cap".to_string()), 1, 10))
            .await
            .unwrap();

        let names: Vec<&str> = page.items.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Baseball Cap", "Hoodie"]);
        assert_eq!(page.total_count, 2);
    }

    #[tokio::test]
    async fn update_keeps_identity_and_moves_updated_at() {
        let store = MemoryProductStore::new();
        let created = store.insert(&draft("Cap", "A cap"), now()).await.unwrap();

        let mut changed = draft("Cap", "A better cap");
        changed.price = Decimal::new(1250, 2);
        let updated = store
            .update(created.id, &changed, created.updated_at)
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.created_at, created.created_at);
        assert!(updated.updated_at > created.updated_at);
        assert_eq!(updated.price, Decimal::new(1250, 2));
    }

    #[tokio::test]
    async fn missing_rows_report_none_and_false() {
        let store = MemoryProductStore::new();
        assert!(store.get(7).await.unwrap().is_none());
        assert!(store
            .update(7, &draft("Cap", "A cap"), now())
            .await
            .unwrap()
            .is_none());
        assert!(!store.delete(7).await.unwrap());
        assert_eq!(store.count().await.unwrap(), 0);
    }
}
