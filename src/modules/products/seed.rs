//! Sample catalog for fresh in-memory stores.

use catalog_db::RepositoryError;
use rust_decimal::Decimal;

use super::models::{now, ProductDraft};
use super::store::ProductStore;

const SAMPLES: &[(&str, &str, i64, &str)] = &[
    ("Classic T-Shirt", "Comfortable cotton t-shirt", 1999, "T-Shirt"),
    ("Denim Jeans", "Stylish blue jeans", 4999, "Jeans"),
    ("Leather Jacket", "Premium leather jacket", 19999, "Jacket"),
    ("Summer Dress", "Light and breezy dress", 3999, "Dress"),
    ("Sneakers", "Comfortable running sneakers", 7999, "Sneakers"),
    ("Winter Coat", "Warm winter coat", 14999, "Coat"),
    ("Baseball Cap", "Stylish baseball cap", 2499, "Cap"),
    ("Hoodie", "Cozy pullover hoodie", 5999, "Hoodie"),
    ("Shorts", "Casual summer shorts", 2999, "Shorts"),
    ("Scarf", "Elegant silk scarf", 3499, "Scarf"),
];

pub fn sample_products() -> Vec<ProductDraft> {
    SAMPLES
        .iter()
        .map(|&(name, description, cents, label)| ProductDraft {
            name: name.to_string(),
            description: description.to_string(),
            price: Decimal::new(cents, 2),
            image: Some(format!(
                "https://via.placeholder.com/300x400?text={}",
                label
            )),
        })
        .collect()
}

/// Insert the sample catalog when the store holds nothing. Returns how many were added.
pub async fn seed_if_empty(store: &dyn ProductStore) -> Result<usize, RepositoryError> {
    if store.count().await? > 0 {
        return Ok(0);
    }

    let samples = sample_products();
    for draft in &samples {
        store.insert(draft, now()).await?;
    }

    Ok(samples.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::products::memory::MemoryProductStore;

    #[tokio::test]
    async fn seeds_once() {
        let store = MemoryProductStore::new();
        assert_eq!(seed_if_empty(&store).await.unwrap(), 10);
        assert_eq!(seed_if_empty(&store).await.unwrap(), 0);
        assert_eq!(store.count().await.unwrap(), 10);
    }

    #[test]
    fn samples_pass_validation_rules() {
        for draft in sample_products() {
            assert!(draft.price > Decimal::ZERO);
            assert!(!draft.name.is_empty());
        }
    }
}
