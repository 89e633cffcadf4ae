//! Wire types of the products API.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::FieldError;

pub const NAME_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 1000;

/// Exclusive upper bound on prices accepted by the API
pub fn price_limit() -> Decimal {
    Decimal::from(10_000_000_000_000_000_i64)
}

/// A catalog entry as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields a caller supplies on create and update.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductInput {
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl ProductInput {
    /// Check the same constraints the server enforces, reporting every failing field.
    pub fn validate(&self) -> Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        let mut fail = |field: &str, message: String| {
            errors.push(FieldError {
                field: field.to_string(),
                message,
            })
        };

        let name = self.name.trim();
        if name.is_empty() {
            fail("name", "Product name is required".to_string());
        } else if name.chars().count() > NAME_MAX_LEN {
            fail(
                "name",
                format!("Product name must be at most {} characters", NAME_MAX_LEN),
            );
        }

        let description = self.description.trim();
        if description.is_empty() {
            fail("description", "Product description is required".to_string());
        } else if description.chars().count() > DESCRIPTION_MAX_LEN {
            fail(
                "description",
                format!(
                    "Product description must be at most {} characters",
                    DESCRIPTION_MAX_LEN
                ),
            );
        }

        let price = self.price.round_dp(2);
        if price <= Decimal::ZERO {
            fail("price", "Price must be greater than 0".to_string());
        } else if price >= price_limit() {
            fail("price", format!("Price must be less than {}", price_limit()));
        }

        if let Some(image) = self.image.as_deref().map(str::trim) {
            let valid = image.is_empty()
                || Url::parse(image)
                    .map(|url| matches!(url.scheme(), "http" | "https") && url.has_host())
                    .unwrap_or(false);
            if !valid {
                fail("image", "Image must be a valid http or https URL".to_string());
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Update body: the input plus the id it addresses.
#[derive(Debug, Serialize)]
pub(crate) struct UpdateBody<'a> {
    pub id: i64,
    #[serde(flatten)]
    pub input: &'a ProductInput,
}

/// Filter and window for a list call; `None` leaves the server default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListParams {
    pub search: Option<String>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl ListParams {
    /// Query pairs to send; a blank search is omitted.
    pub(crate) fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(search) = self.search.as_deref().map(str::trim) {
            if !search.is_empty() {
                pairs.push(("search", search.to_string()));
            }
        }
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(page_size) = self.page_size {
            pairs.push(("pageSize", page_size.to_string()));
        }
        pairs
    }
}

/// One page of products plus the window metadata from the response headers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPage {
    pub products: Vec<Product>,
    pub total_count: u64,
    pub page: u32,
    pub page_size: u32,
}

/// Body returned by delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acknowledgement {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn input() -> ProductInput {
        ProductInput {
            name: "Cap".to_string(),
            description: "A cap".to_string(),
            price: Decimal::from_str("9.99").unwrap(),
            image: None,
        }
    }

    #[test]
    fn valid_input_passes() {
        assert!(input().validate().is_ok());
        let with_image = ProductInput {
            image: Some("http://img.example.com/cap.png".to_string()),
            ..input()
        };
        assert!(with_image.validate().is_ok());
    }

    #[test]
    fn all_failures_are_listed() {
        let errors = ProductInput {
            name: " ".to_string(),
            description: "d".repeat(DESCRIPTION_MAX_LEN + 1),
            price: Decimal::ZERO,
            image: Some("mailto:shop@example.com".to_string()),
        }
        .validate()
        .unwrap_err();

        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "description", "price", "image"]);
    }

    #[test]
    fn price_above_limit_is_rejected() {
        let ok = ProductInput {
            price: Decimal::from_str("9999999999999999.99").unwrap(),
            ..input()
        };
        assert!(ok.validate().is_ok());

        let errors = ProductInput {
            price: price_limit() * Decimal::TEN,
            ..input()
        }
        .validate()
        .unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "price");
    }

    #[test]
    fn update_body_carries_id_alongside_fields() {
        let input = input();
        let body = serde_json::to_value(UpdateBody { id: 5, input: &input }).unwrap();
        assert_eq!(body["id"], 5);
        assert_eq!(body["name"], "Cap");
        assert_eq!(body["price"], serde_json::json!(9.99));
        assert!(body.get("image").is_none());
    }

    #[test]
    fn blank_search_is_not_sent() {
        let params = ListParams {
            search: Some("  ".to_string()),
            page: Some(2),
            page_size: None,
        };
        assert_eq!(params.query_pairs(), vec![("page", "2".to_string())]);

        let params = ListParams {
            search: Some("cap".to_string()),
            page: None,
            page_size: Some(5),
        };
        assert_eq!(
            params.query_pairs(),
            vec![("search", "cap".to_string()), ("pageSize", "5".to_string())]
        );
    }
}
