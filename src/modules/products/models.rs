use chrono::{DateTime, SubsecRound, Utc};
use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use url::Url;

pub const NAME_MAX_LEN: usize = 100;
pub const DESCRIPTION_MAX_LEN: usize = 1000;

/// Prices must stay below 10^16, the integer capacity of `NUMERIC(18, 2)`
pub fn price_limit() -> Decimal {
    Decimal::from(10_000_000_000_000_000_i64)
}

/// A catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Server-assigned identifier, never reused
    pub id: i64,
    pub name: String,
    pub description: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Absolute http(s) URL of the product image
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body accepted by create and update.
///
/// The mutable fields are read leniently so that validation can report every
/// missing, null or wrongly typed field at once instead of failing on the
/// first one.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    /// Ignored on create; must equal the path id on update
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub name: FieldInput<String>,
    #[serde(default)]
    pub description: FieldInput<String>,
    #[serde(default)]
    pub price: FieldInput<Decimal>,
    #[serde(default)]
    pub image: FieldInput<String>,
}

/// One body field as received: absent (or `null`), of the wrong JSON type, or usable.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldInput<T> {
    Missing,
    Invalid,
    Value(T),
}

impl<T> Default for FieldInput<T> {
    fn default() -> Self {
        FieldInput::Missing
    }
}

impl<T> From<T> for FieldInput<T> {
    fn from(value: T) -> Self {
        FieldInput::Value(value)
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for FieldInput<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        if value.is_null() {
            return Ok(FieldInput::Missing);
        }
        Ok(T::deserialize(value).map_or(FieldInput::Invalid, FieldInput::Value))
    }
}

/// Validated mutable fields, ready to persist
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub image: Option<String>,
}

/// One failing field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Body returned by delete
#[derive(Debug, Clone, Serialize)]
pub struct Acknowledgement {
    pub message: String,
}

impl ProductPayload {
    /// Check every constraint and return the normalised draft.
    ///
    /// Text fields are trimmed, the price is rounded to cents and a blank
    /// image is treated as absent.
    pub fn validate(self) -> Result<ProductDraft, Vec<FieldError>> {
        let mut errors = Vec::new();

        let name = match self.name {
            FieldInput::Value(name) => name.trim().to_string(),
            FieldInput::Missing => String::new(),
            FieldInput::Invalid => {
                errors.push(FieldError::new("name", "Product name must be a string"));
                String::new()
            }
        };
        if name.is_empty() && !has_error(&errors, "name") {
            errors.push(FieldError::new("name", "Product name is required"));
        } else if name.chars().count() > NAME_MAX_LEN {
            errors.push(FieldError::new(
                "name",
                format!("Product name must be at most {} characters", NAME_MAX_LEN),
            ));
        }

        let description = match self.description {
            FieldInput::Value(description) => description.trim().to_string(),
            FieldInput::Missing => String::new(),
            FieldInput::Invalid => {
                errors.push(FieldError::new(
                    "description",
                    "Product description must be a string",
                ));
                String::new()
            }
        };
        if description.is_empty() && !has_error(&errors, "description") {
            errors.push(FieldError::new(
                "description",
                "Product description is required",
            ));
        } else if description.chars().count() > DESCRIPTION_MAX_LEN {
            errors.push(FieldError::new(
                "description",
                format!(
                    "Product description must be at most {} characters",
                    DESCRIPTION_MAX_LEN
                ),
            ));
        }

        let price = match self.price {
            FieldInput::Missing => {
                errors.push(FieldError::new("price", "Price is required"));
                Decimal::ZERO
            }
            FieldInput::Invalid => {
                errors.push(FieldError::new("price", "Price must be a number"));
                Decimal::ZERO
            }
            FieldInput::Value(price) => {
                let price = price.round_dp(2);
                if price <= Decimal::ZERO {
                    errors.push(FieldError::new("price", "Price must be greater than 0"));
                } else if price >= price_limit() {
                    errors.push(FieldError::new(
                        "price",
                        format!("Price must be less than {}", price_limit()),
                    ));
                }
                price
            }
        };

        let image = match self.image {
            FieldInput::Value(image) => Some(image.trim().to_string()).filter(|i| !i.is_empty()),
            FieldInput::Missing => None,
            FieldInput::Invalid => {
                errors.push(FieldError::new(
                    "image",
                    "Image must be a valid http or https URL",
                ));
                None
            }
        };
        if let Some(image) = &image {
            if !is_web_url(image) {
                errors.push(FieldError::new(
                    "image",
                    "Image must be a valid http or https URL",
                ));
            }
        }

        if errors.is_empty() {
            Ok(ProductDraft {
                name,
                description,
                price,
                image,
            })
        } else {
            Err(errors)
        }
    }
}

fn has_error(errors: &[FieldError], field: &str) -> bool {
    errors.iter().any(|error| error.field == field)
}

fn is_web_url(value: &str) -> bool {
    Url::parse(value)
        .map(|url| matches!(url.scheme(), "http" | "https") && url.host_str().is_some())
        .unwrap_or(false)
}

/// Current time at the precision the stores keep (microseconds)
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// `updated_at` for an update happening at `now`; always later than `previous`.
pub fn next_updated_at(previous: DateTime<Utc>, now: DateTime<Utc>) -> DateTime<Utc> {
    std::cmp::max(now, previous + chrono::Duration::microseconds(1))
}
