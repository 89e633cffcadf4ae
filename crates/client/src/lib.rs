//! HTTP client for the catalog products API.
//!
//! Wraps the five product operations behind typed methods. Every call is a
//! single attempt with the transport's default timeouts; failures come back
//! as [`ClientError`] values carrying the server's structured message when
//! there is one.

mod error;
mod types;

pub use error::{ClientError, FieldError, FALLBACK_MESSAGE};
pub use types::*;

use std::sync::Arc;

use reqwest::header::HeaderMap;
use reqwest::Method;
use serde::de::DeserializeOwned;

/// API root used when nothing else is configured.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

const X_TOTAL_COUNT: &str = "x-total-count";
const X_PAGE: &str = "x-page";
const X_PAGE_SIZE: &str = "x-page-size";

/// Products API client.
///
/// Cheap to clone; clones share the connection pool.
#[derive(Clone)]
pub struct ProductClient {
    inner: Arc<ProductClientInner>,
}

struct ProductClientInner {
    client: reqwest::Client,
    base_url: String,
}

impl ProductClient {
    /// Create a client for the API rooted at `base_url`.
    ///
    /// The base always ends up ending in `/api`: a trailing slash is dropped
    /// and `/api` is appended when missing.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder().build()?;

        Ok(Self {
            inner: Arc::new(ProductClientInner {
                client,
                base_url: normalize_base_url(base_url),
            }),
        })
    }

    /// Normalised API root this client talks to.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// Fetch one page of products, optionally filtered.
    pub async fn list(&self, params: &ListParams) -> Result<ProductPage, ClientError> {
        let request = self
            .request(Method::GET, "/products")
            .query(&params.query_pairs());
        let response = self.send(Method::GET, "/products", request).await?;

        let headers = response.headers();
        let total_count = header_or(headers, X_TOTAL_COUNT, 0);
        let page = header_or(headers, X_PAGE, 1);
        let page_size = header_or(headers, X_PAGE_SIZE, 10);

        let products = decode(response).await?;

        Ok(ProductPage {
            products,
            total_count,
            page,
            page_size,
        })
    }

    pub async fn get(&self, id: i64) -> Result<Product, ClientError> {
        let path = format!("/products/{id}");
        let request = self.request(Method::GET, &path);
        decode(self.send(Method::GET, &path, request).await?).await
    }

    pub async fn create(&self, input: &ProductInput) -> Result<Product, ClientError> {
        let request = self.request(Method::POST, "/products").json(input);
        decode(self.send(Method::POST, "/products", request).await?).await
    }

    /// Replace the mutable fields of product `id`.
    pub async fn update(&self, id: i64, input: &ProductInput) -> Result<Product, ClientError> {
        let path = format!("/products/{id}");
        let request = self
            .request(Method::PUT, &path)
            .json(&UpdateBody { id, input });
        decode(self.send(Method::PUT, &path, request).await?).await
    }

    pub async fn delete(&self, id: i64) -> Result<Acknowledgement, ClientError> {
        let path = format!("/products/{id}");
        let request = self.request(Method::DELETE, &path);
        decode(self.send(Method::DELETE, &path, request).await?).await
    }

    fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let url = format!("{}{}", self.inner.base_url, path);
        self.inner.client.request(method, url)
    }

    /// Send `request`, turning non-success statuses into typed errors.
    async fn send(
        &self,
        method: Method,
        path: &str,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ClientError> {
        tracing::debug!(%method, path, "products API request");

        let response = match request.send().await {
            Ok(response) => response,
            Err(err) => {
                tracing::warn!(%method, path, error = %err, "products API request failed");
                return Err(err.into());
            }
        };

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = ClientError::from_response(status.as_u16(), &body);
        tracing::warn!(
            %method,
            path,
            status = status.as_u16(),
            error = %err,
            "products API returned an error"
        );
        Err(err)
    }
}

impl std::fmt::Debug for ProductClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProductClient")
            .field("base_url", &self.inner.base_url)
            .finish_non_exhaustive()
    }
}

impl Default for ProductClient {
    fn default() -> Self {
        Self {
            inner: Arc::new(ProductClientInner {
                client: reqwest::Client::new(),
                base_url: DEFAULT_BASE_URL.to_string(),
            }),
        }
    }
}

fn normalize_base_url(base_url: &str) -> String {
    let trimmed = base_url.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return DEFAULT_BASE_URL.to_string();
    }
    if trimmed.ends_with("/api") {
        trimmed.to_string()
    } else {
        format!("{trimmed}/api")
    }
}

/// Numeric header value, or `default` when missing or malformed.
fn header_or<T: std::str::FromStr>(headers: &HeaderMap, name: &str, default: T) -> T {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ClientError> {
    response
        .json()
        .await
        .map_err(|e| ClientError::Decode(format!("failed to parse response: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderValue;

    #[test]
    fn base_url_always_ends_in_api() {
        assert_eq!(
            normalize_base_url("http://localhost:8080"),
            "http://localhost:8080/api"
        );
        assert_eq!(
            normalize_base_url("http://localhost:8080/"),
            "http://localhost:8080/api"
        );
        assert_eq!(
            normalize_base_url("https://shop.example.com/api/"),
            "https://shop.example.com/api"
        );
        assert_eq!(normalize_base_url(""), DEFAULT_BASE_URL);
    }

    #[test]
    fn default_client_targets_local_server() {
        assert_eq!(ProductClient::default().base_url(), DEFAULT_BASE_URL);
    }

    #[test]
    fn pagination_headers_fall_back_to_defaults() {
        let mut headers = HeaderMap::new();
        headers.insert(X_TOTAL_COUNT, HeaderValue::from_static("42"));
        headers.insert(X_PAGE, HeaderValue::from_static("two"));

        assert_eq!(header_or(&headers, X_TOTAL_COUNT, 0u64), 42);
        assert_eq!(header_or(&headers, X_PAGE, 1u32), 1);
        assert_eq!(header_or(&headers, X_PAGE_SIZE, 10u32), 10);
    }
}
