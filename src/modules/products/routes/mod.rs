//! HTTP handlers for `/api/products`.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        FromRequestParts, Path, Query, State,
    },
    http::{header, request::Parts, StatusCode},
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use catalog_http::{error::AppError, pagination::PaginationHeaders};
use catalog_kernel::settings::PaginationSettings;
use serde::Deserialize;
use serde_json::json;

use super::models::{self, Acknowledgement, FieldError, Product, ProductDraft, ProductPayload};
use super::store::{ListQuery, SharedStore};
use super::MODULE_NAME;

const NOT_FOUND: &str = "Product not found";

/// Shared handler state
#[derive(Clone)]
pub struct ProductsState {
    pub store: SharedStore,
    pub pagination: PaginationSettings,
}

pub fn router(state: ProductsState) -> Router {
    Router::new()
        .route("/", get(list_products).post(create_product))
        .route("/health", get(health_check))
        .route(
            "/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .with_state(state)
}

/// Query string of the list endpoint
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListParams {
    pub search: Option<String>,
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

impl ListParams {
    /// Clamp the requested window: page to at least 1, page size to `1..=max_page_size`
    pub fn to_query(&self, pagination: &PaginationSettings) -> ListQuery {
        let max_page_size = i64::from(pagination.max_page_size.max(1));
        let default_page_size = i64::from(pagination.default_page_size);

        let page = self.page.unwrap_or(1).clamp(1, i64::from(u32::MAX));
        let page_size = self
            .page_size
            .unwrap_or(default_page_size)
            .clamp(1, max_page_size);

        ListQuery::new(
            self.search.clone(),
            u32::try_from(page).unwrap_or(u32::MAX),
            u32::try_from(page_size).unwrap_or(1),
        )
    }
}

/// Numeric `{id}` path segment; bad input is a 400 in the standard envelope
pub struct ProductId(pub i64);

impl<S> FromRequestParts<S> for ProductId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i64>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
        Ok(Self(id))
    }
}

fn validation_error(errors: Vec<FieldError>) -> AppError {
    let details = errors
        .iter()
        .map(|error| json!({ "field": error.field, "error": error.message }))
        .collect();
    AppError::validation(details, "One or more fields are invalid")
}

fn validate(payload: ProductPayload) -> Result<ProductDraft, AppError> {
    payload.validate().map_err(validation_error)
}

/// Module health endpoint
async fn health_check() -> Json<serde_json::Value> {
    Json(json!({
        "message": "products module is healthy",
        "timestamp": models::now(),
    }))
}

async fn list_products(
    State(state): State<ProductsState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> Result<(PaginationHeaders, Json<Vec<Product>>), AppError> {
    let Query(params) = params.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    let query = params.to_query(&state.pagination);

    let page = state.store.list(&query).await.map_err(AppError::internal)?;

    tracing::debug!(
        module = MODULE_NAME,
        search = query.search.as_deref().unwrap_or(""),
        page = query.page,
        page_size = query.page_size,
        total = page.total_count,
        "listed products"
    );

    let headers = PaginationHeaders {
        total_count: page.total_count,
        page: query.page,
        page_size: query.page_size,
    };

    Ok((headers, Json(page.items)))
}

async fn get_product(
    State(state): State<ProductsState>,
    ProductId(id): ProductId,
) -> Result<Json<Product>, AppError> {
    state
        .store
        .get(id)
        .await
        .map_err(AppError::internal)?
        .map(Json)
        .ok_or_else(|| AppError::not_found(NOT_FOUND))
}

async fn create_product(
    State(state): State<ProductsState>,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(payload) =
        payload.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    let draft = validate(payload)?;

    let product = state
        .store
        .insert(&draft, models::now())
        .await
        .map_err(AppError::internal)?;

    tracing::info!(module = MODULE_NAME, id = product.id, "product created");

    let location = format!("/api/{}/{}", MODULE_NAME, product.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(product),
    ))
}

async fn update_product(
    State(state): State<ProductsState>,
    ProductId(id): ProductId,
    payload: Result<Json<ProductPayload>, JsonRejection>,
) -> Result<Json<Product>, AppError> {
    let Json(payload) =
        payload.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;

    if payload.id != Some(id) {
        return Err(AppError::id_mismatch("Product ID mismatch"));
    }

    let draft = validate(payload)?;

    match state
        .store
        .update(id, &draft, models::now())
        .await
        .map_err(AppError::internal)?
    {
        Some(product) => {
            tracing::info!(module = MODULE_NAME, id, "product updated");
            Ok(Json(product))
        }
        None => Err(AppError::not_found(NOT_FOUND)),
    }
}

async fn delete_product(
    State(state): State<ProductsState>,
    ProductId(id): ProductId,
) -> Result<Json<Acknowledgement>, AppError> {
    if !state.store.delete(id).await.map_err(AppError::internal)? {
        return Err(AppError::not_found(NOT_FOUND));
    }

    tracing::info!(module = MODULE_NAME, id, "product deleted");

    Ok(Json(Acknowledgement {
        message: "Product deleted successfully".to_string(),
    }))
}
