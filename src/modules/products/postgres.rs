//! PostgreSQL-backed product store.

use async_trait::async_trait;
use catalog_db::RepositoryError;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::models::{Product, ProductDraft};
use super::store::{ListQuery, Page, ProductStore};

/// Schema for the `products` table
pub const CREATE_PRODUCTS: &str = r#"
    CREATE TABLE IF NOT EXISTS products (
        id          BIGINT GENERATED BY DEFAULT AS IDENTITY PRIMARY KEY,
        name        VARCHAR(100)   NOT NULL CHECK (btrim(name) <> ''),
        description VARCHAR(1000)  NOT NULL CHECK (btrim(description) <> ''),
        price       NUMERIC(18, 2) NOT NULL CHECK (price > 0),
        image       TEXT,
        created_at  TIMESTAMPTZ    NOT NULL,
        updated_at  TIMESTAMPTZ    NOT NULL,
        CONSTRAINT products_updated_after_created CHECK (updated_at >= created_at)
    );
"#;

const COLUMNS: &str = "id, name, description, price, image, created_at, updated_at";

// NULL pattern disables the filter. Backslash is the default LIKE escape.
const FILTER: &str = "($1::text IS NULL OR name ILIKE $1 OR description ILIKE $1)";

/// Internal row type for product queries.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: i64,
    name: String,
    description: String,
    price: Decimal,
    image: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
            price: row.price,
            image: row.image,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Escape `%`, `_` and `\` so user input only ever matches literally
fn like_pattern(search: &str) -> String {
    let mut escaped = String::with_capacity(search.len() + 2);
    escaped.push('%');
    for ch in search.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}

fn to_i64(value: u64, what: &str) -> Result<i64, RepositoryError> {
    i64::try_from(value).map_err(|_| RepositoryError::DataCorruption(format!("{what} out of range")))
}

pub struct PgProductStore {
    pool: PgPool,
}

impl PgProductStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductStore for PgProductStore {
    async fn list(&self, query: &ListQuery) -> Result<Page<Product>, RepositoryError> {
        let pattern = query.search.as_deref().map(like_pattern);

        // Count and window must come from the same snapshot
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;

        let total: i64 = sqlx::query_scalar(&format!("SELECT COUNT(*) FROM products WHERE {FILTER}"))
            .bind(&pattern)
            .fetch_one(&mut *tx)
            .await?;

        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM products WHERE {FILTER} ORDER BY id LIMIT $2 OFFSET $3"
        ))
        .bind(&pattern)
        .bind(to_i64(query.limit(), "limit")?)
        .bind(to_i64(query.offset(), "offset")?)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        let total_count = u64::try_from(total)
            .map_err(|_| RepositoryError::DataCorruption(format!("negative count {total}")))?;

        Ok(Page {
            items: rows.into_iter().map(Product::from).collect(),
            total_count,
        })
    }

    async fn get(&self, id: i64) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> =
            sqlx::query_as(&format!("SELECT {COLUMNS} FROM products WHERE id = $1"))
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(Product::from))
    }

    async fn insert(
        &self,
        draft: &ProductDraft,
        now: DateTime<Utc>,
    ) -> Result<Product, RepositoryError> {
        let row: ProductRow = sqlx::query_as(&format!(
            "INSERT INTO products (name, description, price, image, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $5)
             RETURNING {COLUMNS}"
        ))
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.price)
        .bind(&draft.image)
        .bind(now)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn update(
        &self,
        id: i64,
        draft: &ProductDraft,
        now: DateTime<Utc>,
    ) -> Result<Option<Product>, RepositoryError> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "UPDATE products
             SET name = $2,
                 description = $3,
                 price = $4,
                 image = $5,
                 updated_at = GREATEST($6, updated_at + INTERVAL '1 microsecond')
             WHERE id = $1
             RETURNING {COLUMNS}"
        ))
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(draft.price)
        .bind(&draft.image)
        .bind(now)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Product::from))
    }

    async fn delete(&self, id: i64) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn count(&self) -> Result<u64, RepositoryError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        u64::try_from(total)
            .map_err(|_| RepositoryError::DataCorruption(format!("negative count {total}")))
    }
}
