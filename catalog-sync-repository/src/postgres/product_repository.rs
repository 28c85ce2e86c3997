//! PostgreSQL implementation of the product repository.
//!
//! Reads catalog items from the `products` table. Listings are filtered by
//! product type and by either the publish status or the stock status, ordered
//! by id so that limit/offset pages are stable between calls.

use async_trait::async_trait;
use catalog_sync_shared::{CatalogItem, PriceRange, StatusGate, StockStatus};
use chrono::{DateTime, Utc};
use tracing::warn;

use crate::errors::RepositoryError;
use crate::interfaces::ProductRepository;
use crate::types::{page_count, ProductPage, ProductQuery};

const SELECT_COLUMNS: &str = "id, parent_id, product_type, status, stock_status, manage_stock, \
     price, sale_price, variation_min_price, variation_max_price, name, description, \
     short_description, permalink, image, category_ids, sku, stock_quantity, average_rating, \
     created_at, updated_at";

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i64,
    parent_id: i64,
    product_type: String,
    status: String,
    stock_status: String,
    manage_stock: bool,
    price: Option<f64>,
    sale_price: Option<f64>,
    variation_min_price: Option<f64>,
    variation_max_price: Option<f64>,
    name: String,
    description: String,
    short_description: String,
    permalink: String,
    image: Option<String>,
    category_ids: Vec<i64>,
    sku: String,
    stock_quantity: Option<i64>,
    average_rating: f64,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl TryFrom<ProductRow> for CatalogItem {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let stock_status = row
            .stock_status
            .parse::<StockStatus>()
            .map_err(|reason| RepositoryError::InvalidRow { id: row.id, reason })?;

        let variation_price_range = match (row.variation_min_price, row.variation_max_price) {
            (Some(min), Some(max)) => Some(PriceRange { min, max }),
            _ => None,
        };

        Ok(CatalogItem {
            id: row.id,
            parent_id: row.parent_id,
            product_type: row.product_type.into(),
            status: row.status,
            stock_status,
            manage_stock: row.manage_stock,
            price: row.price,
            sale_price: row.sale_price,
            variation_price_range,
            name: row.name,
            description: row.description,
            short_description: row.short_description,
            permalink: row.permalink,
            image: row.image,
            category_ids: row.category_ids,
            sku: row.sku,
            stock_quantity: row.stock_quantity,
            average_rating: row.average_rating,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Convert the rows of one listing page, leaving out rows that do not form a
/// valid catalog item so that one bad row cannot fail the page.
fn convert_page_rows(rows: Vec<ProductRow>) -> Vec<CatalogItem> {
    rows.into_iter()
        .filter_map(|row| match CatalogItem::try_from(row) {
            Ok(item) => Some(item),
            Err(e) => {
                warn!(error = %e, "Skipping product row that cannot be read");
                None
            }
        })
        .collect()
}

/// Column the status allow-list is compared against.
fn status_column(gate: StatusGate) -> &'static str {
    match gate {
        StatusGate::Publish => "status",
        StatusGate::Stock => "stock_status",
    }
}

/// PostgreSQL-backed product repository.
pub struct PostgresProductRepository {
    pool: sqlx::PgPool,
}

impl PostgresProductRepository {
    /// Creates a new repository over an existing pool.
    ///
    /// # Arguments
    ///
    /// * `pool` - Connection pool with the `products` table migrated
    pub fn new(pool: sqlx::PgPool) -> Self {
        Self { pool }
    }

    /// Inserts the item, or replaces the row with the same id.
    ///
    /// The engine never writes products; this seeds the table for tests and
    /// fixtures.
    pub async fn save(&self, item: &CatalogItem) -> Result<(), RepositoryError> {
        let (variation_min, variation_max) = item
            .variation_price_range
            .map(|range| (Some(range.min), Some(range.max)))
            .unwrap_or((None, None));

        sqlx::query(
            "INSERT INTO products (id, parent_id, product_type, status, stock_status, manage_stock, \
             price, sale_price, variation_min_price, variation_max_price, name, description, \
             short_description, permalink, image, category_ids, sku, stock_quantity, average_rating, \
             created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18, $19, $20, $21) \
             ON CONFLICT (id) DO UPDATE SET parent_id = $2, product_type = $3, status = $4, \
             stock_status = $5, manage_stock = $6, price = $7, sale_price = $8, \
             variation_min_price = $9, variation_max_price = $10, name = $11, description = $12, \
             short_description = $13, permalink = $14, image = $15, category_ids = $16, sku = $17, \
             stock_quantity = $18, average_rating = $19, created_at = $20, updated_at = $21",
        )
        .bind(item.id)
        .bind(item.parent_id)
        .bind(item.product_type.as_str())
        .bind(&item.status)
        .bind(item.stock_status.as_str())
        .bind(item.manage_stock)
        .bind(item.price)
        .bind(item.sale_price)
        .bind(variation_min)
        .bind(variation_max)
        .bind(&item.name)
        .bind(&item.description)
        .bind(&item.short_description)
        .bind(&item.permalink)
        .bind(&item.image)
        .bind(&item.category_ids)
        .bind(&item.sku)
        .bind(item.stock_quantity)
        .bind(item.average_rating)
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl ProductRepository for PostgresProductRepository {
    async fn list(&self, query: &ProductQuery) -> Result<ProductPage, RepositoryError> {
        let column = status_column(query.gate);

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM products WHERE product_type = ANY($1) AND {} = ANY($2)",
            column
        ))
        .bind(&query.types)
        .bind(&query.statuses)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products WHERE product_type = ANY($1) AND {} = ANY($2) \
             ORDER BY id LIMIT $3 OFFSET $4",
            SELECT_COLUMNS, column
        ))
        .bind(&query.types)
        .bind(&query.statuses)
        .bind(i64::from(query.limit))
        .bind(i64::try_from(query.offset).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await?;

        let items = convert_page_rows(rows);

        let total = u64::try_from(total).unwrap_or(0);
        Ok(ProductPage {
            items,
            total,
            max_page: page_count(total, query.limit),
        })
    }

    async fn count(&self, query: &ProductQuery) -> Result<u64, RepositoryError> {
        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM products WHERE product_type = ANY($1) AND {} = ANY($2)",
            status_column(query.gate)
        ))
        .bind(&query.types)
        .bind(&query.statuses)
        .fetch_one(&self.pool)
        .await?;

        Ok(u64::try_from(total).unwrap_or(0))
    }

    async fn get_by_id(&self, id: i64) -> Result<Option<CatalogItem>, RepositoryError> {
        let row = sqlx::query_as::<_, ProductRow>(&format!(
            "SELECT {} FROM products WHERE id = $1",
            SELECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(CatalogItem::try_from).transpose()
    }
}
