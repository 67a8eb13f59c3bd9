//! # Item Repository
//!
//! The jewelry catalogue: list, filter, add, update, delete.
//!
//! ## Filtering
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ItemFilter { category: Some("Rings"), status: None, query: "gold" }    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  WHERE (?1 IS NULL OR category = ?1)                                   │
//! │    AND (?2 IS NULL OR status = ?2)                                     │
//! │    AND (?3 IS NULL OR name LIKE ?3 OR description LIKE ?3 ...)         │
//! │                                                                         │
//! │  Unset criteria bind NULL and drop out; one statement covers every     │
//! │  combination.                                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::{FromRow, SqlitePool};
use tracing::{debug, info};
use uuid::Uuid;

use vedaa_core::validation::{validate_new_item, validate_patch, validate_search_query};
use vedaa_core::{ItemStatus, JewelryItem, JewelryItemPatch, NewJewelryItem};

use crate::error::{DbError, DbResult};

const SELECT_COLUMNS: &str = "SELECT id, name, category, image_ref, metal_type, purity, \
     weight_grams, making_charge, description, status, created_at, updated_at \
     FROM jewelry_items";

// =============================================================================
// Row mapping
// =============================================================================

#[derive(Debug, FromRow)]
struct ItemRow {
    id: String,
    name: String,
    category: String,
    image_ref: String,
    metal_type: String,
    purity: String,
    weight_grams: String,
    making_charge: String,
    description: Option<String>,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

fn parse_decimal(column: &str, value: &str) -> DbResult<Decimal> {
    Decimal::from_str(value).map_err(|_| DbError::corrupt(column, value))
}

impl TryFrom<ItemRow> for JewelryItem {
    type Error = DbError;

    fn try_from(row: ItemRow) -> DbResult<Self> {
        Ok(JewelryItem {
            weight_grams: parse_decimal("weight_grams", &row.weight_grams)?,
            making_charge: parse_decimal("making_charge", &row.making_charge)?,
            status: ItemStatus::from_str(&row.status).map_err(|_| DbError::corrupt("status", &row.status))?,
            id: row.id,
            name: row.name,
            category: row.category,
            image_ref: row.image_ref,
            metal_type: row.metal_type,
            purity: row.purity,
            description: row.description,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

// =============================================================================
// Filter
// =============================================================================

/// Catalogue listing criteria. `Default` matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemFilter {
    pub category: Option<String>,
    pub status: Option<ItemStatus>,
    /// Case-insensitive substring of name, category or description.
    pub query: Option<String>,
}

impl ItemFilter {
    pub fn category(category: impl Into<String>) -> Self {
        ItemFilter {
            category: Some(category.into()),
            ..Default::default()
        }
    }

    pub fn with_status(mut self, status: ItemStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }
}

/// `%term%` with LIKE wildcards in the term escaped.
fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

// =============================================================================
// Repository
// =============================================================================

/// Repository for the jewelry catalogue.
#[derive(Debug, Clone)]
pub struct ItemRepository {
    pool: SqlitePool,
}

impl ItemRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ItemRepository { pool }
    }

    /// Every item, newest first.
    pub async fn list(&self) -> DbResult<Vec<JewelryItem>> {
        self.list_filtered(&ItemFilter::default()).await
    }

    /// Items matching the filter, newest first.
    pub async fn list_filtered(&self, filter: &ItemFilter) -> DbResult<Vec<JewelryItem>> {
        let query = match filter.query.as_deref() {
            Some(q) => Some(validate_search_query(q)?).filter(|q| !q.is_empty()),
            None => None,
        };
        let category = filter.category.as_deref().map(str::trim).filter(|c| !c.is_empty());

        debug!(?category, status = ?filter.status, ?query, "Listing jewelry items");

        let sql = format!(
            "{SELECT_COLUMNS} \
             WHERE (?1 IS NULL OR category = ?1) \
               AND (?2 IS NULL OR status = ?2) \
               AND (?3 IS NULL \
                    OR name LIKE ?3 ESCAPE '\\' \
                    OR category LIKE ?3 ESCAPE '\\' \
                    OR description LIKE ?3 ESCAPE '\\') \
             ORDER BY created_at DESC, name"
        );

        let rows = sqlx::query_as::<_, ItemRow>(&sql)
            .bind(category)
            .bind(filter.status.map(|s| s.as_str()))
            .bind(query.as_deref().map(like_pattern))
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Listed jewelry items");
        rows.into_iter().map(JewelryItem::try_from).collect()
    }

    /// `Ok(None)` when no item has this id.
    pub async fn get(&self, id: &str) -> DbResult<Option<JewelryItem>> {
        let sql = format!("{SELECT_COLUMNS} WHERE id = ?1");
        let row = sqlx::query_as::<_, ItemRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(JewelryItem::try_from).transpose()
    }

    /// Validates and inserts a new item, returning it with its id.
    pub async fn add(&self, new_item: &NewJewelryItem) -> DbResult<JewelryItem> {
        validate_new_item(new_item)?;

        let now = Utc::now();
        let item = JewelryItem {
            id: Uuid::new_v4().to_string(),
            name: new_item.name.trim().to_string(),
            category: new_item.category.trim().to_string(),
            image_ref: new_item.image_ref.clone(),
            metal_type: new_item.metal_type.clone(),
            purity: new_item.purity.clone(),
            weight_grams: new_item.weight_grams,
            making_charge: new_item.making_charge,
            description: new_item.description.clone(),
            status: new_item.status,
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            r#"
            INSERT INTO jewelry_items (
                id, name, category, image_ref, metal_type, purity,
                weight_grams, making_charge, description, status,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(&item.category)
        .bind(&item.image_ref)
        .bind(&item.metal_type)
        .bind(&item.purity)
        .bind(item.weight_grams.to_string())
        .bind(item.making_charge.to_string())
        .bind(&item.description)
        .bind(item.status.as_str())
        .bind(item.created_at)
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        info!(id = %item.id, name = %item.name, "Jewelry item added");
        Ok(item)
    }

    /// Applies a partial update and returns the stored result.
    pub async fn update(&self, id: &str, patch: &JewelryItemPatch) -> DbResult<JewelryItem> {
        validate_patch(patch)?;

        let mut item = self
            .get(id)
            .await?
            .ok_or_else(|| DbError::not_found("Jewelry item", id))?;

        if patch.is_empty() {
            return Ok(item);
        }

        patch.apply_to(&mut item);
        item.updated_at = Utc::now();

        let result = sqlx::query(
            r#"
            UPDATE jewelry_items SET
                name = ?2,
                category = ?3,
                image_ref = ?4,
                metal_type = ?5,
                purity = ?6,
                weight_grams = ?7,
                making_charge = ?8,
                description = ?9,
                status = ?10,
                updated_at = ?11
            WHERE id = ?1
            "#,
        )
        .bind(&item.id)
        .bind(&item.name)
        .bind(&item.category)
        .bind(&item.image_ref)
        .bind(&item.metal_type)
        .bind(&item.purity)
        .bind(item.weight_grams.to_string())
        .bind(item.making_charge.to_string())
        .bind(&item.description)
        .bind(item.status.as_str())
        .bind(item.updated_at)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Jewelry item", id));
        }

        debug!(id = %id, "Jewelry item updated");
        Ok(item)
    }

    /// Permanently removes an item.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM jewelry_items WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Jewelry item", id));
        }

        info!(id = %id, "Jewelry item deleted");
        Ok(())
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM jewelry_items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
