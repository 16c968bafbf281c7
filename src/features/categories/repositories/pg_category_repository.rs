use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::audit_logs::models::AuditLogEntry;
use crate::features::audit_logs::repositories::audit_log_repository;
use crate::features::categories::guard::GuardRejection;
use crate::features::categories::models::Category;

use super::{CategoryFilter, CategoryRepository};

const CATEGORY_COLUMNS: &str = "id, parent_id, name, slug, description, image, icon, is_active, \
     position, products_count, seo, created_at, updated_at";

/// Convert database error to more specific AppError
fn handle_db_error(context: &str, e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        let constraint = db_err.constraint().unwrap_or_default();

        // Unique violation (PostgreSQL error code 23505)
        if db_err.code().as_deref() == Some("23505") && constraint == "categories_slug_unique" {
            return GuardRejection::DuplicateSlug.into();
        }

        // Check violation (23514)
        if db_err.code().as_deref() == Some("23514") && constraint == "categories_single_visual" {
            return GuardRejection::BothVisualTypes.into();
        }
    }

    tracing::error!("Failed to {}: {:?}", context, e);
    AppError::Database(e)
}

/// Search text matches literally, so LIKE wildcards are escaped
fn escape_like(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

pub struct PgCategoryRepository {
    pool: PgPool,
}

impl PgCategoryRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CategoryRepository for PgCategoryRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>> {
        let sql = format!("SELECT {} FROM categories WHERE id = $1", CATEGORY_COLUMNS);

        sqlx::query_as::<_, Category>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| handle_db_error("get category by id", e))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        let sql = format!("SELECT {} FROM categories WHERE slug = $1", CATEGORY_COLUMNS);

        sqlx::query_as::<_, Category>(&sql)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| handle_db_error("get category by slug", e))
    }

    async fn list(&self, filter: &CategoryFilter) -> Result<Vec<Category>> {
        let search_pattern = filter
            .search
            .as_ref()
            .map(|s| format!("%{}%", escape_like(s)));

        // Sort column and direction come from closed enums, never from input text
        let sql = format!(
            r#"
            SELECT {}
            FROM categories
            WHERE ($1 OR is_active = TRUE)
              AND ($2::uuid IS NULL OR parent_id = $2)
              AND ($3::text IS NULL OR name ILIKE $3 ESCAPE '\' OR slug ILIKE $3 ESCAPE '\')
            ORDER BY {} {}, name ASC, id ASC
            "#,
            CATEGORY_COLUMNS,
            filter.sort.column(),
            filter.direction.as_sql()
        );

        sqlx::query_as::<_, Category>(&sql)
            .bind(filter.include_inactive)
            .bind(filter.parent_id)
            .bind(search_pattern)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| handle_db_error("list categories", e))
    }

    async fn insert(&self, category: &Category, audit: &AuditLogEntry) -> Result<Category> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| handle_db_error("begin transaction", e))?;

        let sql = format!(
            r#"
            INSERT INTO categories (
                id, parent_id, name, slug, description, image, icon, is_active,
                position, products_count, seo, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {}
            "#,
            CATEGORY_COLUMNS
        );

        let saved = sqlx::query_as::<_, Category>(&sql)
            .bind(category.id)
            .bind(category.parent_id)
            .bind(&category.name)
            .bind(&category.slug)
            .bind(&category.description)
            .bind(&category.image)
            .bind(&category.icon)
            .bind(category.is_active)
            .bind(category.position)
            .bind(category.products_count)
            .bind(&category.seo)
            .bind(category.created_at)
            .bind(category.updated_at)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| handle_db_error("create category", e))?;

        audit_log_repository::append(&mut *tx, audit)
            .await
            .map_err(|e| handle_db_error("append audit entry", e))?;

        tx.commit()
            .await
            .map_err(|e| handle_db_error("commit category create", e))?;

        Ok(saved)
    }

    async fn update(&self, category: &Category, audit: &AuditLogEntry) -> Result<Category> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| handle_db_error("begin transaction", e))?;

        let sql = format!(
            r#"
            UPDATE categories
            SET parent_id = $2, name = $3, slug = $4, description = $5, image = $6,
                icon = $7, is_active = $8, position = $9, seo = $10, updated_at = $11
            WHERE id = $1
            RETURNING {}
            "#,
            CATEGORY_COLUMNS
        );

        // Dropping `tx` on an early return rolls it back
        let saved = sqlx::query_as::<_, Category>(&sql)
            .bind(category.id)
            .bind(category.parent_id)
            .bind(&category.name)
            .bind(&category.slug)
            .bind(&category.description)
            .bind(&category.image)
            .bind(&category.icon)
            .bind(category.is_active)
            .bind(category.position)
            .bind(&category.seo)
            .bind(category.updated_at)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| handle_db_error("update category", e))?
            .ok_or(GuardRejection::CategoryNotFound)?;

        audit_log_repository::append(&mut *tx, audit)
            .await
            .map_err(|e| handle_db_error("append audit entry", e))?;

        tx.commit()
            .await
            .map_err(|e| handle_db_error("commit category update", e))?;

        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like_escapes_wildcards() {
        assert_eq!(escape_like("floor_scales"), "floor\\_scales");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
        assert_eq!(escape_like("bench"), "bench");
    }

    #[test]
    fn test_unmapped_error_stays_a_database_error() {
        let err = handle_db_error("list categories", sqlx::Error::PoolTimedOut);
        assert!(matches!(err, AppError::Database(sqlx::Error::PoolTimedOut)));
    }
}
