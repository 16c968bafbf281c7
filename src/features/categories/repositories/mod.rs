mod pg_category_repository;

#[cfg(test)]
pub mod in_memory;

pub use pg_category_repository::PgCategoryRepository;

use async_trait::async_trait;
use uuid::Uuid;

use crate::core::error::Result;
use crate::features::audit_logs::models::AuditLogEntry;
use crate::features::categories::dtos::{CategorySort, SortDirection};
use crate::features::categories::models::Category;

/// Read filter for category listings
#[derive(Debug, Clone, Default)]
pub struct CategoryFilter {
    pub include_inactive: bool,
    pub parent_id: Option<Uuid>,
    /// Case-insensitive substring of name or slug
    pub search: Option<String>,
    pub sort: CategorySort,
    pub direction: SortDirection,
}

/// Category persistence.
///
/// Writes take the audit entry describing them and commit both together:
/// either the row and its entry are stored, or neither is.
#[async_trait]
pub trait CategoryRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>>;

    /// Looks at inactive rows too, since slugs stay reserved after a soft delete
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>>;

    /// Ordered by the filter's sort, then name, then id
    async fn list(&self, filter: &CategoryFilter) -> Result<Vec<Category>>;

    async fn insert(&self, category: &Category, audit: &AuditLogEntry) -> Result<Category>;

    /// Full-row write keyed by `category.id`
    async fn update(&self, category: &Category, audit: &AuditLogEntry) -> Result<Category>;
}
