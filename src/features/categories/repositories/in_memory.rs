//! Process-local store used by service and handler tests.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{SubsecRound, Utc};
use fake::faker::lorem::en::Sentence;
use fake::Fake;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::audit_logs::models::AuditLogEntry;
use crate::features::categories::dtos::{CategorySort, SortDirection};
use crate::features::categories::guard::GuardRejection;
use crate::features::categories::models::Category;

use super::{CategoryFilter, CategoryRepository};

#[derive(Default)]
struct State {
    categories: Vec<Category>,
    audit_log: Vec<AuditLogEntry>,
    fail_audit: bool,
}

/// Mirrors the table constraints (unique slug, single visual) so that tests
/// can exercise the storage backstop.
#[derive(Default)]
pub struct InMemoryCategoryRepository {
    state: Mutex<State>,
}

impl InMemoryCategoryRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    /// Store a record directly, bypassing the audit trail
    pub fn seed(&self, category: Category) -> Category {
        self.lock().categories.push(category.clone());
        category
    }

    pub fn get(&self, id: Uuid) -> Option<Category> {
        self.lock().categories.iter().find(|c| c.id == id).cloned()
    }

    pub fn audit_entries(&self) -> Vec<AuditLogEntry> {
        self.lock().audit_log.clone()
    }

    /// Make every following audit append fail
    pub fn fail_audit_appends(&self) {
        self.lock().fail_audit = true;
    }
}

/// An active root category with a random description
pub fn sample_category(name: &str, slug: &str) -> Category {
    let now = Utc::now().trunc_subsecs(6);
    Category {
        id: Uuid::now_v7(),
        parent_id: None,
        name: name.to_string(),
        slug: slug.to_string(),
        description: Some(Sentence(3..8).fake()),
        image: None,
        icon: None,
        is_active: true,
        position: 0,
        products_count: 0,
        seo: None,
        created_at: now,
        updated_at: now,
    }
}

fn check_constraints(state: &State, category: &Category) -> Result<()> {
    let slug_taken = state
        .categories
        .iter()
        .any(|c| c.slug == category.slug && c.id != category.id);
    if slug_taken {
        return Err(GuardRejection::DuplicateSlug.into());
    }

    if category.image.is_some() && category.icon.is_some() {
        return Err(GuardRejection::BothVisualTypes.into());
    }

    if state.fail_audit {
        return Err(AppError::Database(sqlx::Error::PoolTimedOut));
    }

    Ok(())
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>> {
        Ok(self.get(id))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>> {
        Ok(self
            .lock()
            .categories
            .iter()
            .find(|c| c.slug == slug)
            .cloned())
    }

    async fn list(&self, filter: &CategoryFilter) -> Result<Vec<Category>> {
        let search = filter.search.as_ref().map(|s| s.to_lowercase());

        let mut categories: Vec<Category> = self
            .lock()
            .categories
            .iter()
            .filter(|c| filter.include_inactive || c.is_active)
            .filter(|c| filter.parent_id.is_none() || c.parent_id == filter.parent_id)
            .filter(|c| {
                search.as_ref().is_none_or(|s| {
                    c.name.to_lowercase().contains(s.as_str()) || c.slug.contains(s.as_str())
                })
            })
            .cloned()
            .collect();

        categories.sort_by(|a, b| {
            let primary = match filter.sort {
                CategorySort::Position => a.position.cmp(&b.position),
                CategorySort::Name => a.name.cmp(&b.name),
                CategorySort::CreatedAt => a.created_at.cmp(&b.created_at),
            };
            let primary = match filter.direction {
                SortDirection::Asc => primary,
                SortDirection::Desc => primary.reverse(),
            };
            primary.then_with(|| a.name.cmp(&b.name)).then_with(|| a.id.cmp(&b.id))
        });

        Ok(categories)
    }

    async fn insert(&self, category: &Category, audit: &AuditLogEntry) -> Result<Category> {
        let mut state = self.lock();
        check_constraints(&state, category)?;

        state.categories.push(category.clone());
        state.audit_log.push(audit.clone());
        Ok(category.clone())
    }

    async fn update(&self, category: &Category, audit: &AuditLogEntry) -> Result<Category> {
        let mut state = self.lock();
        check_constraints(&state, category)?;

        let slot = state
            .categories
            .iter_mut()
            .find(|c| c.id == category.id)
            .ok_or(GuardRejection::CategoryNotFound)?;
        *slot = category.clone();

        state.audit_log.push(audit.clone());
        Ok(category.clone())
    }
}
