use std::sync::Arc;

use chrono::{DateTime, SubsecRound, Utc};
use sqlx::types::Json;
use uuid::Uuid;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::audit_logs::models::{AuditAction, AuditEntity};
use crate::features::audit_logs::AuditRecorder;
use crate::features::categories::dtos::{
    CategoryListing, CategoryResponseDto, CategoryTreeDto, CreateCategoryDto, UpdateCategoryDto,
};
use crate::features::categories::guard;
use crate::features::categories::models::Category;
use crate::features::categories::repositories::{CategoryFilter, CategoryRepository};
use crate::features::categories::tree::build_forest;
use crate::shared::validation::{normalize_slug, trimmed};

fn validate<T: Validate>(dto: &T) -> Result<()> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))
}

/// Timestamps are kept at the precision PostgreSQL stores
fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

/// Apply the present fields of a guarded patch on top of `current`
fn merge_patch(current: &Category, patch: UpdateCategoryDto, at: DateTime<Utc>) -> Category {
    let mut next = current.clone();

    if let Some(name) = patch.name {
        next.name = name;
    }
    if let Some(slug) = patch.slug {
        next.slug = slug;
    }
    if let Some(description) = patch.description {
        next.description = trimmed(Some(description));
    }

    // A new visual replaces the other kind
    if let Some(image) = patch.image {
        next.image = trimmed(Some(image));
        if next.image.is_some() {
            next.icon = None;
        }
    }
    if let Some(icon) = patch.icon {
        next.icon = trimmed(Some(icon));
        if next.icon.is_some() {
            next.image = None;
        }
    }

    if let Some(parent_id) = patch.parent_id {
        next.parent_id = parent_id;
    }
    if let Some(is_active) = patch.is_active {
        next.is_active = is_active;
    }
    if let Some(position) = patch.position {
        next.position = position;
    }
    if let Some(seo) = patch.seo {
        next.seo = Some(seo).filter(|s| !s.is_empty()).map(Json);
    }

    next.updated_at = at;
    next
}

/// Service for category operations.
///
/// Every write runs normalization, field validation and the mutation guard,
/// then hands the new record and its audit entry to the store together.
pub struct CategoryService {
    repo: Arc<dyn CategoryRepository>,
    audit: AuditRecorder,
}

impl CategoryService {
    pub fn new(repo: Arc<dyn CategoryRepository>) -> Self {
        Self {
            repo,
            audit: AuditRecorder::for_entity(AuditEntity::Category),
        }
    }

    /// Flat or nested listing, plus the number of matched records
    pub async fn list(&self, filter: &CategoryFilter, tree: bool) -> Result<(CategoryListing, i64)> {
        let categories = self.repo.list(filter).await?;
        let total = categories.len() as i64;

        let listing = if tree {
            CategoryListing::Tree(
                build_forest(categories)
                    .into_iter()
                    .map(CategoryTreeDto::from)
                    .collect(),
            )
        } else {
            CategoryListing::Flat(categories.into_iter().map(|c| c.into()).collect())
        };

        Ok((listing, total))
    }

    /// Admin lookup, soft-deleted records included
    pub async fn get_by_id(&self, id: Uuid) -> Result<CategoryResponseDto> {
        self.repo
            .find_by_id(id)
            .await?
            .map(|c| c.into())
            .ok_or_else(|| guard::GuardRejection::CategoryNotFound.into())
    }

    /// Get an active category by slug
    pub async fn get_by_slug(&self, slug: &str) -> Result<CategoryResponseDto> {
        let slug = normalize_slug(slug);

        self.repo
            .find_by_slug(&slug)
            .await?
            .filter(|c| c.is_active)
            .map(|c| c.into())
            .ok_or_else(|| AppError::NotFound(format!("Category '{}' not found", slug)))
    }

    pub async fn create(&self, admin_id: &str, dto: CreateCategoryDto) -> Result<CategoryResponseDto> {
        let dto = dto.normalize();
        validate(&dto)?;

        let slug_holder = match dto.slug.as_deref() {
            Some(slug) => self.repo.find_by_slug(slug).await?,
            None => None,
        };
        let fields = guard::check_create(&dto, slug_holder.as_ref())?;

        let at = now();
        let category = Category {
            id: Uuid::now_v7(),
            parent_id: dto.parent_id,
            name: fields.name,
            slug: fields.slug,
            description: dto.description,
            image: dto.image,
            icon: dto.icon,
            is_active: true,
            position: dto.position.unwrap_or(0),
            products_count: 0,
            seo: dto.seo.map(Json),
            created_at: at,
            updated_at: at,
        };

        let entry = self.audit.capture(
            admin_id,
            AuditAction::Create,
            &category.id.to_string(),
            None,
            Some(&category),
        )?;
        let saved = self.repo.insert(&category, &entry).await?;

        tracing::info!(admin_id, category_id = %saved.id, slug = %saved.slug, "Category created");

        Ok(saved.into())
    }

    pub async fn update(
        &self,
        admin_id: &str,
        id: Uuid,
        dto: UpdateCategoryDto,
    ) -> Result<CategoryResponseDto> {
        let dto = dto.normalize();
        validate(&dto)?;

        let current = self.repo.find_by_id(id).await?;
        let slug_holder = match dto.slug.as_deref() {
            Some(slug) if !slug.is_empty() => self.repo.find_by_slug(slug).await?,
            _ => None,
        };
        let current = guard::check_update(current.as_ref(), &dto, slug_holder.as_ref())?;

        let next = merge_patch(current, dto, now());
        let entry = self.audit.capture(
            admin_id,
            AuditAction::Update,
            &id.to_string(),
            Some(current),
            Some(&next),
        )?;
        let saved = self.repo.update(&next, &entry).await?;

        tracing::info!(admin_id, category_id = %id, "Category updated");

        Ok(saved.into())
    }

    /// Soft delete: the record stays, its slug stays reserved
    pub async fn remove(&self, admin_id: &str, id: Uuid) -> Result<()> {
        let current = self.repo.find_by_id(id).await?;
        let current = guard::check_remove(current.as_ref())?;

        let mut next = current.clone();
        next.is_active = false;
        next.updated_at = now();

        let entry = self.audit.capture(
            admin_id,
            AuditAction::Delete,
            &id.to_string(),
            Some(current),
            Some(&next),
        )?;
        self.repo.update(&next, &entry).await?;

        tracing::info!(admin_id, category_id = %id, "Category deactivated");

        Ok(())
    }
}
