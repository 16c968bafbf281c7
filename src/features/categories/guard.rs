//! Business rules every category write must pass before touching storage.
//!
//! The checks are pure: callers load the relevant store state (the current
//! record, the holder of the proposed slug) and hand it in.

use axum::http::StatusCode;
use thiserror::Error;

use crate::features::categories::dtos::{CreateCategoryDto, UpdateCategoryDto};
use crate::features::categories::models::Category;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GuardRejection {
    #[error("Category name is required")]
    MissingName,

    #[error("Category slug is required")]
    MissingSlug,

    #[error("A category with this slug already exists")]
    DuplicateSlug,

    #[error("A category can have an image or an icon, not both")]
    BothVisualTypes,

    #[error("Category not found")]
    CategoryNotFound,
}

impl GuardRejection {
    pub fn code(&self) -> &'static str {
        match self {
            GuardRejection::MissingName => "missing_name",
            GuardRejection::MissingSlug => "missing_slug",
            GuardRejection::DuplicateSlug => "duplicate_slug",
            GuardRejection::BothVisualTypes => "both_visual_types",
            GuardRejection::CategoryNotFound => "category_not_found",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            GuardRejection::DuplicateSlug => StatusCode::CONFLICT,
            GuardRejection::CategoryNotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

/// Required fields of an accepted create request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategoryFields {
    pub name: String,
    pub slug: String,
}

fn is_filled(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.is_empty())
}

/// `slug_holder` is whichever category currently owns the proposed slug.
pub fn check_create(
    dto: &CreateCategoryDto,
    slug_holder: Option<&Category>,
) -> Result<NewCategoryFields, GuardRejection> {
    let name = dto
        .name
        .as_deref()
        .filter(|n| !n.is_empty())
        .ok_or(GuardRejection::MissingName)?;

    let slug = dto
        .slug
        .as_deref()
        .filter(|s| !s.is_empty())
        .ok_or(GuardRejection::MissingSlug)?;

    if slug_holder.is_some() {
        return Err(GuardRejection::DuplicateSlug);
    }

    if is_filled(dto.image.as_deref()) && is_filled(dto.icon.as_deref()) {
        return Err(GuardRejection::BothVisualTypes);
    }

    Ok(NewCategoryFields {
        name: name.to_string(),
        slug: slug.to_string(),
    })
}

/// Returns the record the patch applies to.
///
/// A present but blank name or slug would strip a required field, so it is
/// rejected the same way as on create.
pub fn check_update<'a>(
    current: Option<&'a Category>,
    patch: &UpdateCategoryDto,
    slug_holder: Option<&Category>,
) -> Result<&'a Category, GuardRejection> {
    let current = current.ok_or(GuardRejection::CategoryNotFound)?;

    if patch.name.as_deref().is_some_and(str::is_empty) {
        return Err(GuardRejection::MissingName);
    }

    if let Some(slug) = patch.slug.as_deref() {
        if slug.is_empty() {
            return Err(GuardRejection::MissingSlug);
        }

        let taken = slug != current.slug && slug_holder.is_some_and(|h| h.id != current.id);
        if taken {
            return Err(GuardRejection::DuplicateSlug);
        }
    }

    if is_filled(patch.image.as_deref()) && is_filled(patch.icon.as_deref()) {
        return Err(GuardRejection::BothVisualTypes);
    }

    Ok(current)
}

/// Only active categories can be removed
pub fn check_remove(current: Option<&Category>) -> Result<&Category, GuardRejection> {
    current
        .filter(|c| c.is_active)
        .ok_or(GuardRejection::CategoryNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn category(slug: &str) -> Category {
        let now = Utc::now();
        Category {
            id: Uuid::now_v7(),
            parent_id: None,
            name: "Industrial".to_string(),
            slug: slug.to_string(),
            description: None,
            image: None,
            icon: Some("⚖️".to_string()),
            is_active: true,
            position: 0,
            products_count: 0,
            seo: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn create_dto(name: Option<&str>, slug: Option<&str>) -> CreateCategoryDto {
        CreateCategoryDto {
            name: name.map(str::to_string),
            slug: slug.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_rejection_codes() {
        assert_eq!(GuardRejection::MissingName.code(), "missing_name");
        assert_eq!(GuardRejection::BothVisualTypes.code(), "both_visual_types");
        assert_eq!(GuardRejection::CategoryNotFound.code(), "category_not_found");
    }

    #[test]
    fn test_create_accepts_valid_input() {
        let dto = create_dto(Some("Industrial"), Some("industrial"));
        let fields = check_create(&dto, None).unwrap();

        assert_eq!(fields.name, "Industrial");
        assert_eq!(fields.slug, "industrial");
    }

    #[test]
    fn test_create_requires_name_then_slug() {
        assert_eq!(
            check_create(&create_dto(None, None), None),
            Err(GuardRejection::MissingName)
        );
        assert_eq!(
            check_create(&create_dto(Some(""), Some("industrial")), None),
            Err(GuardRejection::MissingName)
        );
        assert_eq!(
            check_create(&create_dto(Some("Industrial"), None), None),
            Err(GuardRejection::MissingSlug)
        );
    }

    #[test]
    fn test_create_rejects_taken_slug() {
        let existing = category("industrial");
        let dto = create_dto(Some("Industrial"), Some("industrial"));

        assert_eq!(
            check_create(&dto, Some(&existing)),
            Err(GuardRejection::DuplicateSlug)
        );
    }

    #[test]
    fn test_create_rejects_image_with_icon() {
        let dto = CreateCategoryDto {
            image: Some("http://x/a.png".to_string()),
            icon: Some("⚖️".to_string()),
            ..create_dto(Some("Industrial"), Some("industrial"))
        };

        assert_eq!(check_create(&dto, None), Err(GuardRejection::BothVisualTypes));
    }

    #[test]
    fn test_update_unknown_category_is_checked_first() {
        let patch = UpdateCategoryDto {
            name: Some("".to_string()),
            ..Default::default()
        };

        assert_eq!(
            check_update(None, &patch, None).unwrap_err(),
            GuardRejection::CategoryNotFound
        );
    }

    #[test]
    fn test_update_rejects_blank_required_fields() {
        let current = category("industrial");

        let blank_name = UpdateCategoryDto {
            name: Some("".to_string()),
            ..Default::default()
        };
        let blank_slug = UpdateCategoryDto {
            slug: Some("".to_string()),
            ..Default::default()
        };

        assert_eq!(
            check_update(Some(&current), &blank_name, None).unwrap_err(),
            GuardRejection::MissingName
        );
        assert_eq!(
            check_update(Some(&current), &blank_slug, None).unwrap_err(),
            GuardRejection::MissingSlug
        );
    }

    #[test]
    fn test_update_keeping_own_slug_is_no_collision() {
        let current = category("industrial");
        let patch = UpdateCategoryDto {
            slug: Some("industrial".to_string()),
            ..Default::default()
        };

        let accepted = check_update(Some(&current), &patch, Some(&current)).unwrap();
        assert_eq!(accepted.id, current.id);
    }

    #[test]
    fn test_update_rejects_slug_owned_by_another_category() {
        let current = category("industrial");
        let other = category("retail");
        let patch = UpdateCategoryDto {
            slug: Some("retail".to_string()),
            ..Default::default()
        };

        assert_eq!(
            check_update(Some(&current), &patch, Some(&other)).unwrap_err(),
            GuardRejection::DuplicateSlug
        );
    }

    #[test]
    fn test_update_rejects_image_with_icon() {
        let current = category("industrial");
        let patch = UpdateCategoryDto {
            image: Some("http://x/a.png".to_string()),
            icon: Some("⚖️".to_string()),
            ..Default::default()
        };

        assert_eq!(
            check_update(Some(&current), &patch, None).unwrap_err(),
            GuardRejection::BothVisualTypes
        );
    }

    #[test]
    fn test_update_image_alone_is_accepted_over_stored_icon() {
        let current = category("industrial");
        let patch = UpdateCategoryDto {
            image: Some("http://x/a.png".to_string()),
            ..Default::default()
        };

        assert!(check_update(Some(&current), &patch, None).is_ok());
    }

    #[test]
    fn test_remove_requires_active_category() {
        let mut current = category("industrial");
        assert!(check_remove(Some(&current)).is_ok());

        current.is_active = false;
        assert_eq!(
            check_remove(Some(&current)).unwrap_err(),
            GuardRejection::CategoryNotFound
        );
        assert_eq!(check_remove(None).unwrap_err(), GuardRejection::CategoryNotFound);
    }
}
