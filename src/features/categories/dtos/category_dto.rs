use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::features::categories::models::{Category, CategorySeo, VisualType};
use crate::features::categories::repositories::CategoryFilter;
use crate::features::categories::tree::CategoryNode;
use crate::shared::constants::{
    CATEGORY_DESCRIPTION_MAX_LEN, CATEGORY_ICON_MAX_LEN, CATEGORY_NAME_MAX_LEN,
    CATEGORY_SLUG_MAX_LEN,
};
use crate::shared::validation::{
    deserialize_present, normalize_slug, trimmed, validate_image_url, validate_slug,
};

// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_sql(&self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum CategorySort {
    #[default]
    Position,
    Name,
    CreatedAt,
}

impl CategorySort {
    pub fn column(&self) -> &'static str {
        match self {
            CategorySort::Position => "position",
            CategorySort::Name => "name",
            CategorySort::CreatedAt => "created_at",
        }
    }
}

/// Query params for listing categories
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct ListCategoriesQuery {
    /// If true, return tree structure. Default: false (flat list)
    #[serde(default)]
    pub tree: bool,

    /// Include soft-deleted categories (admin listing only)
    #[serde(default)]
    pub include_inactive: bool,

    /// Only direct children of this category
    pub parent_id: Option<Uuid>,

    /// Case-insensitive match on name or slug
    pub search: Option<String>,

    #[serde(default)]
    pub sort: CategorySort,

    #[serde(default)]
    pub direction: SortDirection,
}

impl ListCategoriesQuery {
    /// `allow_inactive` is false on public routes, which never expose soft-deleted rows
    pub fn to_filter(&self, allow_inactive: bool) -> CategoryFilter {
        CategoryFilter {
            include_inactive: allow_inactive && self.include_inactive,
            parent_id: self.parent_id,
            search: trimmed(self.search.clone()),
            sort: self.sort,
            direction: self.direction,
        }
    }
}

/// Create request. `name` and `slug` are optional here so that a missing
/// value is reported as `missing_name` / `missing_slug`.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct CreateCategoryDto {
    #[validate(length(max = CATEGORY_NAME_MAX_LEN))]
    pub name: Option<String>,

    /// Lowercased before validation
    #[validate(length(max = CATEGORY_SLUG_MAX_LEN), custom(function = validate_slug))]
    pub slug: Option<String>,

    #[validate(length(max = CATEGORY_DESCRIPTION_MAX_LEN))]
    pub description: Option<String>,

    pub parent_id: Option<Uuid>,

    #[validate(custom(function = validate_image_url))]
    pub image: Option<String>,

    #[validate(length(max = CATEGORY_ICON_MAX_LEN))]
    pub icon: Option<String>,

    pub position: Option<i32>,

    #[validate(nested)]
    pub seo: Option<CategorySeo>,
}

impl CreateCategoryDto {
    /// Trim text, lowercase the slug, and map blank values to absent
    pub fn normalize(self) -> Self {
        Self {
            name: trimmed(self.name),
            slug: trimmed(self.slug).map(|s| normalize_slug(&s)),
            description: trimmed(self.description),
            parent_id: self.parent_id,
            image: trimmed(self.image),
            icon: trimmed(self.icon),
            position: self.position,
            seo: self.seo.map(CategorySeo::normalize).filter(|s| !s.is_empty()),
        }
    }
}

/// Partial update. Absent fields are left untouched.
///
/// Text fields clear with an empty string. `parent_id: null` moves the
/// category to the root. Fields outside this struct are ignored.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
pub struct UpdateCategoryDto {
    #[validate(length(max = CATEGORY_NAME_MAX_LEN))]
    pub name: Option<String>,

    #[validate(length(max = CATEGORY_SLUG_MAX_LEN), custom(function = validate_slug))]
    pub slug: Option<String>,

    #[validate(length(max = CATEGORY_DESCRIPTION_MAX_LEN))]
    pub description: Option<String>,

    #[validate(custom(function = validate_image_url))]
    pub image: Option<String>,

    #[validate(length(max = CATEGORY_ICON_MAX_LEN))]
    pub icon: Option<String>,

    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = Option<Uuid>)]
    pub parent_id: Option<Option<Uuid>>,

    pub is_active: Option<bool>,

    pub position: Option<i32>,

    /// Replaces the stored metadata; an empty object clears it
    #[validate(nested)]
    pub seo: Option<CategorySeo>,
}

impl UpdateCategoryDto {
    /// Trim text and lowercase the slug. Blank values stay present: a blank
    /// name or slug is rejected later, a blank description/image/icon clears.
    pub fn normalize(self) -> Self {
        let trim = |v: Option<String>| v.map(|s| s.trim().to_string());
        Self {
            name: trim(self.name),
            slug: self.slug.map(|s| normalize_slug(&s)),
            description: trim(self.description),
            image: trim(self.image),
            icon: trim(self.icon),
            parent_id: self.parent_id,
            is_active: self.is_active,
            position: self.position,
            seo: self.seo.map(CategorySeo::normalize),
        }
    }
}

/// Response DTO for category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub icon: Option<String>,
    pub visual_type: Option<VisualType>,
    pub is_active: bool,
    pub position: i32,
    pub products_count: i32,
    pub seo: Option<CategorySeo>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Category> for CategoryResponseDto {
    fn from(c: Category) -> Self {
        let visual_type = c.visual_type();
        Self {
            id: c.id,
            parent_id: c.parent_id,
            name: c.name,
            slug: c.slug,
            description: c.description,
            image: c.image,
            icon: c.icon,
            visual_type,
            is_active: c.is_active,
            position: c.position,
            products_count: c.products_count,
            seo: c.seo.map(|seo| seo.0),
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Response DTO for category tree (hierarchical structure)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(no_recursion)]
pub struct CategoryTreeDto {
    #[serde(flatten)]
    pub category: CategoryResponseDto,
    pub children: Vec<CategoryTreeDto>,
}

impl From<CategoryNode> for CategoryTreeDto {
    fn from(node: CategoryNode) -> Self {
        Self {
            category: node.category.into(),
            children: node.children.into_iter().map(Self::from).collect(),
        }
    }
}

/// Flat or nested listing, depending on the `tree` query param
#[derive(Debug, Serialize, ToSchema)]
#[serde(untagged)]
pub enum CategoryListing {
    Flat(Vec<CategoryResponseDto>),
    Tree(Vec<CategoryTreeDto>),
}
