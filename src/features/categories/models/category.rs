use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{types::Json, FromRow};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::shared::validation::trimmed;

/// Database model for category
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub icon: Option<String>,
    pub is_active: bool,
    pub position: i32,
    pub products_count: i32,
    pub seo: Option<Json<CategorySeo>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Derived at read time, never stored
    pub fn visual_type(&self) -> Option<VisualType> {
        if self.icon.is_some() {
            Some(VisualType::Icon)
        } else if self.image.is_some() {
            Some(VisualType::Image)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum VisualType {
    Image,
    Icon,
}

/// Search-engine metadata, stored as JSONB
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct CategorySeo {
    #[validate(length(max = 70))]
    pub meta_title: Option<String>,

    #[validate(length(max = 160))]
    pub meta_description: Option<String>,

    #[serde(default)]
    #[validate(length(max = 20))]
    pub keywords: Vec<String>,
}

impl CategorySeo {
    /// Trim every value and drop the blank ones
    pub fn normalize(self) -> Self {
        Self {
            meta_title: trimmed(self.meta_title),
            meta_description: trimmed(self.meta_description),
            keywords: self
                .keywords
                .into_iter()
                .filter_map(|k| trimmed(Some(k)))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.meta_title.is_none() && self.meta_description.is_none() && self.keywords.is_empty()
    }
}
