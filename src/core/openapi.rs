use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::categories::handlers::{admin_category_handler, category_handler};
use crate::features::categories::{dtos as categories_dtos, models as categories_models};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Categories (public)
        category_handler::list_categories,
        category_handler::get_category,
        // Categories (admin)
        admin_category_handler::list_categories,
        admin_category_handler::get_category,
        admin_category_handler::create_category,
        admin_category_handler::update_category,
        admin_category_handler::delete_category,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Categories
            categories_models::CategorySeo,
            categories_models::VisualType,
            categories_dtos::SortDirection,
            categories_dtos::CategorySort,
            categories_dtos::CreateCategoryDto,
            categories_dtos::UpdateCategoryDto,
            categories_dtos::CategoryResponseDto,
            categories_dtos::CategoryTreeDto,
            categories_dtos::CategoryListing,
            ApiResponse<categories_dtos::CategoryListing>,
            ApiResponse<categories_dtos::CategoryResponseDto>,
        )
    ),
    tags(
        (name = "categories", description = "Storefront category hierarchy (public)"),
        (name = "admin-categories", description = "Category management for the admin console (admin role)"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "Catalog Admin API",
        version = "0.1.0",
        description = "Category hierarchy and audit trail for the admin console",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to OpenAPI spec
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
