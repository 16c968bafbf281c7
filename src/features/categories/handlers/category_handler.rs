use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    Json,
};

use crate::core::error::Result;
use crate::features::categories::dtos::{CategoryListing, CategoryResponseDto, ListCategoriesQuery};
use crate::features::categories::services::CategoryService;
use crate::shared::types::{ApiResponse, Meta};

/// List all active categories
///
/// Returns categories as flat list or tree structure based on `tree` query param.
#[utoipa::path(
    get,
    path = "/api/categories",
    params(ListCategoriesQuery),
    responses(
        (status = 200, description = "List of categories", body = ApiResponse<CategoryListing>),
    ),
    tag = "categories"
)]
pub async fn list_categories(
    State(service): State<Arc<CategoryService>>,
    Query(query): Query<ListCategoriesQuery>,
) -> Result<Json<ApiResponse<CategoryListing>>> {
    let (listing, total) = service.list(&query.to_filter(false), query.tree).await?;

    Ok(Json(ApiResponse::success(
        Some(listing),
        None,
        Some(Meta { total }),
    )))
}

/// Get category by slug
#[utoipa::path(
    get,
    path = "/api/categories/{slug}",
    params(
        ("slug" = String, Path, description = "Category slug")
    ),
    responses(
        (status = 200, description = "Category found", body = ApiResponse<CategoryResponseDto>),
        (status = 404, description = "Category not found")
    ),
    tag = "categories"
)]
pub async fn get_category(
    State(service): State<Arc<CategoryService>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<CategoryResponseDto>>> {
    let category = service.get_by_slug(&slug).await?;
    Ok(Json(ApiResponse::success(Some(category), None, None)))
}

#[cfg(test)]
mod tests {
    use crate::features::categories::repositories::in_memory::{
        sample_category, InMemoryCategoryRepository,
    };
    use crate::features::categories::routes::routes;
    use crate::features::categories::services::CategoryService;
    use axum::http::StatusCode;
    use axum_test::TestServer;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use uuid::Uuid;

    /// Scales > (Floor, Bench), plus a soft-deleted "Retired" root
    fn seeded_server() -> (TestServer, Uuid) {
        let repo = Arc::new(InMemoryCategoryRepository::new());
        let scales = repo.seed(sample_category("Scales", "scales"));

        let mut floor = sample_category("Floor Scales", "floor-scales");
        floor.parent_id = Some(scales.id);
        repo.seed(floor);

        let mut bench = sample_category("Bench Scales", "bench-scales");
        bench.parent_id = Some(scales.id);
        repo.seed(bench);

        let mut retired = sample_category("Retired", "retired");
        retired.is_active = false;
        repo.seed(retired);

        let service = Arc::new(CategoryService::new(repo));
        (TestServer::new(routes(service)).unwrap(), scales.id)
    }

    fn slugs(body: &Value) -> Vec<String> {
        body["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["slug"].as_str().unwrap().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_public_listing_never_includes_inactive() {
        let (server, _) = seeded_server();

        let response = server
            .get("/api/categories")
            .add_query_param("include_inactive", "true")
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        assert!(!slugs(&body).contains(&"retired".to_string()));
        assert_eq!(body["meta"]["total"], json!(3));
    }

    #[tokio::test]
    async fn test_tree_listing_nests_children() {
        let (server, _) = seeded_server();

        let response = server
            .get("/api/categories")
            .add_query_param("tree", "true")
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        let roots = body["data"].as_array().unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0]["slug"], json!("scales"));

        let children: Vec<&str> = roots[0]["children"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["slug"].as_str().unwrap())
            .collect();
        assert_eq!(children, vec!["bench-scales", "floor-scales"]);
    }

    #[tokio::test]
    async fn test_tree_listing_survives_long_parent_chain() {
        let repo = Arc::new(InMemoryCategoryRepository::new());
        let mut parent_id = None;
        for i in 0..10_000 {
            let mut category = sample_category(&format!("Level {}", i), &format!("level-{}", i));
            category.parent_id = parent_id;
            parent_id = Some(repo.seed(category).id);
        }
        let server = TestServer::new(routes(Arc::new(CategoryService::new(repo)))).unwrap();

        let response = server
            .get("/api/categories")
            .add_query_param("tree", "true")
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["meta"]["total"], json!(10_000));
    }

    #[tokio::test]
    async fn test_search_and_parent_filters_narrow_results() {
        let (server, scales_id) = seeded_server();

        let response = server
            .get("/api/categories")
            .add_query_param("search", "FLOOR")
            .await;
        assert_eq!(slugs(&response.json()), vec!["floor-scales"]);

        let response = server
            .get("/api/categories")
            .add_query_param("parent_id", scales_id)
            .await;
        assert_eq!(
            slugs(&response.json()),
            vec!["bench-scales", "floor-scales"]
        );

        let response = server
            .get("/api/categories")
            .add_query_param("search", "_")
            .await;
        assert!(slugs(&response.json()).is_empty());
    }

    #[tokio::test]
    async fn test_get_by_slug() {
        let (server, _) = seeded_server();

        let response = server.get("/api/categories/floor-scales").await;
        assert_eq!(response.status_code(), StatusCode::OK);
        let body: Value = response.json();
        assert_eq!(body["data"]["name"], json!("Floor Scales"));
    }

    #[tokio::test]
    async fn test_inactive_or_unknown_slug_is_not_found() {
        let (server, _) = seeded_server();

        let response = server.get("/api/categories/retired").await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

        let response = server.get("/api/categories/no-such-category").await;
        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["success"], json!(false));
    }
}
