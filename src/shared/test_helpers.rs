#[cfg(test)]
use crate::features::auth::model::AuthenticatedUser;

#[cfg(test)]
use axum::{extract::Request, middleware::Next, response::Response, Router};

#[cfg(test)]
pub const TEST_ADMIN_ID: &str = "test-admin-id";

#[cfg(test)]
pub fn create_admin_user() -> AuthenticatedUser {
    AuthenticatedUser {
        account_id: TEST_ADMIN_ID.to_string(),
        sub: "test-sub".to_string(),
        roles: vec!["admin".to_string()],
    }
}

#[cfg(test)]
pub fn create_viewer_user() -> AuthenticatedUser {
    AuthenticatedUser {
        account_id: "test-viewer-id".to_string(),
        sub: "test-viewer-sub".to_string(),
        roles: vec!["viewer".to_string()],
    }
}

#[cfg(test)]
async fn inject_admin_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_admin_user());
    next.run(request).await
}

#[cfg(test)]
async fn inject_viewer_middleware(mut request: Request, next: Next) -> Response {
    request.extensions_mut().insert(create_viewer_user());
    next.run(request).await
}

/// Stand-in for `auth_middleware`: every request carries the admin identity
#[cfg(test)]
pub fn with_admin_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_admin_middleware))
}

/// Every request carries an authenticated user without the admin role
#[cfg(test)]
pub fn with_viewer_auth(router: Router) -> Router {
    router.layer(axum::middleware::from_fn(inject_viewer_middleware))
}
