use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::shared::constants::ROLE_ADMIN;

/// Identity resolved from a verified bearer token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    /// Stable account id, recorded as `admin_id` on audit entries
    pub account_id: String,
    pub sub: String,
    pub roles: Vec<String>,
}

impl AuthenticatedUser {
    pub fn has_role(&self, role: &str) -> bool {
        self.roles.iter().any(|r| r == role)
    }

    pub fn is_admin(&self) -> bool {
        self.has_role(ROLE_ADMIN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_admin() {
        let mut user = AuthenticatedUser {
            account_id: "acc".to_string(),
            sub: "sub".to_string(),
            roles: vec!["editor".to_string()],
        };
        assert!(!user.is_admin());

        user.roles.push("admin".to_string());
        assert!(user.is_admin());
    }
}
