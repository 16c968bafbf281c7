// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Admin role - can manage the catalog from the admin console
pub const ROLE_ADMIN: &str = "admin";

// =============================================================================
// CATEGORY LIMITS
// =============================================================================

pub const CATEGORY_NAME_MAX_LEN: u64 = 120;
pub const CATEGORY_SLUG_MAX_LEN: u64 = 200;
pub const CATEGORY_DESCRIPTION_MAX_LEN: u64 = 500;

/// Icons are single glyphs or short emoji sequences, not markup
pub const CATEGORY_ICON_MAX_LEN: u64 = 32;

/// Deepest level a category tree listing emits. A node that would sit
/// deeper is listed as a root of its own subtree instead.
pub const CATEGORY_TREE_MAX_DEPTH: usize = 32;
