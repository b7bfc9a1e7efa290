// =============================================================================
// ROLE CONSTANTS
// =============================================================================

/// Admin role - full access, manages users, coordinates and employee records
pub const ROLE_ADMIN: &str = "admin";

/// Operator role - can read and update employee records
pub const ROLE_OPERATOR: &str = "operator";

/// User role - read-only access
#[allow(dead_code)]
pub const ROLE_USER: &str = "user";

// =============================================================================
// TIME
// =============================================================================

/// WITA (UTC+8), local time of Nusa Tenggara Barat
pub const WITA_OFFSET_SECS: i32 = 8 * 3600;
