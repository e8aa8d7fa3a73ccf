/// Default color assigned to habits created without one
pub const DEFAULT_HABIT_COLOR: &str = "#3b82f6";

/// Auth token lifetime in seconds (7 days)
pub const TOKEN_TTL_SECS: i64 = 60 * 60 * 24 * 7;

/// Minimum password length accepted at registration
pub const MIN_PASSWORD_LEN: usize = 8;

/// Minimum length for user and habit names
pub const MIN_NAME_LEN: usize = 2;

// =============================================================================
// Error Messages
// =============================================================================

/// Error message for missing registration fields
pub const ERR_REGISTER_FIELDS: &str = "Name, email, and password are required";

/// Error message for a duplicate registration email
pub const ERR_EMAIL_TAKEN: &str = "User with this email already exists";

/// Uniform login failure message (never distinguishes unknown email
/// from wrong password)
pub const ERR_INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Error message for a missing habit name on create
pub const ERR_HABIT_NAME_REQUIRED: &str = "Habit name is required";

/// Error message for missing log fields
pub const ERR_LOG_FIELDS: &str = "Date and value are required";
