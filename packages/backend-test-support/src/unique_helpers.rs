//! Unique test data so tests sharing a database never collide.

use ulid::Ulid;

/// A unique username: `{prefix}_{ulid}` (lowercased).
///
/// ```
/// use backend_test_support::unique_helpers::unique_username;
///
/// let a = unique_username("reader");
/// let b = unique_username("reader");
/// assert_ne!(a, b);
/// assert!(a.starts_with("reader_"));
/// ```
pub fn unique_username(prefix: &str) -> String {
    format!("{}_{}", prefix, Ulid::new().to_string().to_lowercase())
}

/// A unique email address: `{prefix}-{ulid}@example.test`.
///
/// ```
/// use backend_test_support::unique_helpers::unique_email;
///
/// let email = unique_email("reader");
/// assert!(email.starts_with("reader-"));
/// assert!(email.ends_with("@example.test"));
/// ```
pub fn unique_email(prefix: &str) -> String {
    format!("{}-{}@example.test", prefix, Ulid::new().to_string().to_lowercase())
}
