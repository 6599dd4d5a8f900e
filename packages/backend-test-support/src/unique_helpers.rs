//! Unique names so tests sharing one in-memory store never collide.

use ulid::Ulid;

/// A valid, unique username: `{prefix}_{8 lowercase ulid chars}`.
///
/// ```
/// use backend_test_support::unique_helpers::unique_username;
///
/// let a = unique_username("alice");
/// let b = unique_username("alice");
/// assert_ne!(a, b);
/// assert!(a.starts_with("alice_"));
/// ```
pub fn unique_username(prefix: &str) -> String {
    let ulid = Ulid::new().to_string().to_lowercase();
    // the tail holds the random bits
    format!("{prefix}_{}", &ulid[ulid.len() - 8..])
}

/// Several unique usernames sharing a prefix.
pub fn unique_usernames(prefix: &str, n: usize) -> Vec<String> {
    (0..n).map(|i| unique_username(&format!("{prefix}{i}"))).collect()
}
