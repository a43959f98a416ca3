use sha2::{Digest, Sha256};

/// Hash a password as lowercase hex SHA-256 over its UTF-8 bytes.
/// Unsalted: equal passwords always produce equal digests.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Check a plaintext password against a stored digest.
pub fn compare_password(password: &str, stored_hash: &str) -> bool {
    hash_password(password) == stored_hash
}
