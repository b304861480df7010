use sha2::{Digest, Sha256};

/// hash_password
///
/// Digests a plaintext password into the hex form stored in `sys_user`.
/// Called on user creation and whenever an update carries a new password.
pub fn hash_password(plain: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(plain.as_bytes());
    hex::encode(hasher.finalize())
}
