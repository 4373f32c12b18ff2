use sha2::{Digest, Sha256};

/// Hash a password into the hex fingerprint stored in the `hashed_password` column
///
/// Plain SHA-256 without salt or stretching. Rows already on disk were written with
/// this exact digest, so changing it needs a data migration, not just a code change.
pub fn hash_password(password: &str) -> String {
    let digest = Sha256::digest(password.as_bytes());
    format!("{digest:x}")
}
