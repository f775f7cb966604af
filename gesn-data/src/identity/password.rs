//! Salted SHA-256 password digests
//!
//! Format: `sha256$<salt hex>$<digest hex>` where the digest covers the salt
//! hex followed by the password bytes.

use sha2::{Digest, Sha256};

const SCHEME: &str = "sha256";

pub fn hash_password(password: &str) -> String {
    let salt = to_hex(&rand::random::<[u8; 16]>());
    let digest = digest(&salt, password);
    format!("{SCHEME}${salt}${digest}")
}

/// `false` for a wrong password or a hash in an unknown format.
#[cfg(test)]
pub(crate) fn verify_password(hash: &str, password: &str) -> bool {
    let mut parts = hash.splitn(3, '$');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(SCHEME), Some(salt), Some(expected)) => digest(salt, password) == expected,
        _ => false,
    }
}

/// Random hex token for the user's security stamp.
pub fn security_stamp() -> String {
    to_hex(&rand::random::<[u8; 16]>())
}

fn digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    to_hex(&hasher.finalize())
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_verifies_only_the_same_password() {
        let hash = hash_password("hunter2");
        assert!(hash.starts_with("sha256$"));
        assert!(verify_password(&hash, "hunter2"));
        assert!(!verify_password(&hash, "hunter3"));
    }

    #[test]
    fn same_password_gets_different_salts() {
        assert_ne!(hash_password("pw"), hash_password("pw"));
    }

    #[test]
    fn malformed_hash_never_verifies() {
        assert!(!verify_password("plain", "plain"));
        assert!(!verify_password("md5$aa$bb", "x"));
    }
}
