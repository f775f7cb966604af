//! Identity primitives: claims and name normalization

use serde::{Deserialize, Serialize};

/// Claim type used for application permissions.
pub const PERMISSION_CLAIM: &str = "permission";

/// A `(type, value)` pair granted to a role or a user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Claim {
    #[serde(rename = "type")]
    pub claim_type: String,
    pub value: String,
}

impl Claim {
    pub fn new(claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            value: value.into(),
        }
    }

    /// Shorthand for a [`PERMISSION_CLAIM`] claim.
    pub fn permission(value: impl Into<String>) -> Self {
        Self::new(PERMISSION_CLAIM, value)
    }
}

/// Normalized lookup key for role and user names.
///
/// Lookups compare normalized names so "admin" and "Admin" are the same role.
pub fn normalize_name(name: &str) -> String {
    name.trim().to_uppercase()
}
