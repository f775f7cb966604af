//! Audit stamps carried by every persisted entity

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Creation and last-modification stamps.
///
/// Callers always supply the timestamp and the actor; nothing here reads the
/// clock on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Audit {
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub modified_at: DateTime<Utc>,
    pub modified_by: String,
}

impl Audit {
    /// Stamp a freshly created record. Modification mirrors creation.
    pub fn created(at: DateTime<Utc>, actor: impl Into<String>) -> Self {
        let actor = actor.into();
        Self {
            created_at: at,
            created_by: actor.clone(),
            modified_at: at,
            modified_by: actor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn creation_stamps_modification_too() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();

        let audit = Audit::created(at, "alice");

        assert_eq!(audit.created_at, at);
        assert_eq!(audit.modified_at, at);
        assert_eq!(audit.created_by, "alice");
        assert_eq!(audit.modified_by, "alice");
    }
}
