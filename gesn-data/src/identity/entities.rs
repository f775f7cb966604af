//! Role and user rows

use chrono::{DateTime, Utc};
use sqlx::FromRow;

use crate::db::{Entity, SqlValue};

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
#[sqlx(rename_all = "PascalCase")]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub normalized_name: String,
}

impl Entity for Role {
    const TABLE: &'static str = "Role";
    const COLUMNS: &'static [&'static str] = &["Name", "NormalizedName"];

    fn id(&self) -> i64 {
        self.id
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![self.name.clone().into(), self.normalized_name.clone().into()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
#[sqlx(rename_all = "PascalCase")]
pub struct User {
    pub id: i64,
    pub user_name: String,
    pub normalized_user_name: String,
    pub email: String,
    pub normalized_email: String,
    pub password_hash: String,
    /// Rotated whenever credentials change
    pub security_stamp: String,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub modified_at: DateTime<Utc>,
    pub modified_by: String,
}

impl Entity for User {
    const TABLE: &'static str = "User";
    const COLUMNS: &'static [&'static str] = &[
        "UserName",
        "NormalizedUserName",
        "Email",
        "NormalizedEmail",
        "PasswordHash",
        "SecurityStamp",
        "CreatedAt",
        "CreatedBy",
        "ModifiedAt",
        "ModifiedBy",
    ];

    fn id(&self) -> i64 {
        self.id
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.user_name.clone().into(),
            self.normalized_user_name.clone().into(),
            self.email.clone().into(),
            self.normalized_email.clone().into(),
            self.password_hash.clone().into(),
            self.security_stamp.clone().into(),
            self.created_at.into(),
            self.created_by.clone().into(),
            self.modified_at.into(),
            self.modified_by.clone().into(),
        ]
    }
}
