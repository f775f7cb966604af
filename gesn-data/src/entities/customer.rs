//! Customer rows

use chrono::{DateTime, Utc};
use gesn_core::Audit;
use sqlx::FromRow;

use crate::db::{Entity, SqlValue};

#[derive(Debug, Clone, PartialEq, FromRow)]
#[sqlx(rename_all = "PascalCase")]
pub struct Customer {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub document_number: Option<String>,
    pub address: Option<String>,
    /// Contact id assigned by the external contacts sync, if linked
    pub google_contact_id: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub modified_at: DateTime<Utc>,
    pub modified_by: String,
}

impl Customer {
    /// New, unsaved customer (id 0) with only the required fields set.
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>, audit: Audit) -> Self {
        Self {
            id: 0,
            first_name: first_name.into(),
            last_name: last_name.into(),
            email: None,
            phone: None,
            document_number: None,
            address: None,
            google_contact_id: None,
            is_active: true,
            created_at: audit.created_at,
            created_by: audit.created_by,
            modified_at: audit.modified_at,
            modified_by: audit.modified_by,
        }
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

impl Entity for Customer {
    const TABLE: &'static str = "Customer";
    const COLUMNS: &'static [&'static str] = &[
        "FirstName",
        "LastName",
        "Email",
        "Phone",
        "DocumentNumber",
        "Address",
        "GoogleContactId",
        "IsActive",
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
            self.first_name.clone().into(),
            self.last_name.clone().into(),
            self.email.clone().into(),
            self.phone.clone().into(),
            self.document_number.clone().into(),
            self.address.clone().into(),
            self.google_contact_id.clone().into(),
            self.is_active.into(),
            self.created_at.into(),
            self.created_by.clone().into(),
            self.modified_at.into(),
            self.modified_by.clone().into(),
        ]
    }
}
