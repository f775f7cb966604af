//! Order rows

use chrono::{DateTime, Utc};
use gesn_core::{Audit, CoreError, OrderStatus};
use sqlx::FromRow;

use crate::db::{Entity, SqlValue};

#[derive(Debug, Clone, PartialEq, FromRow)]
#[sqlx(rename_all = "PascalCase")]
pub struct Order {
    pub id: i64,
    pub customer_id: i64,
    pub order_date: DateTime<Utc>,
    /// Stored name of an [`OrderStatus`]
    pub status: String,
    pub total_cents: i64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub modified_at: DateTime<Utc>,
    pub modified_by: String,
}

impl Order {
    /// New pending order for a customer.
    pub fn new(customer_id: i64, order_date: DateTime<Utc>, audit: Audit) -> Self {
        Self {
            id: 0,
            customer_id,
            order_date,
            status: OrderStatus::Pending.as_str().to_owned(),
            total_cents: 0,
            notes: None,
            created_at: audit.created_at,
            created_by: audit.created_by,
            modified_at: audit.modified_at,
            modified_by: audit.modified_by,
        }
    }

    /// Parsed status; errors if the column holds an unknown name.
    pub fn status(&self) -> Result<OrderStatus, CoreError> {
        self.status.parse()
    }

    pub fn set_status(&mut self, status: OrderStatus) {
        self.status = status.as_str().to_owned();
    }
}

impl Entity for Order {
    const TABLE: &'static str = "Order";
    const COLUMNS: &'static [&'static str] = &[
        "CustomerId",
        "OrderDate",
        "Status",
        "TotalCents",
        "Notes",
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
            self.customer_id.into(),
            self.order_date.into(),
            self.status.clone().into(),
            self.total_cents.into(),
            self.notes.clone().into(),
            self.created_at.into(),
            self.created_by.clone().into(),
            self.modified_at.into(),
            self.modified_by.clone().into(),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn new_order_is_pending() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut order = Order::new(3, at, Audit::created(at, "clerk"));
        assert_eq!(order.status().unwrap(), OrderStatus::Pending);

        order.set_status(OrderStatus::InProduction);
        assert_eq!(order.status, "InProduction");
        assert_eq!(order.values().len(), Order::COLUMNS.len());
    }

    #[test]
    fn unknown_stored_status_is_an_error() {
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let mut order = Order::new(3, at, Audit::created(at, "clerk"));
        order.status = "Lost".into();
        assert!(order.status().is_err());
    }
}
