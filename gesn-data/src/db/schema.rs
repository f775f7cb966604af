//! Schema bootstrap
//!
//! No versioning: tables are created when missing and left alone otherwise.
//! Column names here are the same literals the entity descriptors use.

use crate::db::UnitOfWork;
use crate::Result;

const SCHEMA: &str = include_str!("schema.sql");

/// Tables created by [`apply`], in creation order.
pub const TABLES: &[&str] = &[
    "Customer",
    "Order",
    "Product",
    "Role",
    "RoleClaim",
    "User",
    "UserRole",
    "UserClaim",
];

/// Create all tables and indexes that do not exist yet.
pub async fn apply(uow: &mut UnitOfWork) -> Result<()> {
    tracing::info!("Applying GesN schema...");
    sqlx::raw_sql(SCHEMA).execute(uow.connection()).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn table_names(uow: &mut UnitOfWork) -> Vec<String> {
        sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%' ORDER BY rowid",
        )
        .fetch_all(uow.connection())
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn creates_every_table() {
        let mut uow = UnitOfWork::in_memory().await.unwrap();
        apply(&mut uow).await.unwrap();

        assert_eq!(table_names(&mut uow).await, TABLES);
    }

    #[tokio::test]
    async fn apply_is_idempotent() {
        let mut uow = UnitOfWork::in_memory().await.unwrap();
        apply(&mut uow).await.unwrap();
        apply(&mut uow).await.unwrap();

        assert_eq!(table_names(&mut uow).await.len(), TABLES.len());
    }
}
