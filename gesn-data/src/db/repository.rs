//! Generic repository over an entity's schema descriptor
//!
//! Every statement runs on the connection of the [`UnitOfWork`] passed in,
//! so a caller can group several calls into one transaction:
//!
//! ```ignore
//! uow.begin_transaction().await?;
//! let id = customers.add(&mut uow, &customer).await?;
//! orders.add(&mut uow, &Order::new(id, ...)).await?;
//! uow.commit().await?;
//! ```

use std::marker::PhantomData;

use sqlx::sqlite::SqliteRow;
use sqlx::FromRow;
use tracing::debug;

use super::value::{bind_value, SqlValue};
use super::UnitOfWork;
use crate::Result;

/// Primary key column shared by every table.
pub const ID_COLUMN: &str = "Id";

/// Explicit schema descriptor for a persisted row shape.
pub trait Entity: for<'r> FromRow<'r, SqliteRow> + Send + Unpin {
    /// Default table name
    const TABLE: &'static str;

    /// Writable columns other than `Id`, in the order of [`Entity::values`]
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> i64;

    /// Column values, one per entry of [`Entity::COLUMNS`]
    fn values(&self) -> Vec<SqlValue>;
}

/// CRUD over one table for one entity shape.
///
/// Holds no connection: each call borrows the unit of work.
#[derive(Debug, Clone)]
pub struct Repository<E> {
    table: String,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> Default for Repository<E> {
    fn default() -> Self {
        Self::new(E::TABLE)
    }
}

impl<E: Entity> Repository<E> {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            _entity: PhantomData,
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// Fetch one row by `Id`; `None` when absent.
    pub async fn get_by_id(&self, uow: &mut UnitOfWork, id: i64) -> Result<Option<E>> {
        let sql = select_by_id_sql(&self.table);
        debug!(table = %self.table, id, "get_by_id");

        let row = sqlx::query_as::<_, E>(&sql)
            .bind(id)
            .fetch_optional(uow.connection())
            .await?;
        Ok(row)
    }

    /// Unfiltered scan of the whole table.
    pub async fn get_all(&self, uow: &mut UnitOfWork) -> Result<Vec<E>> {
        let sql = select_all_sql(&self.table);
        debug!(table = %self.table, "get_all");

        let rows = sqlx::query_as::<_, E>(&sql)
            .fetch_all(uow.connection())
            .await?;
        Ok(rows)
    }

    /// Load the whole table and filter in memory.
    ///
    /// Costs a full scan per call, fine for small tables only.
    pub async fn find<P>(&self, uow: &mut UnitOfWork, predicate: P) -> Result<Vec<E>>
    where
        P: Fn(&E) -> bool,
    {
        let rows = self.get_all(uow).await?;
        Ok(rows.into_iter().filter(|e| predicate(e)).collect())
    }

    /// Insert every column except `Id` and return the generated id.
    pub async fn add(&self, uow: &mut UnitOfWork, entity: &E) -> Result<i64> {
        let sql = insert_sql(&self.table, E::COLUMNS);
        let values = entity.values();
        debug_assert_eq!(values.len(), E::COLUMNS.len(), "descriptor/value mismatch");

        let mut query = sqlx::query(&sql);
        for value in values {
            query = bind_value(query, value);
        }

        let result = query.execute(uow.connection()).await?;
        let id = result.last_insert_rowid();
        debug!(table = %self.table, id, "add");
        Ok(id)
    }

    /// Overwrite every non-`Id` column of the row with the entity's `Id`.
    ///
    /// Returns `false` when no row has that id.
    pub async fn update(&self, uow: &mut UnitOfWork, entity: &E) -> Result<bool> {
        let sql = update_sql(&self.table, E::COLUMNS);
        let values = entity.values();
        debug_assert_eq!(values.len(), E::COLUMNS.len(), "descriptor/value mismatch");

        let mut query = sqlx::query(&sql);
        for value in values {
            query = bind_value(query, value);
        }
        let result = query.bind(entity.id()).execute(uow.connection()).await?;

        debug!(table = %self.table, id = entity.id(), rows = result.rows_affected(), "update");
        Ok(result.rows_affected() > 0)
    }

    /// Delete by `Id`. Returns whether a row was removed.
    pub async fn delete(&self, uow: &mut UnitOfWork, id: i64) -> Result<bool> {
        let sql = format!(
            "DELETE FROM {} WHERE {} = ?",
            quote_ident(&self.table),
            quote_ident(ID_COLUMN)
        );
        let result = sqlx::query(&sql).bind(id).execute(uow.connection()).await?;

        debug!(table = %self.table, id, rows = result.rows_affected(), "delete");
        Ok(result.rows_affected() > 0)
    }

    pub async fn exists(&self, uow: &mut UnitOfWork, id: i64) -> Result<bool> {
        let sql = format!(
            "SELECT EXISTS(SELECT 1 FROM {} WHERE {} = ?)",
            quote_ident(&self.table),
            quote_ident(ID_COLUMN)
        );
        let exists: i64 = sqlx::query_scalar(&sql)
            .bind(id)
            .fetch_one(uow.connection())
            .await?;
        Ok(exists != 0)
    }

    pub async fn count(&self, uow: &mut UnitOfWork) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_ident(&self.table));
        let count: i64 = sqlx::query_scalar(&sql)
            .fetch_one(uow.connection())
            .await?;
        Ok(count)
    }
}

/// Double-quote an identifier. Table names such as `Order` are keywords.
fn quote_ident(ident: &str) -> String {
    format!("\"{}\"", ident.replace('"', "\"\""))
}

fn select_all_sql(table: &str) -> String {
    format!("SELECT * FROM {}", quote_ident(table))
}

fn select_by_id_sql(table: &str) -> String {
    format!(
        "SELECT * FROM {} WHERE {} = ?",
        quote_ident(table),
        quote_ident(ID_COLUMN)
    )
}

fn insert_sql(table: &str, columns: &[&str]) -> String {
    let names: Vec<String> = columns.iter().map(|c| quote_ident(c)).collect();
    let params = vec!["?"; columns.len()].join(", ");
    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_ident(table),
        names.join(", "),
        params
    )
}

fn update_sql(table: &str, columns: &[&str]) -> String {
    let assignments: Vec<String> = columns
        .iter()
        .map(|c| format!("{} = ?", quote_ident(c)))
        .collect();
    format!(
        "UPDATE {} SET {} WHERE {} = ?",
        quote_ident(table),
        assignments.join(", "),
        quote_ident(ID_COLUMN)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, FromRow)]
    #[sqlx(rename_all = "PascalCase")]
    struct Note {
        id: i64,
        title: String,
        body: Option<String>,
    }

    impl Entity for Note {
        const TABLE: &'static str = "Note";
        const COLUMNS: &'static [&'static str] = &["Title", "Body"];

        fn id(&self) -> i64 {
            self.id
        }

        fn values(&self) -> Vec<SqlValue> {
            vec![self.title.clone().into(), self.body.clone().into()]
        }
    }

    fn note(title: &str) -> Note {
        Note {
            id: 0,
            title: title.to_owned(),
            body: None,
        }
    }

    async fn setup() -> (UnitOfWork, Repository<Note>) {
        let mut uow = UnitOfWork::in_memory().await.unwrap();
        sqlx::raw_sql(
            r#"CREATE TABLE "Note" ("Id" INTEGER PRIMARY KEY AUTOINCREMENT, "Title" TEXT NOT NULL, "Body" TEXT)"#,
        )
        .execute(uow.connection())
        .await
        .unwrap();
        (uow, Repository::default())
    }

    #[test]
    fn insert_sql_skips_id_and_quotes() {
        assert_eq!(
            insert_sql("Order", &["CustomerId", "Status"]),
            r#"INSERT INTO "Order" ("CustomerId", "Status") VALUES (?, ?)"#
        );
    }

    #[test]
    fn update_sql_keys_on_id() {
        assert_eq!(
            update_sql("Note", &["Title", "Body"]),
            r#"UPDATE "Note" SET "Title" = ?, "Body" = ? WHERE "Id" = ?"#
        );
    }

    #[test]
    fn quote_ident_escapes_quotes() {
        assert_eq!(quote_ident(r#"we"ird"#), r#""we""ird""#);
    }

    #[tokio::test]
    async fn add_then_get_by_id() {
        let (mut uow, repo) = setup().await;

        let mut n = note("groceries");
        n.body = Some("eggs".into());
        let id = repo.add(&mut uow, &n).await.unwrap();

        let fetched = repo.get_by_id(&mut uow, id).await.unwrap().unwrap();
        assert_eq!(fetched, Note { id, ..n });
    }

    #[tokio::test]
    async fn get_by_id_missing_is_none() {
        let (mut uow, repo) = setup().await;
        assert!(repo.get_by_id(&mut uow, 99).await.unwrap().is_none());
        assert!(!repo.exists(&mut uow, 99).await.unwrap());
    }

    #[tokio::test]
    async fn find_without_match_is_empty() {
        let (mut uow, repo) = setup().await;
        repo.add(&mut uow, &note("a")).await.unwrap();

        let found = repo.find(&mut uow, |n| n.title == "zzz").await.unwrap();
        assert!(found.is_empty());

        let found = repo.find(&mut uow, |n| n.title == "a").await.unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn update_overwrites_full_row() {
        let (mut uow, repo) = setup().await;
        let mut n = note("draft");
        n.body = Some("text".into());
        n.id = repo.add(&mut uow, &n).await.unwrap();

        // body cleared: full-row semantics write the NULL too
        let edited = Note {
            id: n.id,
            title: "final".into(),
            body: None,
        };
        assert!(repo.update(&mut uow, &edited).await.unwrap());

        let fetched = repo.get_by_id(&mut uow, n.id).await.unwrap().unwrap();
        assert_eq!(fetched, edited);

        let ghost = Note { id: 404, ..edited };
        assert!(!repo.update(&mut uow, &ghost).await.unwrap());
    }

    #[tokio::test]
    async fn delete_and_count() {
        let (mut uow, repo) = setup().await;
        let a = repo.add(&mut uow, &note("a")).await.unwrap();
        repo.add(&mut uow, &note("b")).await.unwrap();
        assert_eq!(repo.count(&mut uow).await.unwrap(), 2);

        assert!(repo.delete(&mut uow, a).await.unwrap());
        assert!(!repo.delete(&mut uow, a).await.unwrap());
        assert_eq!(repo.count(&mut uow).await.unwrap(), 1);
        assert_eq!(repo.get_all(&mut uow).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn rolled_back_add_is_gone() {
        let (mut uow, repo) = setup().await;

        uow.begin_transaction().await.unwrap();
        let id = repo.add(&mut uow, &note("temp")).await.unwrap();
        assert!(repo.exists(&mut uow, id).await.unwrap());
        uow.rollback().await.unwrap();

        assert!(!repo.exists(&mut uow, id).await.unwrap());
    }

    #[tokio::test]
    async fn custom_table_name() {
        let (mut uow, _) = setup().await;
        sqlx::raw_sql(
            r#"CREATE TABLE "ArchivedNote" ("Id" INTEGER PRIMARY KEY, "Title" TEXT NOT NULL, "Body" TEXT)"#,
        )
        .execute(uow.connection())
        .await
        .unwrap();

        let archive: Repository<Note> = Repository::new("ArchivedNote");
        archive.add(&mut uow, &note("old")).await.unwrap();

        assert_eq!(archive.table(), "ArchivedNote");
        assert_eq!(archive.count(&mut uow).await.unwrap(), 1);
        assert_eq!(Repository::<Note>::default().count(&mut uow).await.unwrap(), 0);
    }
}
