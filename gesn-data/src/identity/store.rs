//! Identity store: roles, users, and the claims/links between them

use async_trait::async_trait;
use gesn_core::{normalize_name, Audit, Claim};
use sqlx::Row;

use super::entities::{Role, User};
use super::password;
use crate::db::{Repository, UnitOfWork};
use crate::Result;

/// Data needed to create a user. The password is hashed by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_name: String,
    pub email: String,
    pub password: String,
    pub audit: Audit,
}

/// Persistence calls the identity seeder relies on.
///
/// Name lookups go through [`normalize_name`], so they are case-insensitive.
#[async_trait]
pub trait IdentityStore: Send {
    async fn find_role(&mut self, name: &str) -> Result<Option<Role>>;
    async fn create_role(&mut self, name: &str) -> Result<Role>;
    async fn role_claims(&mut self, role_id: i64) -> Result<Vec<Claim>>;
    async fn add_role_claim(&mut self, role_id: i64, claim: &Claim) -> Result<()>;

    async fn find_user(&mut self, user_name: &str) -> Result<Option<User>>;
    async fn create_user(&mut self, user: &NewUser) -> Result<User>;
    async fn user_roles(&mut self, user_id: i64) -> Result<Vec<Role>>;
    async fn add_user_to_role(&mut self, user_id: i64, role_id: i64) -> Result<()>;
    async fn user_claims(&mut self, user_id: i64) -> Result<Vec<Claim>>;
    async fn add_user_claim(&mut self, user_id: i64, claim: &Claim) -> Result<()>;
}

/// [`IdentityStore`] on the connection of a borrowed unit of work.
pub struct SqliteIdentityStore<'a> {
    uow: &'a mut UnitOfWork,
    roles: Repository<Role>,
    users: Repository<User>,
}

impl<'a> SqliteIdentityStore<'a> {
    pub fn new(uow: &'a mut UnitOfWork) -> Self {
        Self {
            uow,
            roles: Repository::default(),
            users: Repository::default(),
        }
    }

    async fn claims_for(&mut self, sql: &str, owner_id: i64) -> Result<Vec<Claim>> {
        let rows = sqlx::query(sql)
            .bind(owner_id)
            .fetch_all(self.uow.connection())
            .await?;

        Ok(rows
            .into_iter()
            .map(|r| Claim::new(r.get::<String, _>("ClaimType"), r.get::<String, _>("ClaimValue")))
            .collect())
    }
}

#[async_trait]
impl<'a> IdentityStore for SqliteIdentityStore<'a> {
    async fn find_role(&mut self, name: &str) -> Result<Option<Role>> {
        let role = sqlx::query_as::<_, Role>(r#"SELECT * FROM "Role" WHERE "NormalizedName" = ?"#)
            .bind(normalize_name(name))
            .fetch_optional(self.uow.connection())
            .await?;
        Ok(role)
    }

    async fn create_role(&mut self, name: &str) -> Result<Role> {
        let mut role = Role {
            id: 0,
            name: name.trim().to_owned(),
            normalized_name: normalize_name(name),
        };
        role.id = self.roles.add(self.uow, &role).await?;
        Ok(role)
    }

    async fn role_claims(&mut self, role_id: i64) -> Result<Vec<Claim>> {
        self.claims_for(
            r#"SELECT "ClaimType", "ClaimValue" FROM "RoleClaim" WHERE "RoleId" = ? ORDER BY "Id""#,
            role_id,
        )
        .await
    }

    async fn add_role_claim(&mut self, role_id: i64, claim: &Claim) -> Result<()> {
        sqlx::query(r#"INSERT INTO "RoleClaim" ("RoleId", "ClaimType", "ClaimValue") VALUES (?, ?, ?)"#)
            .bind(role_id)
            .bind(&claim.claim_type)
            .bind(&claim.value)
            .execute(self.uow.connection())
            .await?;
        Ok(())
    }

    async fn find_user(&mut self, user_name: &str) -> Result<Option<User>> {
        let user =
            sqlx::query_as::<_, User>(r#"SELECT * FROM "User" WHERE "NormalizedUserName" = ?"#)
                .bind(normalize_name(user_name))
                .fetch_optional(self.uow.connection())
                .await?;
        Ok(user)
    }

    async fn create_user(&mut self, new: &NewUser) -> Result<User> {
        let mut user = User {
            id: 0,
            user_name: new.user_name.trim().to_owned(),
            normalized_user_name: normalize_name(&new.user_name),
            email: new.email.trim().to_owned(),
            normalized_email: normalize_name(&new.email),
            password_hash: password::hash_password(&new.password),
            security_stamp: password::security_stamp(),
            created_at: new.audit.created_at,
            created_by: new.audit.created_by.clone(),
            modified_at: new.audit.modified_at,
            modified_by: new.audit.modified_by.clone(),
        };
        user.id = self.users.add(self.uow, &user).await?;
        Ok(user)
    }

    async fn user_roles(&mut self, user_id: i64) -> Result<Vec<Role>> {
        let roles = sqlx::query_as::<_, Role>(
            r#"
            SELECT r.*
            FROM "Role" r
            JOIN "UserRole" ur ON ur."RoleId" = r."Id"
            WHERE ur."UserId" = ?
            ORDER BY r."Id"
            "#,
        )
        .bind(user_id)
        .fetch_all(self.uow.connection())
        .await?;
        Ok(roles)
    }

    async fn add_user_to_role(&mut self, user_id: i64, role_id: i64) -> Result<()> {
        sqlx::query(r#"INSERT INTO "UserRole" ("UserId", "RoleId") VALUES (?, ?)"#)
            .bind(user_id)
            .bind(role_id)
            .execute(self.uow.connection())
            .await?;
        Ok(())
    }

    async fn user_claims(&mut self, user_id: i64) -> Result<Vec<Claim>> {
        self.claims_for(
            r#"SELECT "ClaimType", "ClaimValue" FROM "UserClaim" WHERE "UserId" = ? ORDER BY "Id""#,
            user_id,
        )
        .await
    }

    async fn add_user_claim(&mut self, user_id: i64, claim: &Claim) -> Result<()> {
        sqlx::query(r#"INSERT INTO "UserClaim" ("UserId", "ClaimType", "ClaimValue") VALUES (?, ?, ?)"#)
            .bind(user_id)
            .bind(&claim.claim_type)
            .bind(&claim.value)
            .execute(self.uow.connection())
            .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::schema;
    use crate::identity::password::verify_password;
    use chrono::{TimeZone, Utc};

    async fn setup() -> UnitOfWork {
        let mut uow = UnitOfWork::in_memory().await.unwrap();
        schema::apply(&mut uow).await.unwrap();
        uow
    }

    fn new_user(name: &str) -> NewUser {
        NewUser {
            user_name: name.to_owned(),
            email: format!("{name}@example.com"),
            password: "pw-123".into(),
            audit: Audit::created(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(), "test"),
        }
    }

    #[tokio::test]
    async fn role_lookup_is_case_insensitive() {
        let mut uow = setup().await;
        let mut store = SqliteIdentityStore::new(&mut uow);

        let created = store.create_role("Manager").await.unwrap();
        let found = store.find_role("manager").await.unwrap().unwrap();

        assert_eq!(found, created);
        assert_eq!(found.normalized_name, "MANAGER");
        assert!(store.find_role("Owner").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_role_is_a_database_error() {
        let mut uow = setup().await;
        let mut store = SqliteIdentityStore::new(&mut uow);

        store.create_role("Admin").await.unwrap();
        let err = store.create_role("ADMIN").await.unwrap_err();
        assert!(matches!(err, crate::DataError::Database(_)));
    }

    #[tokio::test]
    async fn user_hash_and_links() {
        let mut uow = setup().await;
        let mut store = SqliteIdentityStore::new(&mut uow);

        let role = store.create_role("Admin").await.unwrap();
        store
            .add_role_claim(role.id, &Claim::permission("users.manage"))
            .await
            .unwrap();

        let user = store.create_user(&new_user("Owner")).await.unwrap();
        assert!(verify_password(&user.password_hash, "pw-123"));
        assert_eq!(store.find_user("OWNER").await.unwrap(), Some(user.clone()));

        store.add_user_to_role(user.id, role.id).await.unwrap();
        store
            .add_user_claim(user.id, &Claim::new("tenant", "main"))
            .await
            .unwrap();

        assert_eq!(store.user_roles(user.id).await.unwrap(), vec![role.clone()]);
        assert_eq!(
            store.role_claims(role.id).await.unwrap(),
            vec![Claim::permission("users.manage")]
        );
        assert_eq!(
            store.user_claims(user.id).await.unwrap(),
            vec![Claim::new("tenant", "main")]
        );
    }
}
