//! Idempotent identity bootstrap
//!
//! Steps run in a fixed order and each one checks before it creates, so the
//! seeder can run on every startup. The first step that fails stops the run;
//! the error lists every failure collected during that step.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use gesn_core::{Audit, Claim, SeedConfig};
use tracing::{info, instrument};

use super::entities::{Role, User};
use super::store::{IdentityStore, NewUser};
use super::SeedStep;
use crate::{DataError, Result};

/// What a seeding run actually created. All zero on a repeat run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SeedReport {
    pub roles_created: usize,
    pub role_claims_added: usize,
    pub admin_created: bool,
    pub admin_roles_added: usize,
    pub admin_claims_added: usize,
}

impl SeedReport {
    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

pub struct IdentitySeeder<'c> {
    config: &'c SeedConfig,
    actor: String,
}

impl<'c> IdentitySeeder<'c> {
    pub fn new(config: &'c SeedConfig) -> Self {
        Self {
            config,
            actor: "system".to_owned(),
        }
    }

    /// Actor recorded in the admin account's audit stamps.
    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = actor.into();
        self
    }

    /// Run all five steps against `store`, stamping new records with `at`.
    #[instrument(skip_all)]
    pub async fn seed<S: IdentityStore>(&self, store: &mut S, at: DateTime<Utc>) -> Result<SeedReport> {
        self.config.validate()?;
        let mut report = SeedReport::default();

        let roles = self.ensure_roles(store, &mut report).await?;
        self.ensure_role_claims(store, &roles, &mut report).await?;
        let admin = self.ensure_admin(store, at, &mut report).await?;
        self.ensure_admin_roles(store, &admin, &roles, &mut report).await?;
        self.ensure_admin_claims(store, &admin, &mut report).await?;

        info!(?report, "identity seeding complete");
        Ok(report)
    }

    async fn ensure_roles<S: IdentityStore>(
        &self,
        store: &mut S,
        report: &mut SeedReport,
    ) -> Result<Vec<Role>> {
        let mut roles = Vec::with_capacity(self.config.roles.len());
        let mut errors = Vec::new();

        for seed in &self.config.roles {
            let outcome = match store.find_role(&seed.name).await {
                Ok(Some(role)) => Ok(role),
                Ok(None) => store.create_role(&seed.name).await.map(|role| {
                    report.roles_created += 1;
                    role
                }),
                Err(e) => Err(e),
            };
            match outcome {
                Ok(role) => roles.push(role),
                Err(e) => errors.push(format!("role '{}': {e}", seed.name)),
            }
        }

        finish_step(SeedStep::Roles, errors)?;
        info!(created = report.roles_created, "roles ensured");
        Ok(roles)
    }

    /// `roles` is index-aligned with the configured role list.
    async fn ensure_role_claims<S: IdentityStore>(
        &self,
        store: &mut S,
        roles: &[Role],
        report: &mut SeedReport,
    ) -> Result<()> {
        let mut errors = Vec::new();

        for (seed, role) in self.config.roles.iter().zip(roles) {
            let existing: HashSet<Claim> = match store.role_claims(role.id).await {
                Ok(claims) => claims.into_iter().collect(),
                Err(e) => {
                    errors.push(format!("claims of role '{}': {e}", role.name));
                    continue;
                }
            };

            for claim in missing(&seed.claims, &existing) {
                match store.add_role_claim(role.id, claim).await {
                    Ok(()) => report.role_claims_added += 1,
                    Err(e) => errors.push(format!(
                        "claim {}={} on role '{}': {e}",
                        claim.claim_type, claim.value, role.name
                    )),
                }
            }
        }

        finish_step(SeedStep::RoleClaims, errors)?;
        info!(added = report.role_claims_added, "role claims ensured");
        Ok(())
    }

    async fn ensure_admin<S: IdentityStore>(
        &self,
        store: &mut S,
        at: DateTime<Utc>,
        report: &mut SeedReport,
    ) -> Result<User> {
        let admin = &self.config.admin;

        let outcome = match store.find_user(&admin.user_name).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => {
                let new = NewUser {
                    user_name: admin.user_name.clone(),
                    email: admin.email.clone(),
                    password: admin.password.clone(),
                    audit: Audit::created(at, self.actor.clone()),
                };
                store.create_user(&new).await.map(|user| {
                    report.admin_created = true;
                    user
                })
            }
            Err(e) => Err(e),
        };

        match outcome {
            Ok(user) => {
                info!(user = %user.user_name, created = report.admin_created, "admin ensured");
                Ok(user)
            }
            Err(e) => Err(step_failed(
                SeedStep::AdminUser,
                vec![format!("user '{}': {e}", admin.user_name)],
            )),
        }
    }

    async fn ensure_admin_roles<S: IdentityStore>(
        &self,
        store: &mut S,
        admin: &User,
        roles: &[Role],
        report: &mut SeedReport,
    ) -> Result<()> {
        let held: HashSet<String> = store
            .user_roles(admin.id)
            .await
            .map_err(|e| {
                step_failed(
                    SeedStep::AdminRoles,
                    vec![format!("roles of user '{}': {e}", admin.user_name)],
                )
            })?
            .into_iter()
            .map(|r| r.normalized_name)
            .collect();

        let mut errors = Vec::new();
        for role in roles.iter().filter(|r| !held.contains(&r.normalized_name)) {
            match store.add_user_to_role(admin.id, role.id).await {
                Ok(()) => report.admin_roles_added += 1,
                Err(e) => errors.push(format!("role '{}': {e}", role.name)),
            }
        }

        finish_step(SeedStep::AdminRoles, errors)?;
        info!(added = report.admin_roles_added, "admin roles ensured");
        Ok(())
    }

    async fn ensure_admin_claims<S: IdentityStore>(
        &self,
        store: &mut S,
        admin: &User,
        report: &mut SeedReport,
    ) -> Result<()> {
        let existing: HashSet<Claim> = store
            .user_claims(admin.id)
            .await
            .map_err(|e| {
                step_failed(
                    SeedStep::AdminClaims,
                    vec![format!("claims of user '{}': {e}", admin.user_name)],
                )
            })?
            .into_iter()
            .collect();

        let wanted = self.config.admin_claims();
        let mut errors = Vec::new();
        for claim in missing(&wanted, &existing) {
            match store.add_user_claim(admin.id, claim).await {
                Ok(()) => report.admin_claims_added += 1,
                Err(e) => errors.push(format!("claim {}={}: {e}", claim.claim_type, claim.value)),
            }
        }

        finish_step(SeedStep::AdminClaims, errors)?;
        info!(added = report.admin_claims_added, "admin claims ensured");
        Ok(())
    }
}

/// Claims from `wanted` not present in `existing`, without repeats.
fn missing<'w>(wanted: &'w [Claim], existing: &HashSet<Claim>) -> Vec<&'w Claim> {
    let mut seen = HashSet::new();
    wanted
        .iter()
        .filter(|c| !existing.contains(*c) && seen.insert(*c))
        .collect()
}

fn finish_step(step: SeedStep, errors: Vec<String>) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(step_failed(step, errors))
    }
}

fn step_failed(step: SeedStep, errors: Vec<String>) -> DataError {
    tracing::error!(%step, failures = errors.len(), "identity seeding aborted");
    DataError::Seed {
        step,
        message: errors.join("; "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{schema, UnitOfWork};
    use crate::identity::SqliteIdentityStore;
    use async_trait::async_trait;
    use chrono::TimeZone;
    use gesn_core::{AdminSeed, RoleSeed};

    /// Delegates to SQLite but refuses to create users.
    struct NoNewUsers<'a> {
        inner: SqliteIdentityStore<'a>,
    }

    #[async_trait]
    impl<'a> IdentityStore for NoNewUsers<'a> {
        async fn find_role(&mut self, name: &str) -> Result<Option<Role>> {
            self.inner.find_role(name).await
        }
        async fn create_role(&mut self, name: &str) -> Result<Role> {
            self.inner.create_role(name).await
        }
        async fn role_claims(&mut self, role_id: i64) -> Result<Vec<Claim>> {
            self.inner.role_claims(role_id).await
        }
        async fn add_role_claim(&mut self, role_id: i64, claim: &Claim) -> Result<()> {
            self.inner.add_role_claim(role_id, claim).await
        }
        async fn find_user(&mut self, user_name: &str) -> Result<Option<User>> {
            self.inner.find_user(user_name).await
        }
        async fn create_user(&mut self, _user: &NewUser) -> Result<User> {
            Err(DataError::Database(sqlx::Error::Protocol("user store is read-only".into())))
        }
        async fn user_roles(&mut self, user_id: i64) -> Result<Vec<Role>> {
            self.inner.user_roles(user_id).await
        }
        async fn add_user_to_role(&mut self, user_id: i64, role_id: i64) -> Result<()> {
            self.inner.add_user_to_role(user_id, role_id).await
        }
        async fn user_claims(&mut self, user_id: i64) -> Result<Vec<Claim>> {
            self.inner.user_claims(user_id).await
        }
        async fn add_user_claim(&mut self, user_id: i64, claim: &Claim) -> Result<()> {
            self.inner.add_user_claim(user_id, claim).await
        }
    }

    fn config() -> SeedConfig {
        SeedConfig {
            roles: vec![
                RoleSeed {
                    name: "Admin".into(),
                    claims: vec![Claim::permission("users.manage")],
                },
                RoleSeed {
                    name: "Clerk".into(),
                    claims: vec![Claim::permission("orders.view"), Claim::permission("orders.view")],
                },
            ],
            admin: AdminSeed {
                user_name: "root".into(),
                email: "root@example.com".into(),
                password: "pw".into(),
                extra_claims: vec![],
            },
        }
    }

    fn at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 7, 0, 0).unwrap()
    }

    async fn setup() -> UnitOfWork {
        let mut uow = UnitOfWork::in_memory().await.unwrap();
        schema::apply(&mut uow).await.unwrap();
        uow
    }

    #[tokio::test]
    async fn first_run_reports_everything_created() {
        let mut uow = setup().await;
        let mut store = SqliteIdentityStore::new(&mut uow);
        let config = config();

        let report = IdentitySeeder::new(&config)
            .with_actor("bootstrap")
            .seed(&mut store, at())
            .await
            .unwrap();

        assert_eq!(
            report,
            SeedReport {
                roles_created: 2,
                role_claims_added: 2,
                admin_created: true,
                admin_roles_added: 2,
                admin_claims_added: 2,
            }
        );

        let admin = store.find_user("root").await.unwrap().unwrap();
        assert_eq!(admin.created_by, "bootstrap");
        assert_eq!(admin.created_at, at());

        let admin_role = store.find_role("ADMIN").await.unwrap().unwrap();
        assert_eq!(
            store.role_claims(admin_role.id).await.unwrap(),
            vec![Claim::permission("users.manage")]
        );
        // the configured repeat is stored once
        let clerk = store.find_role("clerk").await.unwrap().unwrap();
        assert_eq!(
            store.role_claims(clerk.id).await.unwrap(),
            vec![Claim::permission("orders.view")]
        );

        let roles: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM "Role""#)
            .fetch_one(uow.connection())
            .await
            .unwrap();
        assert_eq!(roles, 2);
    }

    #[tokio::test]
    async fn second_run_is_noop() {
        let mut uow = setup().await;
        let mut store = SqliteIdentityStore::new(&mut uow);
        let config = config();
        let seeder = IdentitySeeder::new(&config);

        seeder.seed(&mut store, at()).await.unwrap();
        let again = seeder.seed(&mut store, at()).await.unwrap();

        assert!(again.is_noop());
    }

    #[tokio::test]
    async fn failing_step_aborts_the_rest() {
        let mut uow = setup().await;
        let config = config();

        let mut store = NoNewUsers {
            inner: SqliteIdentityStore::new(&mut uow),
        };
        let err = IdentitySeeder::new(&config)
            .seed(&mut store, at())
            .await
            .unwrap_err();

        match err {
            DataError::Seed { step, message } => {
                assert_eq!(step, SeedStep::AdminUser);
                assert!(message.contains("user 'root'"));
                assert!(message.contains("read-only"));
            }
            other => panic!("expected seed error, got {other:?}"),
        }

        // Steps before the failure stay applied; nothing after it ran.
        let mut store = SqliteIdentityStore::new(&mut uow);
        assert!(store.find_role("clerk").await.unwrap().is_some());
        assert!(store.find_user("root").await.unwrap().is_none());
        let links: i64 = sqlx::query_scalar(r#"SELECT COUNT(*) FROM "UserRole""#)
            .fetch_one(uow.connection())
            .await
            .unwrap();
        assert_eq!(links, 0);
    }

    #[tokio::test]
    async fn invalid_config_fails_before_touching_store() {
        let mut uow = setup().await;
        let mut store = SqliteIdentityStore::new(&mut uow);
        let mut config = config();
        config.admin.user_name = "  ".into();

        let err = IdentitySeeder::new(&config)
            .seed(&mut store, at())
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::Core(_)));
        assert!(store.find_role("Admin").await.unwrap().is_none());
    }

    #[test]
    fn missing_skips_existing_and_repeats() {
        let wanted = vec![
            Claim::permission("a"),
            Claim::permission("b"),
            Claim::permission("a"),
        ];
        let existing: HashSet<Claim> = [Claim::permission("b")].into_iter().collect();

        assert_eq!(missing(&wanted, &existing), vec![&Claim::permission("a")]);
    }
}
