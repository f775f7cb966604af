//! Schema and identity bootstrap commands
//!
//! Commands: migrate, seed

use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use gesn_core::GesnConfig;
use gesn_data::db::schema;
use gesn_data::{IdentitySeeder, SeedReport, SqliteIdentityStore, UnitOfWork};
use tracing::warn;

#[derive(Parser, Debug)]
pub struct SeedArgs {
    /// Actor recorded in the admin account's audit columns
    #[arg(long, default_value = "system")]
    pub actor: String,
}

pub async fn run_migrate(config: &GesnConfig) -> Result<()> {
    let mut uow = super::open(config).await?;

    uow.begin_transaction().await?;
    if let Err(e) = schema::apply(&mut uow).await {
        uow.rollback().await?;
        return Err(e).context("Failed to apply schema");
    }
    uow.commit().await.context("Failed to commit schema")?;
    uow.close().await?;

    println!("Schema ready at {}", config.database.url);
    Ok(())
}

pub async fn run_seed(config: &GesnConfig, args: SeedArgs) -> Result<()> {
    let mut uow = super::open(config).await?;

    // Schema and seed land together or not at all
    uow.begin_transaction().await?;
    let report = match seed_in(&mut uow, config, &args.actor).await {
        Ok(report) => report,
        Err(e) => {
            warn!(error = %e, "seeding failed, rolling back");
            uow.rollback().await?;
            return Err(e);
        }
    };
    uow.commit().await.context("Failed to commit seed")?;
    uow.close().await?;

    print_report(&report);
    Ok(())
}

async fn seed_in(uow: &mut UnitOfWork, config: &GesnConfig, actor: &str) -> Result<SeedReport> {
    schema::apply(uow).await.context("Failed to apply schema")?;

    let mut store = SqliteIdentityStore::new(uow);
    let report = IdentitySeeder::new(&config.seed)
        .with_actor(actor)
        .seed(&mut store, Utc::now())
        .await
        .context("Identity seeding failed")?;
    Ok(report)
}

fn print_report(report: &SeedReport) {
    if report.is_noop() {
        println!("Identity already seeded, nothing to do");
        return;
    }

    println!("Identity seeded:");
    println!("  roles created:        {}", report.roles_created);
    println!("  role claims added:    {}", report.role_claims_added);
    println!(
        "  admin account:        {}",
        if report.admin_created { "created" } else { "existing" }
    );
    println!("  admin roles added:    {}", report.admin_roles_added);
    println!("  admin claims added:   {}", report.admin_claims_added);
}
