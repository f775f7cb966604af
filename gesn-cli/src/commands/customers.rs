//! Customer listing

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gesn_core::GesnConfig;
use gesn_data::{Customer, Repository};

#[derive(Parser, Debug)]
pub struct CustomersArgs {
    #[command(subcommand)]
    pub command: CustomersCommands,
}

#[derive(Subcommand, Debug)]
pub enum CustomersCommands {
    /// List customers
    List {
        /// Include inactive customers
        #[arg(long)]
        all: bool,
    },
}

pub async fn run_customers(config: &GesnConfig, args: CustomersArgs) -> Result<()> {
    match args.command {
        CustomersCommands::List { all } => run_list(config, all).await,
    }
}

async fn run_list(config: &GesnConfig, all: bool) -> Result<()> {
    let mut uow = super::open(config).await?;
    let customers = Repository::<Customer>::default()
        .find(&mut uow, |c| all || c.is_active)
        .await
        .context("Failed to list customers")?;
    uow.close().await?;

    if customers.is_empty() {
        println!("No customers found");
        return Ok(());
    }

    println!("{:>6}  {:<32}  {:<28}  {}", "ID", "NAME", "EMAIL", "PHONE");
    for c in &customers {
        println!(
            "{:>6}  {:<32}  {:<28}  {}",
            c.id,
            c.full_name(),
            c.email.as_deref().unwrap_or("-"),
            c.phone.as_deref().unwrap_or("-")
        );
    }
    Ok(())
}
