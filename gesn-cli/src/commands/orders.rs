//! Order listing

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gesn_core::GesnConfig;
use gesn_data::{Order, Repository};

use super::format_cents;

#[derive(Parser, Debug)]
pub struct OrdersArgs {
    #[command(subcommand)]
    pub command: OrdersCommands,
}

#[derive(Subcommand, Debug)]
pub enum OrdersCommands {
    /// List orders, newest first
    List {
        /// Only orders of this customer id
        #[arg(long, value_name = "ID")]
        customer: Option<i64>,
    },
}

pub async fn run_orders(config: &GesnConfig, args: OrdersArgs) -> Result<()> {
    match args.command {
        OrdersCommands::List { customer } => run_list(config, customer).await,
    }
}

async fn run_list(config: &GesnConfig, customer: Option<i64>) -> Result<()> {
    let mut uow = super::open(config).await?;
    let mut orders = Repository::<Order>::default()
        .find(&mut uow, |o| customer.map_or(true, |id| o.customer_id == id))
        .await
        .context("Failed to list orders")?;
    uow.close().await?;

    if orders.is_empty() {
        println!("No orders found");
        return Ok(());
    }
    orders.sort_by(|a, b| b.order_date.cmp(&a.order_date).then(b.id.cmp(&a.id)));

    println!("{:>6}  {:>8}  {:<10}  {:<12}  {:>10}", "ID", "CUSTOMER", "DATE", "STATUS", "TOTAL");
    for o in &orders {
        // Unknown statuses are shown raw rather than hidden
        let status = o
            .status()
            .map(|s| s.to_string())
            .unwrap_or_else(|_| format!("?{}", o.status));
        println!(
            "{:>6}  {:>8}  {:<10}  {:<12}  {:>10}",
            o.id,
            o.customer_id,
            o.order_date.format("%Y-%m-%d"),
            status,
            format_cents(o.total_cents)
        );
    }
    Ok(())
}
