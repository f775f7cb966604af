//! Product catalog commands
//!
//! Commands: list, show

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use gesn_core::{GesnConfig, Product};
use gesn_data::ProductCatalog;

use super::format_cents;

#[derive(Parser, Debug)]
pub struct ProductsArgs {
    #[command(subcommand)]
    pub command: ProductsCommands,
}

#[derive(Subcommand, Debug)]
pub enum ProductsCommands {
    /// List products (rows with an unknown type are skipped)
    List(ListArgs),
    /// Show one product with its price for a quantity
    Show(ShowArgs),
}

#[derive(Parser, Debug)]
pub struct ListArgs {
    /// Include inactive products
    #[arg(long)]
    pub all: bool,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Product id
    pub id: i64,

    /// Quantity to price (at least 1)
    #[arg(long, short, default_value_t = 1, value_parser = clap::value_parser!(i64).range(1..))]
    pub quantity: i64,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

pub async fn run_products(config: &GesnConfig, args: ProductsArgs) -> Result<()> {
    match args.command {
        ProductsCommands::List(args) => run_list(config, args).await,
        ProductsCommands::Show(args) => run_show(config, args).await,
    }
}

async fn run_list(config: &GesnConfig, args: ListArgs) -> Result<()> {
    let mut uow = super::open(config).await?;
    let catalog = ProductCatalog::new();
    let products = catalog
        .find(&mut uow, |p| args.all || p.core().is_active)
        .await
        .context("Failed to list products")?;
    uow.close().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&products)?);
        return Ok(());
    }
    if products.is_empty() {
        println!("No products found");
        return Ok(());
    }

    println!("{:>6}  {:<10}  {:<32}  {:>10}", "ID", "TYPE", "NAME", "UNIT");
    for product in &products {
        println!(
            "{:>6}  {:<10}  {:<32}  {:>10}{}",
            product.id(),
            product.kind(),
            product.name(),
            format_cents(product.core().unit_price_cents),
            if product.core().is_active { "" } else { "  (inactive)" }
        );
    }
    Ok(())
}

async fn run_show(config: &GesnConfig, args: ShowArgs) -> Result<()> {
    let mut uow = super::open(config).await?;
    let product = ProductCatalog::new()
        .get(&mut uow, args.id)
        .await
        .with_context(|| format!("Failed to load product {}", args.id))?;
    uow.close().await?;

    let Some(product) = product else {
        anyhow::bail!("Product {} not found", args.id);
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&product)?);
        return Ok(());
    }
    print_product(&product, args.quantity)
}

fn print_product(product: &Product, quantity: i64) -> Result<()> {
    let total = product
        .price_for(quantity)
        .with_context(|| format!("Price for {quantity} units does not fit in cents"))?;
    let lead = product
        .lead_time_minutes(quantity)
        .with_context(|| format!("Lead time for {quantity} units does not fit in minutes"))?;

    let core = product.core();
    println!("{} #{} ({})", core.name, core.id, product.kind());
    if let Some(sku) = &core.sku {
        println!("  sku:          {sku}");
    }
    if let Some(description) = &core.description {
        println!("  description:  {description}");
    }
    println!("  price:        {}", format_cents(core.price_cents));
    println!("  unit price:   {}", format_cents(core.unit_price_cents));
    println!("  cost:         {}", format_cents(core.cost_cents));
    println!("  unit margin:  {}", format_cents(product.unit_margin_cents()));

    match product {
        Product::Simple(_) => {}
        Product::Composite(c) => println!("  assembly:     {} min/unit", c.assembly_minutes),
        Product::Group(g) => println!(
            "  group price:  {} from {} units",
            format_cents(core.quantity_price_cents),
            g.minimum_quantity
        ),
    }

    println!("  x{quantity}:          {}", format_cents(total));
    if lead > 0 {
        println!("  lead time:    {lead} min");
    }
    Ok(())
}
