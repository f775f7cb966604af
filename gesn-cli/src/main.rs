//! gesn CLI - operator tooling for the GesN database
//!
//! - Schema creation (`migrate`)
//! - Idempotent identity bootstrap (`seed`)
//! - Read-only views over products, customers and orders
//! - Config file management (`config`)

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

mod commands;
mod config;
mod tracing_setup;

use config::Settings;
use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(
    name = "gesn",
    author,
    version,
    about = "GesN database tooling: schema, identity seeding and catalog inspection"
)]
struct Cli {
    /// Database URL, overrides the config file (e.g. sqlite://./gesn.db)
    #[arg(long, global = true, env = "DATABASE_URL", value_name = "URL")]
    database: Option<String>,

    /// Config file (default: $GESN_CONFIG or ~/.gesn/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG is set
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create any missing tables and indexes
    Migrate,
    /// Apply the schema, then seed roles, claims and the admin account
    Seed(commands::seed::SeedArgs),
    /// Inspect the product catalog
    Products(commands::products::ProductsArgs),
    /// Inspect customers
    Customers(commands::customers::CustomersArgs),
    /// Inspect orders
    Orders(commands::orders::OrdersArgs),
    /// Manage the gesn config file (path, show, init)
    Config(config::ConfigArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env first so DATABASE_URL from it reaches clap
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    tracing_setup::init(&TracingConfig { debug: cli.debug }).ok();

    let settings = Settings {
        config_path: cli.config,
        database_url: cli.database,
    };

    match cli.command {
        Commands::Migrate => commands::seed::run_migrate(&settings.load()?).await?,
        Commands::Seed(args) => commands::seed::run_seed(&settings.load()?, args).await?,
        Commands::Products(args) => commands::products::run_products(&settings.load()?, args).await?,
        Commands::Customers(args) => {
            commands::customers::run_customers(&settings.load()?, args).await?
        }
        Commands::Orders(args) => commands::orders::run_orders(&settings.load()?, args).await?,
        Commands::Config(args) => config::run_config(&settings, args)?,
        Commands::Completions(args) => run_completions(args)?,
    }
    Ok(())
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}
