//! Config resolution and the `gesn config` subcommands

use std::fs;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use gesn_core::GesnConfig;
use tracing::debug;

/// Global flags that shape which config is loaded.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    /// `--config`; falls back to `$GESN_CONFIG` or ~/.gesn/config.toml
    pub config_path: Option<PathBuf>,
    /// `--database` / `DATABASE_URL`; wins over the file
    pub database_url: Option<String>,
}

impl Settings {
    pub fn config_path(&self) -> PathBuf {
        self.config_path.clone().unwrap_or_else(GesnConfig::config_path)
    }

    /// Effective config: file (or defaults) plus command-line overrides.
    ///
    /// An explicit `--config` must exist; the default location may be absent.
    pub fn load(&self) -> Result<GesnConfig> {
        let mut config = match &self.config_path {
            Some(path) => GesnConfig::load_from(path)
                .with_context(|| format!("Failed to load config from {}", path.display()))?,
            None => GesnConfig::load().context("Failed to load config")?,
        };

        if let Some(url) = &self.database_url {
            debug!(%url, "database URL overridden");
            config.database.url = url.clone();
        }
        Ok(config)
    }
}

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show config file path
    Path,
    /// Print the effective config as TOML
    Show,
    /// Write a config file with the default values
    Init(InitArgs),
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Force overwrite existing config
    #[arg(long, short)]
    pub force: bool,
}

pub fn run_config(settings: &Settings, args: ConfigArgs) -> Result<()> {
    match args.command {
        ConfigCommands::Path => run_path(settings),
        ConfigCommands::Show => run_show(settings),
        ConfigCommands::Init(args) => run_init(settings, args),
    }
}

fn run_path(settings: &Settings) -> Result<()> {
    println!("{}", settings.config_path().display());
    Ok(())
}

fn run_show(settings: &Settings) -> Result<()> {
    let config = settings.load()?;
    let toml_str = config
        .to_toml_string()
        .context("Failed to serialize config to TOML")?;
    println!("{toml_str}");
    Ok(())
}

fn run_init(settings: &Settings, args: InitArgs) -> Result<()> {
    let config_path = settings.config_path();

    if config_path.exists() && !args.force {
        bail!(
            "Config already exists at {}\n\nUse --force to overwrite",
            config_path.display()
        );
    }

    if let Some(parent) = config_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }

    let content = GesnConfig::default()
        .to_toml_string()
        .context("Failed to serialize default config")?;
    fs::write(&config_path, content)
        .with_context(|| format!("Failed to write config file: {}", config_path.display()))?;

    println!("Created config at: {}", config_path.display());
    println!("Change [seed.admin] password before running `gesn seed` outside development.");
    Ok(())
}
