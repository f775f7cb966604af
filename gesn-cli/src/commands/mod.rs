//! Command implementations for the gesn CLI

pub mod customers;
pub mod orders;
pub mod products;
pub mod seed;

use anyhow::{Context, Result};
use gesn_core::GesnConfig;
use gesn_data::UnitOfWork;

/// Open a unit of work on the configured database.
pub(crate) async fn open(config: &GesnConfig) -> Result<UnitOfWork> {
    UnitOfWork::connect(&config.database)
        .await
        .with_context(|| format!("Failed to open database {}", config.database.url))
}

/// Render cents as a decimal amount, e.g. `-1205` as `-12.05`.
pub(crate) fn format_cents(cents: i64) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs = cents.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}
