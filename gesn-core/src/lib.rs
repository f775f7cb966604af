//! gesn-core: domain types shared by the GesN data layer and its CLI
//!
//! Nothing in here touches the database. Persistence shapes live in
//! `gesn-data`; this crate holds the typed values they map into.

pub mod audit;
pub mod config;
pub mod error;
pub mod identity;
pub mod order;
pub mod product;

pub use audit::Audit;
pub use config::{AdminSeed, DatabaseConfig, GesnConfig, RoleSeed, SeedConfig};
pub use error::{CoreError, Result};
pub use identity::{normalize_name, Claim};
pub use order::OrderStatus;
pub use product::{
    CompositeProduct, Product, ProductCore, ProductGroup, ProductType, SimpleProduct,
};
