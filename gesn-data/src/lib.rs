//! gesn-data: data access for GesN
//!
//! A [`UnitOfWork`] owns one SQLite connection and its (possibly nested)
//! transaction. Repositories are stateless and take the unit of work as an
//! explicit argument, so every call joins whatever transaction is open on it.

pub mod catalog;
pub mod db;
pub mod entities;
pub mod error;
pub mod identity;
pub mod mapper;

pub use catalog::ProductCatalog;
pub use db::{Entity, Repository, SqlValue, UnitOfWork};
pub use entities::{Customer, Order, ProductDto};
pub use error::{DataError, Result};
pub use identity::{IdentitySeeder, IdentityStore, SeedReport, SeedStep, SqliteIdentityStore};
