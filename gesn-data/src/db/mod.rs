//! Database layer - unit of work, generic repository and schema
//!
//! # Design Principles
//!
//! - One connection per unit of work, no pool in this layer
//! - Transaction state lives on the unit of work and is reached only through
//!   a `&mut UnitOfWork` handed to each call
//! - Entities describe their own columns; SQL is generated from that
//!   descriptor, never from runtime inspection

pub mod repository;
pub mod schema;
pub mod unit_of_work;
pub mod value;

pub use repository::{Entity, Repository};
pub use unit_of_work::UnitOfWork;
pub use value::SqlValue;
