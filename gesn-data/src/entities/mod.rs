//! Row shapes persisted through the generic repository
//!
//! Column names are PascalCase to match the schema; struct fields map onto
//! them through `#[sqlx(rename_all = "PascalCase")]`.

pub mod customer;
pub mod order;
pub mod product;

pub use customer::Customer;
pub use order::Order;
pub use product::ProductDto;
