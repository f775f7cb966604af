//! Error types for gesn-data
//!
//! Not-found is never an error here: lookups return `Option` or an empty
//! `Vec`. Database faults pass through untouched inside [`DataError::Database`].

use thiserror::Error;

use crate::identity::SeedStep;

pub type Result<T> = std::result::Result<T, DataError>;

#[derive(Error, Debug)]
pub enum DataError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("commit called with no active transaction")]
    NoActiveTransaction,

    #[error("identity seeding failed at step '{step}': {message}")]
    Seed { step: SeedStep, message: String },

    #[error(transparent)]
    Core(#[from] gesn_core::CoreError),
}
