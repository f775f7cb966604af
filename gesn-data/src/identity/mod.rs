//! Identity persistence and startup seeding
//!
//! The seeder only talks to the narrow [`IdentityStore`] interface;
//! [`SqliteIdentityStore`] implements it on top of a unit of work.

pub mod entities;
pub mod password;
pub mod seeder;
pub mod store;

use std::fmt;

pub use entities::{Role, User};
pub use seeder::{IdentitySeeder, SeedReport};
pub use store::{IdentityStore, NewUser, SqliteIdentityStore};

/// The five seeding steps, in the order they run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedStep {
    Roles,
    RoleClaims,
    AdminUser,
    AdminRoles,
    AdminClaims,
}

impl SeedStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Roles => "roles",
            Self::RoleClaims => "role claims",
            Self::AdminUser => "admin user",
            Self::AdminRoles => "admin roles",
            Self::AdminClaims => "admin claims",
        }
    }
}

impl fmt::Display for SeedStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
