//! Product family: one shared attribute set, three concrete variants
//!
//! The variant set is closed. Adding a variant means adding a
//! [`ProductType`] value, a struct, and a match arm everywhere the compiler
//! asks for one.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Audit, CoreError};

/// Discriminator stored in the `ProductType` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductType {
    Simple,
    Composite,
    Group,
}

impl ProductType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Simple => "Simple",
            Self::Composite => "Composite",
            Self::Group => "Group",
        }
    }
}

impl fmt::Display for ProductType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for ProductType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Simple" => Ok(Self::Simple),
            "Composite" => Ok(Self::Composite),
            "Group" => Ok(Self::Group),
            other => Err(CoreError::UnknownProductType(other.to_owned())),
        }
    }
}

/// Attributes every product variant carries. Money is in cents.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductCore {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub price_cents: i64,
    pub quantity_price_cents: i64,
    pub unit_price_cents: i64,
    pub cost_cents: i64,
    pub is_active: bool,
    pub audit: Audit,
}

/// Sold as-is, priced per unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimpleProduct {
    pub core: ProductCore,
}

/// Assembled to order from other products.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeProduct {
    pub core: ProductCore,
    /// Assembly time for a single unit
    pub assembly_minutes: i64,
}

/// A bundle sold at `quantity_price` once `minimum_quantity` is reached.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductGroup {
    pub core: ProductCore,
    pub minimum_quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Product {
    Simple(SimpleProduct),
    Composite(CompositeProduct),
    Group(ProductGroup),
}

impl Product {
    pub fn kind(&self) -> ProductType {
        match self {
            Self::Simple(_) => ProductType::Simple,
            Self::Composite(_) => ProductType::Composite,
            Self::Group(_) => ProductType::Group,
        }
    }

    pub fn core(&self) -> &ProductCore {
        match self {
            Self::Simple(p) => &p.core,
            Self::Composite(p) => &p.core,
            Self::Group(p) => &p.core,
        }
    }

    pub fn core_mut(&mut self) -> &mut ProductCore {
        match self {
            Self::Simple(p) => &mut p.core,
            Self::Composite(p) => &mut p.core,
            Self::Group(p) => &mut p.core,
        }
    }

    pub fn id(&self) -> i64 {
        self.core().id
    }

    pub fn name(&self) -> &str {
        &self.core().name
    }

    /// Total price in cents for `quantity` units.
    ///
    /// `None` when `quantity` is below 1 or the total overflows `i64`.
    pub fn price_for(&self, quantity: i64) -> Option<i64> {
        if quantity < 1 {
            return None;
        }
        let per_unit = match self {
            Self::Simple(p) => p.core.unit_price_cents,
            Self::Composite(p) => p.core.unit_price_cents,
            Self::Group(p) if quantity >= p.minimum_quantity => p.core.quantity_price_cents,
            Self::Group(p) => p.core.price_cents,
        };
        per_unit.checked_mul(quantity)
    }

    /// Production lead time in minutes for `quantity` units.
    ///
    /// Same `None` cases as [`Product::price_for`].
    pub fn lead_time_minutes(&self, quantity: i64) -> Option<i64> {
        if quantity < 1 {
            return None;
        }
        match self {
            Self::Composite(p) => p.assembly_minutes.checked_mul(quantity),
            Self::Simple(_) | Self::Group(_) => Some(0),
        }
    }

    /// Unit margin in cents (unit price minus cost).
    pub fn unit_margin_cents(&self) -> i64 {
        let core = self.core();
        core.unit_price_cents - core.cost_cents
    }
}
