//! Flat product row, one table for every product variant
//!
//! `ProductType` is the discriminator. Variant-only columns are nullable and
//! ignored by variants that do not use them. See [`crate::mapper`].

use chrono::{DateTime, Utc};
use gesn_core::ProductType;
use sqlx::FromRow;

use crate::db::{Entity, SqlValue};

#[derive(Debug, Clone, PartialEq, FromRow)]
#[sqlx(rename_all = "PascalCase")]
pub struct ProductDto {
    pub id: i64,
    pub product_type: String,
    pub name: String,
    pub description: Option<String>,
    pub sku: Option<String>,
    pub price_cents: i64,
    pub quantity_price_cents: i64,
    pub unit_price_cents: i64,
    pub cost_cents: i64,
    /// Composite only
    pub assembly_minutes: Option<i64>,
    /// Group only
    pub minimum_quantity: Option<i64>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub created_by: String,
    pub modified_at: DateTime<Utc>,
    pub modified_by: String,
}

impl ProductDto {
    /// Typed discriminator, `None` when the stored value is unknown.
    pub fn kind(&self) -> Option<ProductType> {
        self.product_type.parse().ok()
    }
}

impl Entity for ProductDto {
    const TABLE: &'static str = "Product";
    const COLUMNS: &'static [&'static str] = &[
        "ProductType",
        "Name",
        "Description",
        "Sku",
        "PriceCents",
        "QuantityPriceCents",
        "UnitPriceCents",
        "CostCents",
        "AssemblyMinutes",
        "MinimumQuantity",
        "IsActive",
        "CreatedAt",
        "CreatedBy",
        "ModifiedAt",
        "ModifiedBy",
    ];

    fn id(&self) -> i64 {
        self.id
    }

    fn values(&self) -> Vec<SqlValue> {
        vec![
            self.product_type.clone().into(),
            self.name.clone().into(),
            self.description.clone().into(),
            self.sku.clone().into(),
            self.price_cents.into(),
            self.quantity_price_cents.into(),
            self.unit_price_cents.into(),
            self.cost_cents.into(),
            self.assembly_minutes.into(),
            self.minimum_quantity.into(),
            self.is_active.into(),
            self.created_at.into(),
            self.created_by.clone().into(),
            self.modified_at.into(),
            self.modified_by.clone().into(),
        ]
    }
}
