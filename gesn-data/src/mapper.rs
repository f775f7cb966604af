//! ProductDto <-> Product mapping
//!
//! Pure functions. The discriminator is matched exhaustively against
//! [`ProductType`]; a row whose discriminator parses to nothing maps to
//! `None` and is dropped from list results.

use gesn_core::{
    Audit, CompositeProduct, Product, ProductCore, ProductGroup, ProductType, SimpleProduct,
};

use crate::entities::ProductDto;

/// Group products without a stored minimum apply the quantity price from 1.
const DEFAULT_MINIMUM_QUANTITY: i64 = 1;

/// Resolve a row into its concrete variant.
pub fn to_product(dto: ProductDto) -> Option<Product> {
    let kind = dto.kind()?;
    let assembly_minutes = dto.assembly_minutes;
    let minimum_quantity = dto.minimum_quantity;
    let core = core_from(dto);

    let product = match kind {
        ProductType::Simple => Product::Simple(SimpleProduct { core }),
        ProductType::Composite => Product::Composite(CompositeProduct {
            core,
            assembly_minutes: assembly_minutes.unwrap_or(0),
        }),
        ProductType::Group => Product::Group(ProductGroup {
            core,
            minimum_quantity: minimum_quantity.unwrap_or(DEFAULT_MINIMUM_QUANTITY),
        }),
    };
    Some(product)
}

/// Map a batch of rows, dropping unknown discriminators and keeping order.
pub fn to_products(dtos: impl IntoIterator<Item = ProductDto>) -> Vec<Product> {
    dtos.into_iter().filter_map(to_product).collect()
}

/// Flatten a product back into its row shape.
pub fn to_dto(product: &Product) -> ProductDto {
    let core = product.core();
    let (assembly_minutes, minimum_quantity) = match product {
        Product::Simple(_) => (None, None),
        Product::Composite(p) => (Some(p.assembly_minutes), None),
        Product::Group(p) => (None, Some(p.minimum_quantity)),
    };

    ProductDto {
        id: core.id,
        product_type: product.kind().as_str().to_owned(),
        name: core.name.clone(),
        description: core.description.clone(),
        sku: core.sku.clone(),
        price_cents: core.price_cents,
        quantity_price_cents: core.quantity_price_cents,
        unit_price_cents: core.unit_price_cents,
        cost_cents: core.cost_cents,
        assembly_minutes,
        minimum_quantity,
        is_active: core.is_active,
        created_at: core.audit.created_at,
        created_by: core.audit.created_by.clone(),
        modified_at: core.audit.modified_at,
        modified_by: core.audit.modified_by.clone(),
    }
}

fn core_from(dto: ProductDto) -> ProductCore {
    ProductCore {
        id: dto.id,
        name: dto.name,
        description: dto.description,
        sku: dto.sku,
        price_cents: dto.price_cents,
        quantity_price_cents: dto.quantity_price_cents,
        unit_price_cents: dto.unit_price_cents,
        cost_cents: dto.cost_cents,
        is_active: dto.is_active,
        audit: Audit {
            created_at: dto.created_at,
            created_by: dto.created_by,
            modified_at: dto.modified_at,
            modified_by: dto.modified_by,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn dto(id: i64, product_type: &str) -> ProductDto {
        let at = Utc.with_ymd_and_hms(2024, 2, 10, 8, 0, 0).unwrap();
        ProductDto {
            id,
            product_type: product_type.to_owned(),
            name: format!("product {id}"),
            description: Some("desc".into()),
            sku: None,
            price_cents: 1_200,
            quantity_price_cents: 1_000,
            unit_price_cents: 1_100,
            cost_cents: 600,
            assembly_minutes: Some(30),
            minimum_quantity: Some(12),
            is_active: true,
            created_at: at,
            created_by: "seed".into(),
            modified_at: at,
            modified_by: "seed".into(),
        }
    }

    #[test]
    fn maps_each_discriminator_to_its_variant() {
        assert!(matches!(to_product(dto(1, "Simple")), Some(Product::Simple(_))));

        match to_product(dto(2, "Composite")) {
            Some(Product::Composite(p)) => assert_eq!(p.assembly_minutes, 30),
            other => panic!("expected composite, got {other:?}"),
        }

        match to_product(dto(3, "Group")) {
            Some(Product::Group(p)) => assert_eq!(p.minimum_quantity, 12),
            other => panic!("expected group, got {other:?}"),
        }
    }

    #[test]
    fn shared_fields_are_copied() {
        let product = to_product(dto(9, "Simple")).unwrap();
        let core = product.core();
        assert_eq!(core.id, 9);
        assert_eq!(core.name, "product 9");
        assert_eq!(core.description.as_deref(), Some("desc"));
        assert_eq!(core.unit_price_cents, 1_100);
        assert_eq!(core.audit.created_by, "seed");
    }

    #[test]
    fn unknown_discriminator_yields_none() {
        assert!(to_product(dto(1, "Service")).is_none());
        assert!(to_product(dto(1, "")).is_none());
    }

    #[test]
    fn list_mapping_drops_unknown_and_keeps_order() {
        let products = to_products(vec![
            dto(1, "Group"),
            dto(2, "Legacy"),
            dto(3, "Simple"),
            dto(4, "Composite"),
        ]);

        let ids: Vec<i64> = products.iter().map(Product::id).collect();
        assert_eq!(ids, vec![1, 3, 4]);
    }

    #[test]
    fn missing_variant_columns_fall_back() {
        let mut row = dto(5, "Group");
        row.minimum_quantity = None;
        match to_product(row) {
            Some(Product::Group(p)) => assert_eq!(p.minimum_quantity, DEFAULT_MINIMUM_QUANTITY),
            other => panic!("expected group, got {other:?}"),
        }
    }

    #[test]
    fn to_dto_clears_foreign_variant_columns() {
        let simple = to_product(dto(1, "Simple")).unwrap();
        let row = to_dto(&simple);
        assert_eq!(row.product_type, "Simple");
        assert_eq!(row.assembly_minutes, None);
        assert_eq!(row.minimum_quantity, None);

        let composite = to_product(dto(2, "Composite")).unwrap();
        assert_eq!(to_product(to_dto(&composite)), Some(composite));
    }
}
