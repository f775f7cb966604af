//! Product catalog: the generic repository plus the mapper
//!
//! Callers deal in [`Product`] values; rows with an unknown discriminator
//! never surface here.

use gesn_core::Product;
use tracing::debug;

use crate::db::{Repository, UnitOfWork};
use crate::entities::ProductDto;
use crate::mapper;
use crate::Result;

#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    repo: Repository<ProductDto>,
}

impl ProductCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// `None` when the row is missing or its discriminator is unknown.
    pub async fn get(&self, uow: &mut UnitOfWork, id: i64) -> Result<Option<Product>> {
        let dto = self.repo.get_by_id(uow, id).await?;
        Ok(dto.and_then(mapper::to_product))
    }

    pub async fn list(&self, uow: &mut UnitOfWork) -> Result<Vec<Product>> {
        let rows = self.repo.get_all(uow).await?;
        let total = rows.len();
        let products = mapper::to_products(rows);
        if products.len() < total {
            debug!(dropped = total - products.len(), "skipped rows with unknown product type");
        }
        Ok(products)
    }

    /// In-memory filter over [`ProductCatalog::list`].
    pub async fn find<P>(&self, uow: &mut UnitOfWork, predicate: P) -> Result<Vec<Product>>
    where
        P: Fn(&Product) -> bool,
    {
        let products = self.list(uow).await?;
        Ok(products.into_iter().filter(|p| predicate(p)).collect())
    }

    /// Insert and return the new id. The product's own id is ignored.
    pub async fn add(&self, uow: &mut UnitOfWork, product: &Product) -> Result<i64> {
        self.repo.add(uow, &mapper::to_dto(product)).await
    }

    pub async fn update(&self, uow: &mut UnitOfWork, product: &Product) -> Result<bool> {
        self.repo.update(uow, &mapper::to_dto(product)).await
    }

    pub async fn delete(&self, uow: &mut UnitOfWork, id: i64) -> Result<bool> {
        self.repo.delete(uow, id).await
    }
}
