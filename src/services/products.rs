use std::sync::Arc;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::product::{self, Entity as ProductEntity},
    errors::ServiceError,
};

/// Read access to the product catalog.
#[derive(Clone)]
pub struct ProductCatalogService {
    db: Arc<DbPool>,
}

impl ProductCatalogService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Active products, featured first.
    pub async fn list_active(&self) -> Result<Vec<product::Model>, ServiceError> {
        let products = ProductEntity::find()
            .filter(product::Column::IsActive.eq(true))
            .order_by_desc(product::Column::IsFeatured)
            .order_by_asc(product::Column::Name)
            .all(&*self.db)
            .await?;
        Ok(products)
    }

    pub async fn get(&self, id: Uuid) -> Result<product::Model, ServiceError> {
        ProductEntity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("product {} not found", id)))
    }
}
