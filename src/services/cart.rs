use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::DbPool,
    entities::{
        cart_item::{self, Entity as CartItemEntity},
        product::{self, Entity as ProductEntity},
    },
    errors::ServiceError,
};

#[derive(Debug, Deserialize, Validate)]
pub struct AddToCartInput {
    pub customer_id: Uuid,
    pub product_id: Uuid,
    #[validate(range(min = 1, message = "Quantity must be at least 1"))]
    pub quantity: i32,
}

#[derive(Debug, Serialize)]
pub struct CartLine {
    pub product_id: Uuid,
    pub name: String,
    pub price: Decimal,
    pub quantity: i32,
    pub line_total: Decimal,
}

#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartLine>,
    pub subtotal: Decimal,
}

/// A customer's shopping cart; rows merge by product on repeated adds.
#[derive(Clone)]
pub struct CartService {
    db: Arc<DbPool>,
}

impl CartService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    #[instrument(skip(self, input), fields(customer_id = %input.customer_id, product_id = %input.product_id))]
    pub async fn add_item(&self, input: AddToCartInput) -> Result<cart_item::Model, ServiceError> {
        input
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let product = ProductEntity::find_by_id(input.product_id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("product {} not found", input.product_id))
            })?;
        if !product.is_active {
            return Err(ServiceError::InvalidOperation(format!(
                "product '{}' is not available",
                product.name
            )));
        }

        let existing = CartItemEntity::find()
            .filter(cart_item::Column::CustomerId.eq(input.customer_id))
            .filter(cart_item::Column::ProductId.eq(input.product_id))
            .one(&*self.db)
            .await?;

        let requested = input.quantity + existing.as_ref().map_or(0, |item| item.quantity);
        if requested > product.stock {
            return Err(ServiceError::InvalidOperation(format!(
                "insufficient stock for '{}': {} requested, {} available",
                product.name, requested, product.stock
            )));
        }

        let item = match existing {
            Some(item) => {
                let mut active: cart_item::ActiveModel = item.into();
                active.quantity = Set(requested);
                active.update(&*self.db).await?
            }
            None => {
                cart_item::ActiveModel {
                    id: Set(Uuid::new_v4()),
                    customer_id: Set(input.customer_id),
                    product_id: Set(input.product_id),
                    quantity: Set(input.quantity),
                    added_at: Set(Utc::now()),
                }
                .insert(&*self.db)
                .await?
            }
        };
        Ok(item)
    }

    /// Cart contents with product data and line totals.
    pub async fn get_cart(&self, customer_id: Uuid) -> Result<CartView, ServiceError> {
        let rows = CartItemEntity::find()
            .filter(cart_item::Column::CustomerId.eq(customer_id))
            .order_by_asc(cart_item::Column::AddedAt)
            .find_also_related(ProductEntity)
            .all(&*self.db)
            .await?;

        let mut items = Vec::with_capacity(rows.len());
        let mut subtotal = Decimal::ZERO;
        for (item, product) in rows {
            let product = product.ok_or_else(|| {
                ServiceError::InternalError(format!(
                    "cart item {} references a missing product",
                    item.id
                ))
            })?;
            let line_total = product.price * Decimal::from(item.quantity);
            subtotal += line_total;
            items.push(CartLine {
                product_id: product.id,
                name: product.name,
                price: product.price,
                quantity: item.quantity,
                line_total,
            });
        }

        Ok(CartView { items, subtotal })
    }

    pub async fn remove_item(
        &self,
        customer_id: Uuid,
        product_id: Uuid,
    ) -> Result<(), ServiceError> {
        let item = CartItemEntity::find()
            .filter(cart_item::Column::CustomerId.eq(customer_id))
            .filter(cart_item::Column::ProductId.eq(product_id))
            .one(&*self.db)
            .await?
            .ok_or_else(|| {
                ServiceError::NotFound(format!("product {} is not in the cart", product_id))
            })?;
        item.delete(&*self.db).await?;
        Ok(())
    }
}
