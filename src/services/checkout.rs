use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set,
    TransactionTrait,
};
use serde::Deserialize;
use tracing::{info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::DbPool,
    entities::{
        cart_item::{self, Entity as CartItemEntity},
        cash_flow_entry::FlowDirection,
        order::{self, Entity as OrderEntity, OrderStatus, PaymentStatus},
        order_item,
        product::{self, Entity as ProductEntity},
    },
    errors::ServiceError,
    services::{
        cash_flow::CashFlowService, journal::unique_transaction_number, orders::OrderWithItems,
    },
};

#[derive(Debug, Deserialize, Validate)]
pub struct CheckoutInput {
    pub customer_id: Uuid,
    #[validate(length(min = 1, message = "Shipping address is required"))]
    pub shipping_address: String,
    #[validate(length(min = 1, message = "Shipping method is required"))]
    pub shipping_method: String,
    #[validate(length(min = 1, message = "Payment method is required"))]
    pub payment_method: String,
}

/// Turns a cart into an order: stock check, stock decrement, order + items,
/// cart cleanup, all in one transaction.
#[derive(Clone)]
pub struct CheckoutService {
    db: Arc<DbPool>,
    cash_flow: Arc<CashFlowService>,
    shipping_flat_rate: Decimal,
}

impl CheckoutService {
    pub fn new(db: Arc<DbPool>, cash_flow: Arc<CashFlowService>, shipping_flat_rate: Decimal) -> Self {
        Self {
            db,
            cash_flow,
            shipping_flat_rate,
        }
    }

    #[instrument(skip(self, input), fields(customer_id = %input.customer_id))]
    pub async fn checkout(&self, input: CheckoutInput) -> Result<OrderWithItems, ServiceError> {
        input
            .validate()
            .map_err(|e| ServiceError::ValidationError(e.to_string()))?;

        let txn = self.db.begin().await?;

        let cart_rows = CartItemEntity::find()
            .filter(cart_item::Column::CustomerId.eq(input.customer_id))
            .find_also_related(ProductEntity)
            .all(&txn)
            .await?;
        if cart_rows.is_empty() {
            return Err(ServiceError::ValidationError("cart is empty".to_string()));
        }

        let order_id = Uuid::new_v4();
        let now = Utc::now();
        let mut items = Vec::with_capacity(cart_rows.len());
        let mut product_total = Decimal::ZERO;

        for (item, maybe_product) in &cart_rows {
            let product = maybe_product.as_ref().ok_or_else(|| {
                ServiceError::InternalError(format!(
                    "cart item {} references a missing product",
                    item.id
                ))
            })?;
            if product.stock < item.quantity {
                return Err(ServiceError::InvalidOperation(format!(
                    "insufficient stock for '{}': {} requested, {} available",
                    product.name, item.quantity, product.stock
                )));
            }

            ProductEntity::update_many()
                .col_expr(
                    product::Column::Stock,
                    Expr::col(product::Column::Stock).sub(item.quantity),
                )
                .filter(product::Column::Id.eq(product.id))
                .exec(&txn)
                .await?;

            product_total += product.price * Decimal::from(item.quantity);
            items.push(order_item::ActiveModel {
                id: Set(Uuid::new_v4()),
                order_id: Set(order_id),
                product_id: Set(product.id),
                quantity: Set(item.quantity),
                price: Set(product.price),
                cost_price: Set(Some(product.cost_price)),
            });
        }

        let order = order::ActiveModel {
            id: Set(order_id),
            order_number: Set(unique_transaction_number("ORD")),
            customer_id: Set(input.customer_id),
            status: Set(OrderStatus::Pending),
            payment_status: Set(PaymentStatus::Unpaid),
            payment_method: Set(Some(input.payment_method)),
            shipping_address: Set(input.shipping_address),
            shipping_method: Set(Some(input.shipping_method)),
            total_amount: Set(product_total + self.shipping_flat_rate),
            order_date: Set(now),
            completed_date: Set(None),
            tracking_info: Set(None),
        }
        .insert(&txn)
        .await?;

        let mut inserted_items = Vec::with_capacity(items.len());
        for item in items {
            inserted_items.push(item.insert(&txn).await?);
        }

        CartItemEntity::delete_many()
            .filter(cart_item::Column::CustomerId.eq(input.customer_id))
            .exec(&txn)
            .await?;

        txn.commit().await?;

        info!(
            order_number = %order.order_number,
            total = %order.total_amount,
            "checkout completed"
        );
        Ok(OrderWithItems {
            order,
            items: inserted_items,
        })
    }

    /// Marks an order as paid, moves it to processing and records the cash
    /// inflow.
    #[instrument(skip(self), fields(order_id = %id))]
    pub async fn confirm_payment(&self, id: Uuid) -> Result<order::Model, ServiceError> {
        let txn = self.db.begin().await?;

        let order = OrderEntity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("order {} not found", id)))?;
        if order.payment_status == PaymentStatus::Paid {
            return Err(ServiceError::InvalidOperation(format!(
                "order {} is already paid",
                order.order_number
            )));
        }

        let mut active: order::ActiveModel = order.into();
        active.payment_status = Set(PaymentStatus::Paid);
        active.status = Set(OrderStatus::Processing);
        let order = active.update(&txn).await?;

        self.cash_flow
            .record_in(
                &txn,
                Utc::now(),
                format!("Pembayaran order #{}", order.order_number),
                "sales".to_string(),
                order.total_amount,
                FlowDirection::Inflow,
            )
            .await?;

        txn.commit().await?;

        info!(order_number = %order.order_number, "payment confirmed");
        Ok(order)
    }
}
