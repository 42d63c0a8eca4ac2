use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::{
        order::{self, Entity as OrderEntity, OrderStatus, PaymentStatus},
        order_item::{self, Entity as OrderItemEntity},
    },
    errors::ServiceError,
    services::{journal::PostedJournal, posting::PostingService},
};

#[derive(Debug, Serialize)]
pub struct OrderWithItems {
    pub order: order::Model,
    pub items: Vec<order_item::Model>,
}

/// Result of a status transition; `sales_journal` is set when the transition
/// to completed posted one.
#[derive(Debug, Serialize)]
pub struct StatusUpdate {
    pub order: order::Model,
    pub sales_journal: Option<PostedJournal>,
}

/// Order lifecycle management. Completing an order posts the automatic
/// sales journal in the same transaction.
#[derive(Clone)]
pub struct OrderService {
    db: Arc<DbPool>,
    posting: Arc<PostingService>,
}

impl OrderService {
    pub fn new(db: Arc<DbPool>, posting: Arc<PostingService>) -> Self {
        Self { db, posting }
    }

    pub async fn get_order(&self, id: Uuid) -> Result<OrderWithItems, ServiceError> {
        let order = OrderEntity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("order {} not found", id)))?;
        let items = OrderItemEntity::find()
            .filter(order_item::Column::OrderId.eq(order.id))
            .all(&*self.db)
            .await?;
        Ok(OrderWithItems { order, items })
    }

    /// All orders, newest first, optionally narrowed to one customer.
    pub async fn list_orders(
        &self,
        customer_id: Option<Uuid>,
    ) -> Result<Vec<OrderWithItems>, ServiceError> {
        let mut query = OrderEntity::find().order_by_desc(order::Column::OrderDate);
        if let Some(customer_id) = customer_id {
            query = query.filter(order::Column::CustomerId.eq(customer_id));
        }
        let rows = query
            .find_with_related(OrderItemEntity)
            .all(&*self.db)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(order, items)| OrderWithItems { order, items })
            .collect())
    }

    /// Moves an order to a new status. Requires payment; the `completed`
    /// transition stamps the completion date and posts the sales journal
    /// atomically with the status change.
    #[instrument(skip(self), fields(order_id = %id, status = %new_status))]
    pub async fn update_status(
        &self,
        id: Uuid,
        new_status: OrderStatus,
    ) -> Result<StatusUpdate, ServiceError> {
        let txn = self.db.begin().await?;

        let order = OrderEntity::find_by_id(id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("order {} not found", id)))?;

        if order.payment_status != PaymentStatus::Paid {
            return Err(ServiceError::InvalidOperation(format!(
                "order {} cannot change status before payment is received",
                order.order_number
            )));
        }
        if order.status == OrderStatus::Completed {
            return Err(ServiceError::InvalidOperation(format!(
                "order {} is already completed",
                order.order_number
            )));
        }

        let mut active: order::ActiveModel = order.into();
        active.status = Set(new_status);
        if new_status == OrderStatus::Completed {
            active.completed_date = Set(Some(Utc::now()));
        }
        let order = active.update(&txn).await?;

        let sales_journal = if new_status == OrderStatus::Completed {
            Some(self.posting.post_sales_journal_in(&txn, &order).await?)
        } else {
            None
        };

        txn.commit().await?;

        info!(order_number = %order.order_number, status = %order.status, "order status updated");
        Ok(StatusUpdate {
            order,
            sales_journal,
        })
    }
}
