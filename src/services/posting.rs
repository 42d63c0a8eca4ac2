use std::sync::Arc;

use chrono::Utc;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sea_orm::{
    sea_query::Expr, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait,
};
use serde::Serialize;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::{
        account::{self, Entity as AccountEntity},
        journal_entry::JournalType,
        order,
        order_item::{self, Entity as OrderItemEntity},
        product::{self, Entity as ProductEntity},
    },
    errors::ServiceError,
    services::{
        accounts::kinds,
        journal::{unique_transaction_number, JournalLine, JournalService, NewJournal, PostedJournal},
    },
};

/// Transaction-number prefix for automatic sales journals.
const SALES_PREFIX: &str = "SALES";

/// Stock added to one product from a purchase journal.
#[derive(Debug, Clone, Serialize)]
pub struct StockAdjustment {
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity_added: i32,
}

/// Side-effect functions on the boundary between the order subsystem and the
/// bookkeeping core: sales journals on order completion, stock adjustments
/// from purchase journals.
#[derive(Clone)]
pub struct PostingService {
    db: Arc<DbPool>,
    journal: Arc<JournalService>,
}

impl PostingService {
    pub fn new(db: Arc<DbPool>, journal: Arc<JournalService>) -> Self {
        Self { db, journal }
    }

    /// Posts the two-line sales journal (debit kas, credit pendapatan) for a
    /// completed order. The amount is the product-line total, shipping
    /// excluded.
    #[instrument(skip(self, conn, order), fields(order_number = %order.order_number))]
    pub async fn post_sales_journal_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        order: &order::Model,
    ) -> Result<PostedJournal, ServiceError> {
        let items = OrderItemEntity::find()
            .filter(order_item::Column::OrderId.eq(order.id))
            .all(conn)
            .await?;

        let product_total: Decimal = items.iter().map(|item| item.line_total()).sum();
        if product_total <= Decimal::ZERO {
            return Err(ServiceError::InvalidOperation(format!(
                "order {} has no product lines to post",
                order.order_number
            )));
        }

        let kas = self.account_by_kind(conn, kinds::KAS).await?;
        let pendapatan = self.account_by_kind(conn, kinds::PENDAPATAN).await?;

        let lines = vec![
            JournalLine {
                account_id: kas.id,
                debit: product_total,
                credit: Decimal::ZERO,
                description: Some(format!(
                    "Penerimaan penjualan order #{}",
                    order.order_number
                )),
                product_id: None,
            },
            JournalLine {
                account_id: pendapatan.id,
                debit: Decimal::ZERO,
                credit: product_total,
                description: Some(format!(
                    "Pendapatan penjualan order #{}",
                    order.order_number
                )),
                product_id: None,
            },
        ];

        let posted = self
            .journal
            .post_journal_in(
                conn,
                NewJournal {
                    transaction_number: unique_transaction_number(SALES_PREFIX),
                    date: order.completed_date.unwrap_or_else(Utc::now),
                    description: format!("Penjualan Order #{}", order.order_number),
                    journal_type: JournalType::Sales,
                    lines,
                },
            )
            .await?;

        info!(
            order_number = %order.order_number,
            amount = %product_total,
            "sales journal posted"
        );
        Ok(posted)
    }

    /// Scans a posted journal for debited inventory lines carrying a product
    /// reference and adds `debit / cost_price` (truncated toward zero) units
    /// of stock for each. Lines without a product reference are left alone;
    /// not every inventory debit is a product purchase.
    #[instrument(skip(self, journal), fields(journal_id = %journal.entry.id))]
    pub async fn apply_stock_from_purchase_journal(
        &self,
        journal: &PostedJournal,
    ) -> Result<Vec<StockAdjustment>, ServiceError> {
        let txn = self.db.begin().await?;
        let mut adjustments = Vec::new();

        for detail in &journal.details {
            let Some(product_id) = detail.product_id else {
                continue;
            };
            if detail.debit <= Decimal::ZERO {
                continue;
            }

            let account = AccountEntity::find_by_id(detail.account_id)
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("account {} not found", detail.account_id))
                })?;
            if account.kind != kinds::PERSEDIAAN {
                continue;
            }

            let product = ProductEntity::find_by_id(product_id)
                .one(&txn)
                .await?
                .ok_or_else(|| {
                    ServiceError::NotFound(format!("product {} not found", product_id))
                })?;
            if product.cost_price <= Decimal::ZERO {
                return Err(ServiceError::InvalidOperation(format!(
                    "product '{}' has no cost price to derive a quantity from",
                    product.name
                )));
            }

            let quantity = (detail.debit / product.cost_price)
                .trunc()
                .to_i32()
                .unwrap_or(0);
            if quantity <= 0 {
                continue;
            }

            ProductEntity::update_many()
                .col_expr(
                    product::Column::Stock,
                    Expr::col(product::Column::Stock).add(quantity),
                )
                .filter(product::Column::Id.eq(product.id))
                .exec(&txn)
                .await?;

            info!(
                product = %product.name,
                quantity,
                "stock increased from purchase journal"
            );
            adjustments.push(StockAdjustment {
                product_id: product.id,
                product_name: product.name,
                quantity_added: quantity,
            });
        }

        txn.commit().await?;
        Ok(adjustments)
    }

    async fn account_by_kind<C: ConnectionTrait>(
        &self,
        conn: &C,
        kind: &str,
    ) -> Result<account::Model, ServiceError> {
        AccountEntity::find()
            .filter(account::Column::Kind.eq(kind))
            .order_by_asc(account::Column::Code)
            .one(conn)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("no account mapped for kind '{}'", kind)))
    }
}
