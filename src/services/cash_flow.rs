use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ConnectionTrait, Set};
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::cash_flow_entry::{self, FlowDirection},
    errors::ServiceError,
};

/// Write-only store of auxiliary cash movements recorded by the payment
/// flow. Reports derive from account balances, not from these rows.
#[derive(Clone)]
pub struct CashFlowService {
    db: Arc<DbPool>,
}

impl CashFlowService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    pub async fn record(
        &self,
        date: DateTime<Utc>,
        description: String,
        category: String,
        amount: Decimal,
        direction: FlowDirection,
    ) -> Result<cash_flow_entry::Model, ServiceError> {
        self.record_in(&*self.db, date, description, category, amount, direction)
            .await
    }

    /// Records a cash movement on an existing connection or transaction.
    pub async fn record_in<C: ConnectionTrait>(
        &self,
        conn: &C,
        date: DateTime<Utc>,
        description: String,
        category: String,
        amount: Decimal,
        direction: FlowDirection,
    ) -> Result<cash_flow_entry::Model, ServiceError> {
        let entry = cash_flow_entry::ActiveModel {
            id: Set(Uuid::new_v4()),
            date: Set(date),
            description: Set(description),
            category: Set(category),
            amount: Set(amount),
            direction: Set(direction),
            created_at: Set(Utc::now()),
        }
        .insert(conn)
        .await?;
        Ok(entry)
    }
}
