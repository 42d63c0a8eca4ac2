use std::sync::Arc;

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::account::{self, AccountCategory, Entity as AccountEntity},
    errors::ServiceError,
};

/// Well-known fine-grained account kinds referenced by the posting hooks and
/// the cash-flow report.
pub mod kinds {
    pub const KAS: &str = "kas";
    pub const PERSEDIAAN: &str = "persediaan";
    pub const PENDAPATAN: &str = "pendapatan";
}

/// Read access to the chart of accounts.
///
/// Balances are only ever written by the journal engine; this service is the
/// lookup surface everyone else goes through.
#[derive(Clone)]
pub struct AccountService {
    db: Arc<DbPool>,
}

impl AccountService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// All accounts ordered by code.
    pub async fn list(&self) -> Result<Vec<account::Model>, ServiceError> {
        let accounts = AccountEntity::find()
            .order_by_asc(account::Column::Code)
            .all(&*self.db)
            .await?;
        Ok(accounts)
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: Uuid) -> Result<account::Model, ServiceError> {
        AccountEntity::find_by_id(id)
            .one(&*self.db)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("account {} not found", id)))
    }

    /// First account of the given fine-grained kind, if any.
    pub async fn find_by_kind(&self, kind: &str) -> Result<Option<account::Model>, ServiceError> {
        let account = AccountEntity::find()
            .filter(account::Column::Kind.eq(kind))
            .order_by_asc(account::Column::Code)
            .one(&*self.db)
            .await?;
        Ok(account)
    }

    pub async fn find_by_category(
        &self,
        category: AccountCategory,
    ) -> Result<Vec<account::Model>, ServiceError> {
        let accounts = AccountEntity::find()
            .filter(account::Column::Category.eq(category))
            .order_by_asc(account::Column::Code)
            .all(&*self.db)
            .await?;
        Ok(accounts)
    }
}
