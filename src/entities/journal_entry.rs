use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Origin of a journal entry.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum JournalType {
    #[sea_orm(string_value = "general")]
    General,
    #[sea_orm(string_value = "sales")]
    Sales,
    #[sea_orm(string_value = "opening_balance")]
    OpeningBalance,
}

/// A dated, balanced set of debit/credit postings.
///
/// Created atomically with its details and immutable thereafter; the details
/// are the audit trail explaining every account balance.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "journal_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    #[sea_orm(unique)]
    pub transaction_number: String,

    pub date: DateTime<Utc>,

    pub description: String,

    pub journal_type: JournalType,

    pub created_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::journal_detail::Entity")]
    JournalDetail,
}

impl Related<super::journal_detail::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::JournalDetail.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
