use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Coarse account classification driving the debit/credit sign convention.
#[derive(Debug, Copy, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
pub enum AccountCategory {
    #[sea_orm(string_value = "asset")]
    Asset,
    #[sea_orm(string_value = "liability")]
    Liability,
    #[sea_orm(string_value = "equity")]
    Equity,
    #[sea_orm(string_value = "revenue")]
    Revenue,
    #[sea_orm(string_value = "expense")]
    Expense,
}

impl AccountCategory {
    /// Whether this category's balance grows on the debit side.
    pub fn is_debit_natural(self) -> bool {
        matches!(self, AccountCategory::Asset | AccountCategory::Expense)
    }

    /// Signed balance delta of a single posting line against an account of
    /// this category: asset/expense grow with debit, the rest with credit.
    pub fn signed_delta(self, debit: Decimal, credit: Decimal) -> Decimal {
        if self.is_debit_natural() {
            debit - credit
        } else {
            credit - debit
        }
    }
}

/// Chart-of-accounts record with a running balance.
///
/// Balances are mutated only by the journal engine inside a posting
/// transaction; everything else reads them.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Account code, e.g. "101" for Kas
    #[sea_orm(unique)]
    pub code: String,

    pub name: String,

    /// Fine-grained account type ("kas", "persediaan", "hutang", ...)
    pub kind: String,

    pub category: AccountCategory,

    /// Running balance, positive on the account's natural side
    pub balance: Decimal,

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

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use test_case::test_case;

    #[test_case(AccountCategory::Asset, dec!(500), dec!(200), dec!(300); "asset grows with debit")]
    #[test_case(AccountCategory::Expense, dec!(100), dec!(0), dec!(100); "expense grows with debit")]
    #[test_case(AccountCategory::Liability, dec!(100), dec!(400), dec!(300); "liability grows with credit")]
    #[test_case(AccountCategory::Equity, dec!(0), dec!(250), dec!(250); "equity grows with credit")]
    #[test_case(AccountCategory::Revenue, dec!(50), dec!(0), dec!(-50); "debiting revenue shrinks it")]
    fn signed_delta_follows_category(
        category: AccountCategory,
        debit: Decimal,
        credit: Decimal,
        expected: Decimal,
    ) {
        assert_eq!(category.signed_delta(debit, credit), expected);
    }
}
