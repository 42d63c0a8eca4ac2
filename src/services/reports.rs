use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::{EntityTrait, QueryOrder};
use serde::Serialize;
use tracing::instrument;
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::{
        account::{self, AccountCategory, Entity as AccountEntity},
        journal_detail::Entity as JournalDetailEntity,
        journal_entry::Entity as JournalEntryEntity,
    },
    errors::ServiceError,
    services::accounts::kinds,
};

#[derive(Debug, Clone, Serialize)]
pub struct TrialBalanceRow {
    pub code: String,
    pub name: String,
    pub debit: Decimal,
    pub credit: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct TrialBalance {
    pub rows: Vec<TrialBalanceRow>,
    pub total_debit: Decimal,
    pub total_credit: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct LedgerLine {
    pub date: DateTime<Utc>,
    pub description: String,
    pub debit: Decimal,
    pub credit: Decimal,
    pub running_balance: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct AccountLedger {
    pub code: String,
    pub name: String,
    pub category: AccountCategory,
    pub ending_balance: Decimal,
    pub lines: Vec<LedgerLine>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportRow {
    pub name: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct IncomeStatement {
    pub revenue: Vec<ReportRow>,
    pub total_revenue: Decimal,
    pub expenses: Vec<ReportRow>,
    pub total_expenses: Decimal,
    pub net_income: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct BalanceSheet {
    pub assets: Vec<ReportRow>,
    pub total_assets: Decimal,
    pub liabilities: Vec<ReportRow>,
    pub total_liabilities: Decimal,
    pub equity: Vec<ReportRow>,
    pub total_equity: Decimal,
    pub net_income: Decimal,
    pub total_liabilities_and_equity: Decimal,
    pub balanced: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct CashFlowStatement {
    pub operating_inflows: Decimal,
    pub operating_outflows: Decimal,
    pub net_operating: Decimal,
    pub ending_cash_balance: Decimal,
}

/// Read-only report generators over account balances and journal history.
#[derive(Clone)]
pub struct ReportService {
    db: Arc<DbPool>,
}

impl ReportService {
    pub fn new(db: Arc<DbPool>) -> Self {
        Self { db }
    }

    /// Every account's balance split into debit/credit columns.
    ///
    /// A positive balance lands in the account's natural column, a negative
    /// one flips to the opposite column; the totals match whenever all
    /// posted journals were balanced.
    #[instrument(skip(self))]
    pub async fn trial_balance(&self) -> Result<TrialBalance, ServiceError> {
        let accounts = AccountEntity::find()
            .order_by_asc(account::Column::Code)
            .all(&*self.db)
            .await?;

        let mut rows = Vec::with_capacity(accounts.len());
        let mut total_debit = Decimal::ZERO;
        let mut total_credit = Decimal::ZERO;

        for acc in accounts {
            let natural_debit = acc.category.is_debit_natural();
            let (debit, credit) = if acc.balance >= Decimal::ZERO {
                if natural_debit {
                    (acc.balance, Decimal::ZERO)
                } else {
                    (Decimal::ZERO, acc.balance)
                }
            } else if natural_debit {
                (Decimal::ZERO, acc.balance.abs())
            } else {
                (acc.balance.abs(), Decimal::ZERO)
            };

            total_debit += debit;
            total_credit += credit;
            rows.push(TrialBalanceRow {
                code: acc.code,
                name: acc.name,
                debit,
                credit,
            });
        }

        Ok(TrialBalance {
            rows,
            total_debit,
            total_credit,
        })
    }

    /// Per-account chronological detail with a running balance, replayed via
    /// the category sign convention. Accounts without postings are omitted.
    #[instrument(skip(self))]
    pub async fn ledger(&self) -> Result<Vec<AccountLedger>, ServiceError> {
        let accounts = AccountEntity::find()
            .order_by_asc(account::Column::Code)
            .all(&*self.db)
            .await?;
        let details = JournalDetailEntity::find()
            .find_also_related(JournalEntryEntity)
            .all(&*self.db)
            .await?;

        let mut per_account: HashMap<Uuid, Vec<_>> = HashMap::new();
        for (detail, entry) in details {
            let entry = entry.ok_or_else(|| {
                ServiceError::InternalError(format!(
                    "journal detail {} has no parent entry",
                    detail.id
                ))
            })?;
            per_account
                .entry(detail.account_id)
                .or_default()
                .push((detail, entry));
        }

        let mut ledgers = Vec::new();
        for acc in &accounts {
            let Some(mut postings) = per_account.remove(&acc.id) else {
                continue;
            };
            postings.sort_by(|(da, ea), (db_, eb)| {
                (ea.date, ea.created_at, da.line_number).cmp(&(eb.date, eb.created_at, db_.line_number))
            });

            let mut running_balance = Decimal::ZERO;
            let mut lines = Vec::with_capacity(postings.len());
            for (detail, entry) in postings {
                running_balance += acc.category.signed_delta(detail.debit, detail.credit);
                lines.push(LedgerLine {
                    date: entry.date,
                    description: entry.description,
                    debit: detail.debit,
                    credit: detail.credit,
                    running_balance,
                });
            }

            ledgers.push(AccountLedger {
                code: acc.code.clone(),
                name: acc.name.clone(),
                category: acc.category,
                ending_balance: running_balance,
                lines,
            });
        }

        Ok(ledgers)
    }

    #[instrument(skip(self))]
    pub async fn income_statement(&self) -> Result<IncomeStatement, ServiceError> {
        let accounts = AccountEntity::find()
            .order_by_asc(account::Column::Code)
            .all(&*self.db)
            .await?;

        let (revenue, _) = section(&accounts, AccountCategory::Revenue);
        let (expenses, _) = section(&accounts, AccountCategory::Expense);
        // Totals take every account of the category, listed rows only the
        // positive ones.
        let total_revenue = sum_category(&accounts, AccountCategory::Revenue);
        let total_expenses = sum_category(&accounts, AccountCategory::Expense);

        Ok(IncomeStatement {
            revenue,
            total_revenue,
            expenses,
            total_expenses,
            net_income: total_revenue - total_expenses,
        })
    }

    /// Assets against liabilities + equity + net income. Listed rows carry
    /// positive balances only, matching the statement layout.
    #[instrument(skip(self))]
    pub async fn balance_sheet(&self) -> Result<BalanceSheet, ServiceError> {
        let accounts = AccountEntity::find()
            .order_by_asc(account::Column::Code)
            .all(&*self.db)
            .await?;

        let (assets, total_assets) = section(&accounts, AccountCategory::Asset);
        let (liabilities, total_liabilities) = section(&accounts, AccountCategory::Liability);
        let (equity, total_equity) = section(&accounts, AccountCategory::Equity);

        let total_revenue: Decimal = sum_category(&accounts, AccountCategory::Revenue);
        let total_expenses: Decimal = sum_category(&accounts, AccountCategory::Expense);
        let net_income = total_revenue - total_expenses;

        let total_liabilities_and_equity = total_liabilities + total_equity + net_income;

        Ok(BalanceSheet {
            assets,
            total_assets,
            liabilities,
            total_liabilities,
            equity,
            total_equity,
            net_income,
            balanced: total_assets == total_liabilities_and_equity,
            total_liabilities_and_equity,
        })
    }

    /// Simplified single-section operating cash flow plus the ending balance
    /// of the designated cash account.
    #[instrument(skip(self))]
    pub async fn cash_flow_statement(&self) -> Result<CashFlowStatement, ServiceError> {
        let accounts = AccountEntity::find().all(&*self.db).await?;

        let operating_inflows = sum_category(&accounts, AccountCategory::Revenue);
        let operating_outflows = sum_category(&accounts, AccountCategory::Expense);
        let ending_cash_balance = accounts
            .iter()
            .find(|a| a.kind == kinds::KAS)
            .map(|a| a.balance)
            .unwrap_or(Decimal::ZERO);

        Ok(CashFlowStatement {
            operating_inflows,
            operating_outflows,
            net_operating: operating_inflows - operating_outflows,
            ending_cash_balance,
        })
    }
}

/// Positive balances of a category as listed rows, plus the positive-only
/// total used by the statement layouts.
fn section(accounts: &[account::Model], category: AccountCategory) -> (Vec<ReportRow>, Decimal) {
    let rows: Vec<ReportRow> = accounts
        .iter()
        .filter(|a| a.category == category && a.balance > Decimal::ZERO)
        .map(|a| ReportRow {
            name: a.name.clone(),
            amount: a.balance,
        })
        .collect();
    let total = rows.iter().map(|r| r.amount).sum();
    (rows, total)
}

fn sum_category(accounts: &[account::Model], category: AccountCategory) -> Decimal {
    accounts
        .iter()
        .filter(|a| a.category == category)
        .map(|a| a.balance)
        .sum()
}
