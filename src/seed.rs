//! Idempotent startup seed: chart of accounts, demo catalog and the
//! opening-balance journal.
//!
//! Accounts start at zero; the opening journal posted through the engine is
//! what establishes the balances, so every balance stays explained by the
//! journal history.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};
use tracing::info;
use uuid::Uuid;

use crate::{
    db::DbPool,
    entities::{
        account::{self, AccountCategory, Entity as AccountEntity},
        journal_entry::{Entity as JournalEntryEntity, JournalType},
        product::{self, Entity as ProductEntity},
    },
    errors::ServiceError,
    services::journal::{unique_transaction_number, JournalLine, JournalService, NewJournal},
};

struct SeedAccount {
    code: &'static str,
    name: &'static str,
    kind: &'static str,
    category: AccountCategory,
}

const CHART_OF_ACCOUNTS: &[SeedAccount] = &[
    // Assets
    SeedAccount { code: "101", name: "Kas", kind: "kas", category: AccountCategory::Asset },
    SeedAccount { code: "102", name: "Piutang Usaha", kind: "piutang", category: AccountCategory::Asset },
    SeedAccount { code: "103", name: "Persediaan Barang Dagang", kind: "persediaan", category: AccountCategory::Asset },
    SeedAccount { code: "104", name: "Perlengkapan Toko", kind: "perlengkapan", category: AccountCategory::Asset },
    SeedAccount { code: "105", name: "Peralatan Toko", kind: "peralatan", category: AccountCategory::Asset },
    SeedAccount { code: "106", name: "Akumulasi Penyusutan", kind: "akumulasi_penyusutan", category: AccountCategory::Asset },
    // Liabilities
    SeedAccount { code: "201", name: "Utang Dagang", kind: "hutang", category: AccountCategory::Liability },
    // Equity
    SeedAccount { code: "301", name: "Modal", kind: "modal", category: AccountCategory::Equity },
    SeedAccount { code: "302", name: "Prive", kind: "prive", category: AccountCategory::Equity },
    // Revenue
    SeedAccount { code: "401", name: "Pendapatan Penjualan", kind: "pendapatan", category: AccountCategory::Revenue },
    // Expenses
    SeedAccount { code: "501", name: "Harga Pokok Penjualan", kind: "hpp", category: AccountCategory::Expense },
    SeedAccount { code: "502", name: "Beban Gaji", kind: "beban_gaji", category: AccountCategory::Expense },
    SeedAccount { code: "503", name: "Beban Listrik dan Air", kind: "beban_listrik", category: AccountCategory::Expense },
    SeedAccount { code: "504", name: "Beban Perlengkapan", kind: "beban_perlengkapan", category: AccountCategory::Expense },
    SeedAccount { code: "505", name: "Beban Penyusutan", kind: "beban_penyusutan", category: AccountCategory::Expense },
    SeedAccount { code: "506", name: "Beban Transportasi", kind: "beban_transport", category: AccountCategory::Expense },
    SeedAccount { code: "507", name: "Beban Operasional", kind: "beban_operasional", category: AccountCategory::Expense },
    SeedAccount { code: "520", name: "Beban Kerugian", kind: "beban_kerugian", category: AccountCategory::Expense },
    SeedAccount { code: "529", name: "Beban Lain-lain", kind: "beban_lain", category: AccountCategory::Expense },
];

/// Opening balances posted as one journal: debits and credits both sum to
/// 26,500,000 so the entry balances.
const OPENING_LINES: &[(&str, &str, bool)] = &[
    ("kas", "Saldo awal kas", true),
    ("persediaan", "Saldo awal persediaan barang dagang", true),
    ("peralatan", "Saldo awal peralatan toko", true),
    ("perlengkapan", "Saldo awal perlengkapan toko", true),
    ("pendapatan", "Saldo awal penjualan", false),
    ("hutang", "Saldo awal utang dagang", false),
];

fn opening_amount(kind: &str) -> Decimal {
    match kind {
        "kas" => dec!(10_000_000),
        "persediaan" => dec!(5_000_000),
        "peralatan" => dec!(5_000_000),
        "perlengkapan" => dec!(6_500_000),
        "pendapatan" => dec!(6_500_000),
        "hutang" => dec!(20_000_000),
        _ => Decimal::ZERO,
    }
}

/// Seeds accounts, products and the opening journal, skipping whatever
/// already exists.
pub async fn run(db: Arc<DbPool>) -> Result<(), ServiceError> {
    seed_accounts(&db).await?;
    seed_products(&db).await?;
    seed_opening_journal(db).await?;
    Ok(())
}

async fn seed_accounts(db: &DbPool) -> Result<(), ServiceError> {
    if AccountEntity::find().count(db).await? > 0 {
        return Ok(());
    }

    for seed in CHART_OF_ACCOUNTS {
        account::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(seed.code.to_string()),
            name: Set(seed.name.to_string()),
            kind: Set(seed.kind.to_string()),
            category: Set(seed.category),
            balance: Set(Decimal::ZERO),
            created_at: Set(Utc::now()),
        }
        .insert(db)
        .await?;
    }
    info!(accounts = CHART_OF_ACCOUNTS.len(), "chart of accounts seeded");
    Ok(())
}

async fn seed_products(db: &DbPool) -> Result<(), ServiceError> {
    if ProductEntity::find().count(db).await? > 0 {
        return Ok(());
    }

    product::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set("Bibit Ikan Mas".to_string()),
        description: Set(Some(
            "Bibit ikan mas segar ukuran 8cm, kualitas terbaik untuk pembesaran".to_string(),
        )),
        price: Set(dec!(2_000)),
        cost_price: Set(dec!(1_000)),
        stock: Set(1000),
        category: Set("bibit".to_string()),
        size_cm: Set(Some(8.0)),
        weight_kg: Set(None),
        is_featured: Set(false),
        is_active: Set(true),
        image_url: Set(Some("/static/uploads/products/bibit_ikan_mas.jpg".to_string())),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await?;

    product::ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set("Ikan Mas Konsumsi".to_string()),
        description: Set(Some("Ikan mas segar siap konsumsi, berat 1kg".to_string())),
        price: Set(dec!(30_000)),
        cost_price: Set(dec!(20_000)),
        stock: Set(50),
        category: Set("konsumsi".to_string()),
        size_cm: Set(None),
        weight_kg: Set(Some(1.0)),
        is_featured: Set(true),
        is_active: Set(true),
        image_url: Set(Some(
            "/static/uploads/products/ikan_mas_konsumsi.jpg".to_string(),
        )),
        created_at: Set(Utc::now()),
    }
    .insert(db)
    .await?;

    info!("demo products seeded");
    Ok(())
}

async fn seed_opening_journal(db: Arc<DbPool>) -> Result<(), ServiceError> {
    if JournalEntryEntity::find().count(&*db).await? > 0 {
        return Ok(());
    }

    let accounts = AccountEntity::find().all(&*db).await?;
    let account_id = |kind: &str| {
        accounts
            .iter()
            .find(|a| a.kind == kind)
            .map(|a| a.id)
            .ok_or_else(|| ServiceError::NotFound(format!("no account mapped for kind '{}'", kind)))
    };

    let mut lines = Vec::with_capacity(OPENING_LINES.len());
    for (kind, description, is_debit) in OPENING_LINES {
        let amount = opening_amount(kind);
        lines.push(JournalLine {
            account_id: account_id(kind)?,
            debit: if *is_debit { amount } else { Decimal::ZERO },
            credit: if *is_debit { Decimal::ZERO } else { amount },
            description: Some(description.to_string()),
            product_id: None,
        });
    }

    let journal = JournalService::new(db);
    let posted = journal
        .post_journal(NewJournal {
            transaction_number: unique_transaction_number("SALDO"),
            date: Utc
                .with_ymd_and_hms(2025, 1, 1, 0, 0, 0)
                .single()
                .unwrap_or_else(Utc::now),
            description: "Pencatatan saldo awal usaha Kang-Mas Shop".to_string(),
            journal_type: JournalType::OpeningBalance,
            lines,
        })
        .await?;

    info!(
        transaction_number = %posted.entry.transaction_number,
        "opening-balance journal posted"
    );
    Ok(())
}
