mod common;

use assert_matches::assert_matches;
use chrono::Utc;
use common::TestApp;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use kangmas_shop::{
    entities::{account::AccountCategory, journal_entry::JournalType},
    errors::ServiceError,
    services::journal::{JournalLine, NewJournal},
};

fn debit(account_id: Uuid, amount: Decimal) -> JournalLine {
    JournalLine {
        account_id,
        debit: amount,
        credit: Decimal::ZERO,
        description: None,
        product_id: None,
    }
}

fn credit(account_id: Uuid, amount: Decimal) -> JournalLine {
    JournalLine {
        account_id,
        debit: Decimal::ZERO,
        credit: amount,
        description: None,
        product_id: None,
    }
}

fn journal(transaction_number: &str, lines: Vec<JournalLine>) -> NewJournal {
    NewJournal {
        transaction_number: transaction_number.to_string(),
        date: Utc::now(),
        description: "test journal".to_string(),
        journal_type: JournalType::General,
        lines,
    }
}

#[tokio::test]
async fn posting_applies_sign_convention_per_category() {
    let app = TestApp::new().await;
    let kas = app
        .create_account("101", "Kas", "kas", AccountCategory::Asset)
        .await;
    let pendapatan = app
        .create_account("401", "Pendapatan Penjualan", "pendapatan", AccountCategory::Revenue)
        .await;

    let posted = app
        .services()
        .journal
        .post_journal(journal(
            "TRX0001",
            vec![debit(kas.id, dec!(50_000)), credit(pendapatan.id, dec!(50_000))],
        ))
        .await
        .expect("posting failed");

    assert_eq!(posted.details.len(), 2);
    assert_eq!(app.balance_of("kas").await, dec!(50_000));
    assert_eq!(app.balance_of("pendapatan").await, dec!(50_000));

    // Both balances land in their natural trial-balance columns.
    let trial = app.services().reports.trial_balance().await.unwrap();
    let kas_row = trial.rows.iter().find(|r| r.code == "101").unwrap();
    let pendapatan_row = trial.rows.iter().find(|r| r.code == "401").unwrap();
    assert_eq!(kas_row.debit, dec!(50_000));
    assert_eq!(kas_row.credit, Decimal::ZERO);
    assert_eq!(pendapatan_row.credit, dec!(50_000));
    assert_eq!(pendapatan_row.debit, Decimal::ZERO);
    assert_eq!(trial.total_debit, trial.total_credit);
}

#[tokio::test]
async fn unbalanced_journal_is_rejected_without_side_effects() {
    let app = TestApp::new().await;
    let kas = app
        .create_account("101", "Kas", "kas", AccountCategory::Asset)
        .await;
    let pendapatan = app
        .create_account("401", "Pendapatan", "pendapatan", AccountCategory::Revenue)
        .await;

    let result = app
        .services()
        .journal
        .post_journal(journal(
            "TRX0002",
            vec![debit(kas.id, dec!(50_000)), credit(pendapatan.id, dec!(40_000))],
        ))
        .await;

    assert_matches!(result, Err(ServiceError::ValidationError(_)));
    assert_eq!(app.balance_of("kas").await, Decimal::ZERO);
    assert_eq!(app.balance_of("pendapatan").await, Decimal::ZERO);
    assert!(app.services().journal.list_journals().await.unwrap().is_empty());
}

#[tokio::test]
async fn unknown_account_rolls_back_whole_posting() {
    let app = TestApp::new().await;
    let kas = app
        .create_account("101", "Kas", "kas", AccountCategory::Asset)
        .await;

    let result = app
        .services()
        .journal
        .post_journal(journal(
            "TRX0003",
            vec![debit(kas.id, dec!(10_000)), credit(Uuid::new_v4(), dec!(10_000))],
        ))
        .await;

    assert_matches!(result, Err(ServiceError::NotFound(_)));
    // The debit against kas must not survive the failed credit line.
    assert_eq!(app.balance_of("kas").await, Decimal::ZERO);
    assert!(app.services().journal.list_journals().await.unwrap().is_empty());
}

#[tokio::test]
async fn colliding_transaction_number_gets_regenerated() {
    let app = TestApp::new().await;
    let kas = app
        .create_account("101", "Kas", "kas", AccountCategory::Asset)
        .await;
    let modal = app
        .create_account("301", "Modal", "modal", AccountCategory::Equity)
        .await;

    let first = app
        .services()
        .journal
        .post_journal(journal(
            "TRX0004",
            vec![debit(kas.id, dec!(1_000)), credit(modal.id, dec!(1_000))],
        ))
        .await
        .unwrap();
    let second = app
        .services()
        .journal
        .post_journal(journal(
            "TRX0004",
            vec![debit(kas.id, dec!(2_000)), credit(modal.id, dec!(2_000))],
        ))
        .await
        .unwrap();

    assert_eq!(first.entry.transaction_number, "TRX0004");
    assert_ne!(second.entry.transaction_number, "TRX0004");
    assert_eq!(app.balance_of("kas").await, dec!(3_000));
}

#[tokio::test]
async fn balances_replay_deterministically() {
    let app = TestApp::new().await;
    let kas = app
        .create_account("101", "Kas", "kas", AccountCategory::Asset)
        .await;
    let hutang = app
        .create_account("201", "Utang Dagang", "hutang", AccountCategory::Liability)
        .await;
    let pendapatan = app
        .create_account("401", "Pendapatan", "pendapatan", AccountCategory::Revenue)
        .await;

    let postings = [
        (dec!(500_000), &pendapatan),
        (dec!(250_000), &pendapatan),
        (dec!(125_000), &hutang),
    ];
    for (i, (amount, credit_account)) in postings.iter().enumerate() {
        app.services()
            .journal
            .post_journal(journal(
                &format!("TRX100{}", i),
                vec![debit(kas.id, *amount), credit(credit_account.id, *amount)],
            ))
            .await
            .unwrap();
    }

    // Stored balance equals the ledger's replayed running balance.
    assert_eq!(app.balance_of("kas").await, dec!(875_000));
    let ledgers = app.services().reports.ledger().await.unwrap();
    let kas_ledger = ledgers.iter().find(|l| l.code == "101").unwrap();
    assert_eq!(kas_ledger.ending_balance, dec!(875_000));
    assert_eq!(kas_ledger.lines.len(), 3);
    assert_eq!(
        kas_ledger.lines.last().unwrap().running_balance,
        dec!(875_000)
    );
}

#[tokio::test]
async fn sequential_postings_accumulate_on_the_same_account() {
    let app = TestApp::new().await;
    let kas = app
        .create_account("101", "Kas", "kas", AccountCategory::Asset)
        .await;
    let pendapatan = app
        .create_account("401", "Pendapatan", "pendapatan", AccountCategory::Revenue)
        .await;

    for (number, amount) in [("TRX2001", dec!(10_000)), ("TRX2002", dec!(20_000))] {
        app.services()
            .journal
            .post_journal(journal(
                number,
                vec![debit(kas.id, amount), credit(pendapatan.id, amount)],
            ))
            .await
            .unwrap();
    }

    assert_eq!(app.balance_of("kas").await, dec!(30_000));
}

#[tokio::test]
async fn journal_details_keep_line_order() {
    let app = TestApp::new().await;
    let kas = app
        .create_account("101", "Kas", "kas", AccountCategory::Asset)
        .await;
    let pendapatan = app
        .create_account("401", "Pendapatan", "pendapatan", AccountCategory::Revenue)
        .await;
    let transport = app
        .create_account("506", "Beban Transportasi", "beban_transport", AccountCategory::Expense)
        .await;

    // Sale with a shipping deduction: two kas lines in one entry.
    let posted = app
        .services()
        .journal
        .post_journal(journal(
            "TRX3001",
            vec![
                debit(kas.id, dec!(100_000)),
                credit(pendapatan.id, dec!(100_000)),
                debit(transport.id, dec!(15_000)),
                credit(kas.id, dec!(15_000)),
            ],
        ))
        .await
        .unwrap();

    let fetched = app
        .services()
        .journal
        .get_journal(posted.entry.id)
        .await
        .unwrap();
    let line_numbers: Vec<i32> = fetched.details.iter().map(|d| d.line_number).collect();
    assert_eq!(line_numbers, vec![1, 2, 3, 4]);
    assert_eq!(app.balance_of("kas").await, dec!(85_000));
}
