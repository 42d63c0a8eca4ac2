mod common;

use chrono::Utc;
use common::TestApp;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use kangmas_shop::services::templates::TemplateAmount;

#[tokio::test]
async fn trial_balance_totals_match_after_seeding() {
    let app = TestApp::with_seed().await;

    let trial = app.services().reports.trial_balance().await.unwrap();

    // Opening journal: 26.5M debits against 26.5M credits.
    assert_eq!(trial.total_debit, dec!(26_500_000));
    assert_eq!(trial.total_credit, dec!(26_500_000));
    assert_eq!(trial.rows.len(), 19);

    let hutang = trial.rows.iter().find(|r| r.code == "201").unwrap();
    assert_eq!(hutang.credit, dec!(20_000_000));
    assert_eq!(hutang.debit, Decimal::ZERO);
}

#[tokio::test]
async fn ledger_covers_only_accounts_with_postings() {
    let app = TestApp::with_seed().await;

    let ledgers = app.services().reports.ledger().await.unwrap();

    // Six accounts appear in the opening journal.
    assert_eq!(ledgers.len(), 6);
    let kas = ledgers.iter().find(|l| l.code == "101").unwrap();
    assert_eq!(kas.ending_balance, dec!(10_000_000));
    assert_eq!(kas.lines.len(), 1);
    assert_eq!(kas.lines[0].running_balance, dec!(10_000_000));

    // Replayed running balance always matches the stored balance.
    for ledger in &ledgers {
        assert_eq!(
            ledger.ending_balance,
            app.balance_of_code(&ledger.code).await,
            "ledger replay diverged for account {}",
            ledger.code
        );
    }
}

#[tokio::test]
async fn income_statement_subtracts_expenses_from_revenue() {
    let app = TestApp::with_seed().await;

    // Book a 200k electricity bill on top of the seeded 6.5M revenue.
    app.services()
        .templates
        .instantiate(
            "biaya_listrik",
            Utc::now(),
            vec![
                TemplateAmount {
                    amount: dec!(200_000),
                    product_id: None,
                },
                TemplateAmount {
                    amount: dec!(200_000),
                    product_id: None,
                },
            ],
        )
        .await
        .unwrap();

    let statement = app.services().reports.income_statement().await.unwrap();
    assert_eq!(statement.total_revenue, dec!(6_500_000));
    assert_eq!(statement.total_expenses, dec!(200_000));
    assert_eq!(statement.net_income, dec!(6_300_000));
    assert_eq!(statement.revenue.len(), 1);
    assert_eq!(statement.expenses.len(), 1);
}

#[tokio::test]
async fn balance_sheet_balances_after_balanced_postings() {
    let app = TestApp::with_seed().await;

    let sheet = app.services().reports.balance_sheet().await.unwrap();

    assert_eq!(sheet.total_assets, dec!(26_500_000));
    assert_eq!(sheet.total_liabilities, dec!(20_000_000));
    assert_eq!(sheet.net_income, dec!(6_500_000));
    assert_eq!(sheet.total_liabilities_and_equity, dec!(26_500_000));
    assert!(sheet.balanced);
}

#[tokio::test]
async fn cash_flow_statement_reports_operating_net_and_cash_balance() {
    let app = TestApp::with_seed().await;

    let statement = app.services().reports.cash_flow_statement().await.unwrap();

    assert_eq!(statement.operating_inflows, dec!(6_500_000));
    assert_eq!(statement.operating_outflows, Decimal::ZERO);
    assert_eq!(statement.net_operating, dec!(6_500_000));
    assert_eq!(statement.ending_cash_balance, dec!(10_000_000));
}
