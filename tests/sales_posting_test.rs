mod common;

use assert_matches::assert_matches;
use chrono::Utc;
use common::TestApp;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use kangmas_shop::{
    entities::{journal_entry::JournalType, order::OrderStatus},
    errors::ServiceError,
    services::{
        cart::AddToCartInput,
        checkout::CheckoutInput,
        journal::{JournalLine, NewJournal},
    },
};
use uuid::Uuid;

async fn checked_out_order(app: &TestApp) -> (Uuid, Decimal) {
    let products = app.services().products.list_active().await.unwrap();
    let bibit = products.iter().find(|p| p.name == "Bibit Ikan Mas").unwrap();
    let customer_id = Uuid::new_v4();

    app.services()
        .cart
        .add_item(AddToCartInput {
            customer_id,
            product_id: bibit.id,
            quantity: 3,
        })
        .await
        .unwrap();

    let order = app
        .services()
        .checkout
        .checkout(CheckoutInput {
            customer_id,
            shipping_address: "Jl. Contoh No. 123, Jakarta".to_string(),
            shipping_method: "kurir".to_string(),
            payment_method: "transfer".to_string(),
        })
        .await
        .unwrap();

    // 3 x 2000, shipping excluded from the journalled amount
    (order.order.id, dec!(6_000))
}

#[tokio::test]
async fn completing_a_paid_order_posts_the_sales_journal() {
    let app = TestApp::with_seed().await;
    let (order_id, product_total) = checked_out_order(&app).await;
    let kas_before = app.balance_of("kas").await;
    let pendapatan_before = app.balance_of("pendapatan").await;

    app.services().checkout.confirm_payment(order_id).await.unwrap();
    let update = app
        .services()
        .orders
        .update_status(order_id, OrderStatus::Completed)
        .await
        .unwrap();

    assert_eq!(update.order.status, OrderStatus::Completed);
    assert!(update.order.completed_date.is_some());

    let journal = update.sales_journal.expect("no sales journal posted");
    assert_eq!(journal.entry.journal_type, JournalType::Sales);
    assert!(journal.entry.transaction_number.starts_with("SALES"));
    assert_eq!(journal.details.len(), 2);

    // Shipping stays out of the books: only the product total moves.
    assert_eq!(app.balance_of("kas").await, kas_before + product_total);
    assert_eq!(
        app.balance_of("pendapatan").await,
        pendapatan_before + product_total
    );
}

#[tokio::test]
async fn unpaid_orders_cannot_change_status() {
    let app = TestApp::with_seed().await;
    let (order_id, _) = checked_out_order(&app).await;

    let result = app
        .services()
        .orders
        .update_status(order_id, OrderStatus::Completed)
        .await;

    assert_matches!(result, Err(ServiceError::InvalidOperation(_)));
    let order = app.services().orders.get_order(order_id).await.unwrap();
    assert_eq!(order.order.status, OrderStatus::Pending);
}

#[tokio::test]
async fn completing_twice_does_not_double_post() {
    let app = TestApp::with_seed().await;
    let (order_id, product_total) = checked_out_order(&app).await;
    let kas_before = app.balance_of("kas").await;

    app.services().checkout.confirm_payment(order_id).await.unwrap();
    app.services()
        .orders
        .update_status(order_id, OrderStatus::Completed)
        .await
        .unwrap();
    let second = app
        .services()
        .orders
        .update_status(order_id, OrderStatus::Completed)
        .await;

    assert_matches!(second, Err(ServiceError::InvalidOperation(_)));
    assert_eq!(app.balance_of("kas").await, kas_before + product_total);
}

#[tokio::test]
async fn purchase_journal_with_product_reference_increases_stock() {
    let app = TestApp::with_seed().await;
    let products = app.services().products.list_active().await.unwrap();
    let bibit = products.iter().find(|p| p.name == "Bibit Ikan Mas").unwrap();
    let accounts = app.services().accounts.list().await.unwrap();
    let persediaan = accounts.iter().find(|a| a.kind == "persediaan").unwrap();
    let kas = accounts.iter().find(|a| a.kind == "kas").unwrap();

    let journal = app
        .services()
        .journal
        .post_journal(NewJournal {
            transaction_number: "TRX5001".to_string(),
            date: Utc::now(),
            description: "Pembelian bibit ikan mas tambahan".to_string(),
            journal_type: JournalType::General,
            lines: vec![
                JournalLine {
                    account_id: persediaan.id,
                    debit: dec!(50_000),
                    credit: Decimal::ZERO,
                    description: Some("Bibit ikan tambahan".to_string()),
                    product_id: Some(bibit.id),
                },
                JournalLine {
                    account_id: kas.id,
                    debit: Decimal::ZERO,
                    credit: dec!(50_000),
                    description: Some("Pembayaran tunai".to_string()),
                    product_id: None,
                },
            ],
        })
        .await
        .unwrap();

    let adjustments = app
        .services()
        .posting
        .apply_stock_from_purchase_journal(&journal)
        .await
        .unwrap();

    // 50_000 / 1_000 cost price = 50 units
    assert_eq!(adjustments.len(), 1);
    assert_eq!(adjustments[0].quantity_added, 50);
    let refreshed = app.services().products.get(bibit.id).await.unwrap();
    assert_eq!(refreshed.stock, bibit.stock + 50);
}

#[tokio::test]
async fn inventory_lines_without_product_reference_are_ignored() {
    let app = TestApp::with_seed().await;
    let accounts = app.services().accounts.list().await.unwrap();
    let persediaan = accounts.iter().find(|a| a.kind == "persediaan").unwrap();
    let kas = accounts.iter().find(|a| a.kind == "kas").unwrap();

    let journal = app
        .services()
        .journal
        .post_journal(NewJournal {
            transaction_number: "TRX5002".to_string(),
            date: Utc::now(),
            description: "Pembelian persediaan umum".to_string(),
            journal_type: JournalType::General,
            lines: vec![
                JournalLine {
                    account_id: persediaan.id,
                    debit: dec!(75_000),
                    credit: Decimal::ZERO,
                    description: None,
                    product_id: None,
                },
                JournalLine {
                    account_id: kas.id,
                    debit: Decimal::ZERO,
                    credit: dec!(75_000),
                    description: None,
                    product_id: None,
                },
            ],
        })
        .await
        .unwrap();

    let adjustments = app
        .services()
        .posting
        .apply_stock_from_purchase_journal(&journal)
        .await
        .unwrap();

    assert!(adjustments.is_empty());
}

#[tokio::test]
async fn zero_cost_price_is_an_error_when_deriving_stock() {
    let app = TestApp::with_seed().await;
    let free_sample = app
        .create_product("Sampel Gratis", dec!(1_000), Decimal::ZERO, 0)
        .await;
    let accounts = app.services().accounts.list().await.unwrap();
    let persediaan = accounts.iter().find(|a| a.kind == "persediaan").unwrap();
    let kas = accounts.iter().find(|a| a.kind == "kas").unwrap();

    let journal = app
        .services()
        .journal
        .post_journal(NewJournal {
            transaction_number: "TRX5003".to_string(),
            date: Utc::now(),
            description: "Pembelian sampel".to_string(),
            journal_type: JournalType::General,
            lines: vec![
                JournalLine {
                    account_id: persediaan.id,
                    debit: dec!(10_000),
                    credit: Decimal::ZERO,
                    description: None,
                    product_id: Some(free_sample.id),
                },
                JournalLine {
                    account_id: kas.id,
                    debit: Decimal::ZERO,
                    credit: dec!(10_000),
                    description: None,
                    product_id: None,
                },
            ],
        })
        .await
        .unwrap();

    let result = app
        .services()
        .posting
        .apply_stock_from_purchase_journal(&journal)
        .await;

    assert_matches!(result, Err(ServiceError::InvalidOperation(_)));
}
