// Accounting core
pub mod accounts;
pub mod journal;
pub mod posting;
pub mod reports;
pub mod templates;

// Storefront collaborators
pub mod cart;
pub mod cash_flow;
pub mod checkout;
pub mod orders;
pub mod products;

use std::sync::Arc;

use rust_decimal::Decimal;

use crate::{config::AppConfig, db::DbPool};

/// Aggregate of all services used by the HTTP handlers.
#[derive(Clone)]
pub struct AppServices {
    pub accounts: Arc<accounts::AccountService>,
    pub journal: Arc<journal::JournalService>,
    pub templates: Arc<templates::TemplateService>,
    pub reports: Arc<reports::ReportService>,
    pub posting: Arc<posting::PostingService>,
    pub products: Arc<products::ProductCatalogService>,
    pub cart: Arc<cart::CartService>,
    pub checkout: Arc<checkout::CheckoutService>,
    pub orders: Arc<orders::OrderService>,
    pub cash_flow: Arc<cash_flow::CashFlowService>,
}

impl AppServices {
    pub fn new(db: Arc<DbPool>, cfg: &AppConfig) -> Self {
        let accounts = Arc::new(accounts::AccountService::new(db.clone()));
        let journal = Arc::new(journal::JournalService::new(db.clone()));
        let templates = Arc::new(templates::TemplateService::new(db.clone(), journal.clone()));
        let reports = Arc::new(reports::ReportService::new(db.clone()));
        let posting = Arc::new(posting::PostingService::new(db.clone(), journal.clone()));
        let products = Arc::new(products::ProductCatalogService::new(db.clone()));
        let cart = Arc::new(cart::CartService::new(db.clone()));
        let cash_flow = Arc::new(cash_flow::CashFlowService::new(db.clone()));
        let checkout = Arc::new(checkout::CheckoutService::new(
            db.clone(),
            cash_flow.clone(),
            Decimal::from(cfg.shipping_flat_rate),
        ));
        let orders = Arc::new(orders::OrderService::new(db, posting.clone()));

        Self {
            accounts,
            journal,
            templates,
            reports,
            posting,
            products,
            cart,
            checkout,
            orders,
            cash_flow,
        }
    }
}
