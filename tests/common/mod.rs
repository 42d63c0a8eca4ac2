#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

use kangmas_shop::{
    app_router,
    config::AppConfig,
    db::{self, DbConfig},
    entities::{
        account::{self, AccountCategory},
        product,
    },
    services::AppServices,
    AppState,
};

/// Test harness backed by an in-memory SQLite database. A single pooled
/// connection keeps every query on the same in-memory instance.
pub struct TestApp {
    pub router: Router,
    pub state: Arc<AppState>,
}

impl TestApp {
    /// Fresh application state with empty tables.
    pub async fn new() -> Self {
        let cfg = test_config();

        let pool = db::establish_connection_with_config(&DbConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            connect_timeout: Duration::from_secs(5),
        })
        .await
        .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let db = Arc::new(pool);
        let services = AppServices::new(db.clone(), &cfg);
        let state = Arc::new(AppState {
            db,
            config: cfg,
            services,
        });
        let router = app_router(state.clone());

        Self { router, state }
    }

    /// Fresh state with the chart of accounts, demo products and opening
    /// journal seeded.
    pub async fn with_seed() -> Self {
        let app = Self::new().await;
        kangmas_shop::seed::run(app.state.db.clone())
            .await
            .expect("failed to seed test data");
        app
    }

    pub fn services(&self) -> &AppServices {
        &self.state.services
    }

    pub async fn create_account(
        &self,
        code: &str,
        name: &str,
        kind: &str,
        category: AccountCategory,
    ) -> account::Model {
        account::ActiveModel {
            id: Set(Uuid::new_v4()),
            code: Set(code.to_string()),
            name: Set(name.to_string()),
            kind: Set(kind.to_string()),
            category: Set(category),
            balance: Set(Decimal::ZERO),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.state.db)
        .await
        .expect("failed to create test account")
    }

    pub async fn create_product(
        &self,
        name: &str,
        price: Decimal,
        cost_price: Decimal,
        stock: i32,
    ) -> product::Model {
        product::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name.to_string()),
            description: Set(None),
            price: Set(price),
            cost_price: Set(cost_price),
            stock: Set(stock),
            category: Set("bibit".to_string()),
            size_cm: Set(None),
            weight_kg: Set(None),
            is_featured: Set(false),
            is_active: Set(true),
            image_url: Set(None),
            created_at: Set(Utc::now()),
        }
        .insert(&*self.state.db)
        .await
        .expect("failed to create test product")
    }

    /// Current balance of the account with the given code.
    pub async fn balance_of_code(&self, code: &str) -> Decimal {
        self.services()
            .accounts
            .list()
            .await
            .expect("account listing failed")
            .into_iter()
            .find(|a| a.code == code)
            .unwrap_or_else(|| panic!("no account with code '{}'", code))
            .balance
    }

    /// Current balance of the first account of the given kind.
    pub async fn balance_of(&self, kind: &str) -> Decimal {
        self.services()
            .accounts
            .find_by_kind(kind)
            .await
            .expect("account lookup failed")
            .unwrap_or_else(|| panic!("no account of kind '{}'", kind))
            .balance
    }
}

fn test_config() -> AppConfig {
    AppConfig {
        database_url: "sqlite::memory:".to_string(),
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: "test".to_string(),
        log_level: "info".to_string(),
        log_json: false,
        auto_migrate: true,
        seed_on_startup: false,
        shipping_flat_rate: 15_000,
        db_max_connections: 1,
        db_min_connections: 1,
        db_connect_timeout_secs: 5,
    }
}
