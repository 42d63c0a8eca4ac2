pub mod accounts;
pub mod cart;
pub mod checkout;
pub mod common;
pub mod health;
pub mod journals;
pub mod orders;
pub mod products;
pub mod reports;
pub mod templates;
