use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, routing::get, Router};

use crate::{errors::ApiError, handlers::common::success_response, AppState};

async fn trial_balance(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    Ok(success_response(state.services.reports.trial_balance().await?))
}

async fn ledger(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    Ok(success_response(state.services.reports.ledger().await?))
}

async fn income_statement(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    Ok(success_response(
        state.services.reports.income_statement().await?,
    ))
}

async fn balance_sheet(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    Ok(success_response(state.services.reports.balance_sheet().await?))
}

async fn cash_flow(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    Ok(success_response(
        state.services.reports.cash_flow_statement().await?,
    ))
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/trial-balance", get(trial_balance))
        .route("/ledger", get(ledger))
        .route("/income-statement", get(income_statement))
        .route("/balance-sheet", get(balance_sheet))
        .route("/cash-flow", get(cash_flow))
}
