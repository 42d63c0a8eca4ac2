use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, routing::get, Router};

use crate::{errors::ApiError, handlers::common::success_response, AppState};

async fn list_accounts(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let accounts = state.services.accounts.list().await?;
    Ok(success_response(accounts))
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/", get(list_accounts))
}
