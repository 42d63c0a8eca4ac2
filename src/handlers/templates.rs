use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::json;

use crate::{
    errors::ApiError,
    handlers::common::{created_response, success_response},
    services::templates::TemplateAmount,
    AppState,
};

#[derive(Debug, Deserialize)]
pub struct InstantiateTemplateRequest {
    pub date: DateTime<Utc>,
    /// One amount per template line, in line order
    pub amounts: Vec<TemplateAmount>,
}

async fn list_templates(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    success_response(state.services.templates.catalog())
}

async fn get_template(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let template = state.services.templates.get(&key)?;
    Ok(success_response(template))
}

async fn instantiate_template(
    State(state): State<Arc<AppState>>,
    Path(key): Path<String>,
    Json(payload): Json<InstantiateTemplateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let journal = state
        .services
        .templates
        .instantiate(&key, payload.date, payload.amounts)
        .await?;

    let stock_adjustments = state
        .services
        .posting
        .apply_stock_from_purchase_journal(&journal)
        .await?;

    Ok(created_response(json!({
        "journal": journal,
        "stock_adjustments": stock_adjustments,
    })))
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_templates))
        .route("/:key", get(get_template))
        .route("/:key/journals", post(instantiate_template))
}
