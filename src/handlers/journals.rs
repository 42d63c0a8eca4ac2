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
use uuid::Uuid;
use validator::Validate;

use crate::{
    entities::journal_entry::JournalType,
    errors::ApiError,
    handlers::common::{created_response, success_response, validate_input},
    services::journal::{unique_transaction_number, JournalLine, NewJournal, DEFAULT_PREFIX},
    AppState,
};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateJournalRequest {
    /// Generated when omitted; regenerated when it collides
    pub transaction_number: Option<String>,
    pub date: DateTime<Utc>,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[serde(default = "default_journal_type")]
    pub journal_type: JournalType,
    pub lines: Vec<JournalLine>,
}

fn default_journal_type() -> JournalType {
    JournalType::General
}

async fn create_journal(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateJournalRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;

    let journal = state
        .services
        .journal
        .post_journal(NewJournal {
            transaction_number: payload
                .transaction_number
                .unwrap_or_else(|| unique_transaction_number(DEFAULT_PREFIX)),
            date: payload.date,
            description: payload.description,
            journal_type: payload.journal_type,
            lines: payload.lines,
        })
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

async fn list_journals(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let journals = state.services.journal.list_journals().await?;
    Ok(success_response(journals))
}

async fn get_journal(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let journal = state.services.journal.get_journal(id).await?;
    Ok(success_response(journal))
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", post(create_journal).get(list_journals))
        .route("/:id", get(get_journal))
}
