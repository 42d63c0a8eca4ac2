use std::sync::Arc;

use axum::{extract::State, response::IntoResponse, routing::post, Json, Router};

use crate::{
    errors::ApiError, handlers::common::created_response, services::checkout::CheckoutInput,
    AppState,
};

async fn checkout(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CheckoutInput>,
) -> Result<impl IntoResponse, ApiError> {
    let order = state.services.checkout.checkout(payload).await?;
    Ok(created_response(order))
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/", post(checkout))
}
