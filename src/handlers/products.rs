use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
    Router,
};
use uuid::Uuid;

use crate::{errors::ApiError, handlers::common::success_response, AppState};

async fn list_products(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let products = state.services.products.list_active().await?;
    Ok(success_response(products))
}

async fn get_product(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let product = state.services.products.get(id).await?;
    Ok(success_response(product))
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_products))
        .route("/:id", get(get_product))
}
