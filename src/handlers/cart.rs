use std::sync::Arc;

use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{delete, get, post},
    Json, Router,
};
use uuid::Uuid;

use crate::{
    errors::ApiError,
    handlers::common::{created_response, no_content_response, success_response},
    services::cart::AddToCartInput,
    AppState,
};

async fn get_cart(
    State(state): State<Arc<AppState>>,
    Path(customer_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let cart = state.services.cart.get_cart(customer_id).await?;
    Ok(success_response(cart))
}

async fn add_item(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AddToCartInput>,
) -> Result<impl IntoResponse, ApiError> {
    let item = state.services.cart.add_item(payload).await?;
    Ok(created_response(item))
}

async fn remove_item(
    State(state): State<Arc<AppState>>,
    Path((customer_id, product_id)): Path<(Uuid, Uuid)>,
) -> Result<impl IntoResponse, ApiError> {
    state.services.cart.remove_item(customer_id, product_id).await?;
    Ok(no_content_response())
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/items", post(add_item))
        .route("/:customer_id", get(get_cart))
        .route("/:customer_id/items/:product_id", delete(remove_item))
}
