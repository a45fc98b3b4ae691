//! HTTP handlers for the catalog endpoints.

use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use serde_json::json;
use tracing::info;

use crate::api::{
    success, ApiError, BuyConfirmation, BuyRequest, ProductDetailsRequest, StockUpdateRequest,
};
use crate::router::AppState;

pub async fn index() -> &'static str {
    "product-service"
}

pub async fn health() -> impl IntoResponse {
    success(json!({ "status": "healthy" }))
}

pub async fn get_all_products(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, ApiError> {
    let products = state.repository.get_all().await;
    Ok(success(products))
}

#[derive(Debug, Deserialize)]
pub struct CategoryParams {
    pub category: String,
}

pub async fn get_products_by_category(
    State(state): State<AppState>,
    Query(params): Query<CategoryParams>,
) -> Result<impl IntoResponse, ApiError> {
    if params.category.trim().is_empty() {
        return Err(ApiError::Validation("category must not be empty".into()));
    }
    let products = state.repository.get_by_category(&params.category).await;
    Ok(success(products))
}

pub async fn get_product_by_name(
    State(state): State<AppState>,
    Json(request): Json<ProductDetailsRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if request.name.trim().is_empty() {
        return Err(ApiError::Validation("name must not be empty".into()));
    }
    let product = state.repository.get_by_name(&request.name).await?;
    Ok(success(product))
}

pub async fn update_product_stock(
    State(state): State<AppState>,
    Json(request): Json<StockUpdateRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if request.name.trim().is_empty() {
        return Err(ApiError::Validation("name must not be empty".into()));
    }
    state
        .repository
        .update_stock(&request.name, request.stock)
        .await?;
    info!(product = %request.name, stock = request.stock, "stock level updated");
    Ok(success(json!({
        "name": request.name,
        "stock": request.stock,
    })))
}

pub async fn buy_product(
    State(state): State<AppState>,
    Json(request): Json<BuyRequest>,
) -> Result<impl IntoResponse, ApiError> {
    if request.name.trim().is_empty() {
        return Err(ApiError::Validation("name must not be empty".into()));
    }
    if request.quantity == 0 {
        return Err(ApiError::Validation("quantity must be at least 1".into()));
    }
    let remaining_stock = state.repository.buy(&request.name, request.quantity).await?;
    info!(
        product = %request.name,
        quantity = request.quantity,
        remaining_stock,
        "purchase completed"
    );
    Ok(success(BuyConfirmation {
        name: request.name,
        remaining_stock,
    }))
}
