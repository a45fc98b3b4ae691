//! Wire types: the product model, request/response envelopes, and the
//! catalog's error taxonomy with its HTTP mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::product_metrics;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub product_id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub stock: u32,
    pub category: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ProductDetailsRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct StockUpdateRequest {
    pub name: String,
    pub stock: u32,
}

#[derive(Debug, Deserialize)]
pub struct BuyRequest {
    pub name: String,
    pub quantity: u32,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyConfirmation {
    pub name: String,
    pub remaining_stock: u32,
}

/// Standard success envelope: `{"status": "success", "data": ...}`.
#[derive(Debug, Serialize)]
pub struct SuccessResponse<T> {
    pub status: &'static str,
    pub data: T,
}

pub fn success<T: Serialize>(data: T) -> Json<SuccessResponse<T>> {
    Json(SuccessResponse {
        status: "success",
        data,
    })
}

/// Standard error envelope: `{"status": "error", "error": {code, message}}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub status: String,
    pub error: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("product '{0}' not found")]
    NotFound(String),

    #[error("insufficient stock for product '{name}': available {available}, requested {requested}")]
    InsufficientStock {
        name: String,
        available: u32,
        requested: u32,
    },

    #[error("inventory access error: {0}")]
    Inventory(String),
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::NotFound(_) => "PRODUCT_NOT_FOUND",
            ApiError::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            ApiError::Inventory(_) => "INVENTORY_ACCESS_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::InsufficientStock { .. } => StatusCode::CONFLICT,
            ApiError::Inventory(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(code = self.code(), "request failed: {self}");
        } else {
            tracing::warn!(code = self.code(), "request rejected: {self}");
        }
        product_metrics::record_error(self.code());

        let body = Json(ErrorResponse {
            status: "error".to_string(),
            error: ErrorDetail {
                code: self.code().to_string(),
                message: self.to_string(),
            },
        });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_and_statuses_line_up() {
        let cases = [
            (
                ApiError::Validation("bad".into()),
                "VALIDATION_ERROR",
                StatusCode::BAD_REQUEST,
            ),
            (
                ApiError::NotFound("widget".into()),
                "PRODUCT_NOT_FOUND",
                StatusCode::NOT_FOUND,
            ),
            (
                ApiError::InsufficientStock {
                    name: "widget".into(),
                    available: 1,
                    requested: 2,
                },
                "INSUFFICIENT_STOCK",
                StatusCode::CONFLICT,
            ),
            (
                ApiError::Inventory("disk on fire".into()),
                "INVENTORY_ACCESS_ERROR",
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, code, status) in cases {
            assert_eq!(err.code(), code);
            assert_eq!(err.status_code(), status);
        }
    }

    #[test]
    fn product_serialises_camel_case() {
        let product = Product {
            product_id: "P001".into(),
            name: "Espresso Machine".into(),
            description: "15 bar pump".into(),
            price: 249.99,
            stock: 7,
            category: "kitchen".into(),
            tags: vec!["coffee".into()],
        };
        let value = serde_json::to_value(&product).unwrap();
        assert_eq!(value["productId"], "P001");
        assert_eq!(value["stock"], 7);
    }
}
