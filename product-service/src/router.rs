use std::future::ready;
use std::sync::Arc;

use axum::http::Method;
use axum::routing::{get, patch, post};
use axum::Router;
use lifecycle::{LivenessHandler, ReadinessHandler};
use tower_http::cors::{AllowHeaders, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::prometheus::{setup_metrics_recorder, track_metrics};
use crate::repository::ProductRepository;

#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<ProductRepository>,
}

pub fn router(
    repository: Arc<ProductRepository>,
    readiness: ReadinessHandler,
    liveness: LivenessHandler,
    metrics: bool,
) -> Router {
    let state = AppState { repository };

    // Permissive CORS policy, the storefront callers sit behind assorted
    // reverse proxies.
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers(AllowHeaders::mirror_request())
        .allow_origin(AllowOrigin::mirror_request());

    let router = Router::new()
        .route("/", get(handlers::index))
        .route(
            "/_readiness",
            get(move || {
                let readiness = readiness.clone();
                async move { readiness.check().await }
            }),
        )
        .route("/_liveness", get(move || ready(liveness.check())))
        .route("/health", get(handlers::health))
        .route("/products", get(handlers::get_all_products))
        .route(
            "/products/category",
            get(handlers::get_products_by_category),
        )
        .route("/products/details", post(handlers::get_product_by_name))
        .route("/products/stock", patch(handlers::update_product_stock))
        .route("/products/buy", post(handlers::buy_product))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(axum::middleware::from_fn(track_metrics))
        .with_state(state);

    // Don't install the prometheus recorder unless asked to: installing a
    // global recorder when the crate is used as a library (during tests etc.)
    // does not work well.
    if metrics {
        let recorder_handle = setup_metrics_recorder();
        router.route("/metrics", get(move || ready(recorder_handle.render())))
    } else {
        router
    }
}
