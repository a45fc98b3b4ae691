//! Business metrics, reported through the global telemetry registry's meter.
//!
//! Instruments are created lazily on first use; before the registry is
//! initialized they bind to the SDK's no-op meter, so recording is always
//! safe. In the service binary the registry is initialized in `main` before
//! any request can be served.

use once_cell::sync::Lazy;
use opentelemetry::metrics::Counter;
use opentelemetry::KeyValue;

use crate::api::Product;

const METER_SCOPE: &str = "product-service";

static REVENUE_TOTAL: Lazy<Counter<f64>> = Lazy::new(|| {
    telemetry::registry::meter(METER_SCOPE)
        .f64_counter("product_revenue_total")
        .with_description("Cumulative revenue from completed purchases")
        .build()
});

static ITEMS_SOLD_TOTAL: Lazy<Counter<u64>> = Lazy::new(|| {
    telemetry::registry::meter(METER_SCOPE)
        .u64_counter("product_items_sold_total")
        .with_description("Number of items sold, by product and category")
        .build()
});

static CATALOG_ERRORS_TOTAL: Lazy<Counter<u64>> = Lazy::new(|| {
    telemetry::registry::meter(METER_SCOPE)
        .u64_counter("product_catalog_errors_total")
        .with_description("Catalog requests that ended in an error, by code")
        .build()
});

/// Report revenue and items sold for a completed purchase.
pub fn record_sale(product: &Product, quantity: u32) {
    let attributes = [
        KeyValue::new("product.name", product.name.clone()),
        KeyValue::new("product.category", product.category.clone()),
    ];
    REVENUE_TOTAL.add(product.price * f64::from(quantity), &attributes);
    ITEMS_SOLD_TOTAL.add(u64::from(quantity), &attributes);
}

/// Count a failed catalog request by its application error code.
pub fn record_error(code: &'static str) {
    CATALOG_ERRORS_TOTAL.add(1, &[KeyValue::new("error.code", code)]);
}
