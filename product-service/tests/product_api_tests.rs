use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use lifecycle::Orchestrator;
use product_service::api::Product;
use product_service::repository::ProductRepository;
use product_service::router::router;
use product_service::server::Server;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

static FILE_SEQ: AtomicUsize = AtomicUsize::new(0);

fn temp_data_file() -> PathBuf {
    std::env::temp_dir().join(format!(
        "product-api-test-{}-{}.json",
        std::process::id(),
        FILE_SEQ.fetch_add(1, Ordering::SeqCst)
    ))
}

fn sample_catalog() -> Vec<Product> {
    vec![
        Product {
            product_id: "P001".to_string(),
            name: "Hammer".to_string(),
            description: "16oz claw hammer".to_string(),
            price: 12.5,
            stock: 10,
            category: "tools".to_string(),
            tags: vec!["hand-tool".to_string()],
        },
        Product {
            product_id: "P002".to_string(),
            name: "Watering Can".to_string(),
            description: "5L galvanised watering can".to_string(),
            price: 18.0,
            stock: 4,
            category: "garden".to_string(),
            tags: vec![],
        },
    ]
}

struct TestService {
    base_url: String,
    orchestrator: Orchestrator,
    data_file: PathBuf,
}

/// Spin up the full stack on an ephemeral port: repository from a seeded temp
/// file, router with orchestrator probes, server registered for graceful
/// shutdown. Prometheus is off because the global recorder cannot be
/// installed once per test.
async fn start_service() -> TestService {
    let data_file = temp_data_file();
    let map: HashMap<String, Product> = sample_catalog()
        .into_iter()
        .map(|p| (p.product_id.clone(), p))
        .collect();
    tokio::fs::write(&data_file, serde_json::to_vec_pretty(&map).unwrap())
        .await
        .unwrap();

    let repository = Arc::new(ProductRepository::load(&data_file).await.unwrap());
    let orchestrator = Orchestrator::builder("product-service-test")
        .with_trap_signals(false)
        .with_overall_timeout(Duration::from_secs(5))
        .build();

    let app = router(
        repository,
        orchestrator.readiness_handler(),
        orchestrator.liveness_handler(),
        false,
    );
    let server = Server::bind("127.0.0.1:0".parse().unwrap(), app)
        .await
        .unwrap();
    let base_url = format!("http://{}", server.local_addr());

    orchestrator
        .register("server", Duration::from_secs(5), move || server.shutdown())
        .unwrap();
    orchestrator.start();

    TestService {
        base_url,
        orchestrator,
        data_file,
    }
}

impl TestService {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn teardown(self) {
        let _report = self.orchestrator.stop().await;
        drop(tokio::fs::remove_file(&self.data_file).await);
    }
}

// ---------------------------------------------------------------------------
// Catalog endpoints
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_all_products_returns_success_envelope() {
    let service = start_service().await;
    let client = reqwest::Client::new();

    let resp = client.get(service.url("/products")).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "success");
    let products = body["data"].as_array().unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0]["productId"], "P001");
    assert_eq!(products[1]["productId"], "P002");

    service.teardown().await;
}

#[tokio::test]
async fn product_details_found_and_not_found() {
    let service = start_service().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(service.url("/products/details"))
        .json(&serde_json::json!({ "name": "Hammer" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["productId"], "P001");
    assert_eq!(body["data"]["stock"], 10);

    let resp = client
        .post(service.url("/products/details"))
        .json(&serde_json::json!({ "name": "Anvil" }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "error");
    assert_eq!(body["error"]["code"], "PRODUCT_NOT_FOUND");

    service.teardown().await;
}

#[tokio::test]
async fn category_filter_and_validation() {
    let service = start_service().await;
    let client = reqwest::Client::new();

    let resp = client
        .get(service.url("/products/category?category=garden"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
    assert_eq!(body["data"][0]["name"], "Watering Can");

    let resp = client
        .get(service.url("/products/category?category="))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");

    service.teardown().await;
}

#[tokio::test]
async fn stock_update_is_visible_in_subsequent_reads() {
    let service = start_service().await;
    let client = reqwest::Client::new();

    let resp = client
        .patch(service.url("/products/stock"))
        .json(&serde_json::json!({ "name": "Hammer", "stock": 42 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);

    let resp = client
        .post(service.url("/products/details"))
        .json(&serde_json::json!({ "name": "Hammer" }))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["stock"], 42);

    service.teardown().await;
}

#[tokio::test]
async fn buy_product_happy_path_and_business_errors() {
    let service = start_service().await;
    let client = reqwest::Client::new();

    let resp = client
        .post(service.url("/products/buy"))
        .json(&serde_json::json!({ "name": "Watering Can", "quantity": 3 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["data"]["remainingStock"], 1);

    // More than the remaining single unit: business error, stock untouched.
    let resp = client
        .post(service.url("/products/buy"))
        .json(&serde_json::json!({ "name": "Watering Can", "quantity": 2 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 409);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"]["code"], "INSUFFICIENT_STOCK");

    let resp = client
        .post(service.url("/products/buy"))
        .json(&serde_json::json!({ "name": "Watering Can", "quantity": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);

    service.teardown().await;
}

// ---------------------------------------------------------------------------
// Probes and graceful shutdown
// ---------------------------------------------------------------------------

#[tokio::test]
async fn probes_respond_while_running() {
    let service = start_service().await;
    let client = reqwest::Client::new();

    for path in ["/health", "/_liveness", "/_readiness"] {
        let resp = client.get(service.url(path)).send().await.unwrap();
        assert_eq!(resp.status(), 200, "probe {path}");
    }

    service.teardown().await;
}

#[tokio::test]
async fn graceful_shutdown_drains_and_reports_clean() {
    let service = start_service().await;
    let client = reqwest::Client::new();

    // Prove the server answers, then stop everything through the
    // orchestrator the way a SIGTERM would.
    let resp = client.get(service.url("/products")).send().await.unwrap();
    assert_eq!(resp.status(), 200);

    let report = tokio::time::timeout(Duration::from_secs(10), service.orchestrator.stop())
        .await
        .expect("shutdown timed out");
    assert!(report.is_clean(), "unexpected failures: {report}");
    assert_eq!(report.exit_code(), 0);

    // The listener is gone: new connections must fail.
    let err = client
        .get(service.url("/products"))
        .timeout(Duration::from_millis(500))
        .send()
        .await;
    assert!(err.is_err());

    drop(tokio::fs::remove_file(&service.data_file).await);
}
