use std::sync::Arc;

use envconfig::Envconfig;
use lifecycle::Orchestrator;

use product_service::config::Config;
use product_service::repository::ProductRepository;
use product_service::server::Server;
use product_service::{logging, router};

#[tokio::main]
async fn main() {
    let config = Config::init_from_env().expect("invalid configuration:");
    config.validate().expect("configuration validation failed");

    // Telemetry comes up first so everything after it can emit spans and
    // logs; it is registered first so it shuts down last.
    let guard = telemetry::init_telemetry(&config.telemetry_settings())
        .expect("failed to initialize telemetry");
    logging::init_tracing(config.log_level, &guard);

    let orchestrator = Orchestrator::builder(&config.service_name)
        .with_overall_timeout(config.overall_shutdown_timeout())
        .build();

    let telemetry_timeout = config.telemetry_shutdown_timeout();
    orchestrator
        .register("telemetry", telemetry_timeout, move || async move {
            guard.shutdown().await.map_err(Into::into)
        })
        .expect("telemetry registration raced shutdown");

    let repository = Arc::new(
        ProductRepository::load(&config.product_data_file_path)
            .await
            .expect("failed to load product catalog"),
    );

    let app = router::router(
        repository,
        orchestrator.readiness_handler(),
        orchestrator.liveness_handler(),
        config.export_prometheus,
    );

    let server = Server::bind(config.address, app)
        .await
        .expect("could not bind port");
    tracing::info!(address = %server.local_addr(), "listening");

    orchestrator
        .register("server", config.server_shutdown_timeout(), move || {
            server.shutdown()
        })
        .expect("server registration raced shutdown");

    orchestrator.start();
    let report = orchestrator.wait().await;
    std::process::exit(report.exit_code());
}
