use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryListingRepository};
use crate::routes::with_service_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use estate_metrics::config::AppConfig;
use estate_metrics::engine::MetricsEngine;
use estate_metrics::error::AppError;
use estate_metrics::listings::{ListingGenerator, ListingService};
use estate_metrics::telemetry;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let engine = Arc::new(MetricsEngine::new(config.policy.clone()));
    let repository = Arc::new(InMemoryListingRepository::default());
    let listing_service = Arc::new(ListingService::new(repository, engine.clone()));

    if args.demo_listings > 0 {
        let mut generator = ListingGenerator::standard(config.demo_seed)?;
        listing_service.seed(&mut generator, args.demo_listings)?;
    }

    let app = with_service_routes(engine, listing_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, seed = config.demo_seed, "estate metrics service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
