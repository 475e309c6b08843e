use crate::cli::ServeArgs;
use crate::infra::{AppState, InMemoryScoreStore};
use crate::routes::with_match_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use placement_dss::config::AppConfig;
use placement_dss::error::AppError;
use placement_dss::matching::MatchService;
use placement_dss::telemetry;
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

    let store = Arc::new(InMemoryScoreStore::default());
    let match_service = Arc::new(MatchService::new(store, &config.matching)?);
    let criteria = match_service.criteria().join(",");

    let app = with_match_routes(match_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        %criteria,
        parallel_threshold = config.matching.parallel_threshold,
        "placement decision support service ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
