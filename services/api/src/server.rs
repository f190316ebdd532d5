use crate::cli::ServeArgs;
use crate::infra::{default_metros, AppState, InMemoryBoardRepository, InMemoryRefundPublisher};
use crate::routes::with_board_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use coffeeboard::config::AppConfig;
use coffeeboard::error::AppError;
use coffeeboard::listings::{BoardService, HttpPaymentGateway};
use coffeeboard::telemetry;
use std::sync::atomic::Ordering;
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
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryBoardRepository::default());
    let refunds = Arc::new(InMemoryRefundPublisher::default());
    let payments = Arc::new(HttpPaymentGateway::new(config.payments.base_url.clone()));
    let board_service = Arc::new(BoardService::new(
        default_metros(),
        repository,
        payments,
        refunds,
    ));

    let app = with_board_routes(board_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "coffee job board ready");

    axum::serve(listener, app).await?;
    Ok(())
}
