use axum::{routing::get, routing::post, Router};
use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::consumer::{self, SweepLogSink};
use crate::telemetry::TelemetryStore;

use super::api_doc::ApiDoc;
use super::handlers;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<TelemetryStore>,
}

pub async fn run_server(config: Config) -> std::io::Result<()> {
    let bind_addr = config.web.bind.clone();
    let store = Arc::new(TelemetryStore::new());

    // The consumer loop lives for as long as the server does; dropping the
    // stop handle after serve returns shuts it down.
    let (stop_tx, stop_rx) = tokio::sync::oneshot::channel();
    tokio::spawn(consumer::run_consumer(
        store.clone(),
        Duration::from_millis(config.consumer.poll_interval_ms),
        SweepLogSink,
        stop_rx,
    ));

    let state = AppState { store };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = Router::new()
        // Relay endpoints (embedded side)
        .route("/pico_data", post(handlers::receive_sweep))
        .route("/get_rpi_data", get(handlers::poll_command))
        .route("/status", get(handlers::sweep_status))
        // Control endpoints (external client)
        .route(
            "/send_data",
            post(handlers::update_command).get(handlers::last_command),
        )
        // OpenAPI / Swagger
        .merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()))
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    log::info!("Starting server on {}", bind_addr);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    let result = axum::serve(listener, app).await;
    drop(stop_tx);
    result
}
