use axum::{extract::State, Json};
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::relay::payload::{self, CommandEnvelope, CommandUpdate, SweepPayload};

use super::error::{ApiResult, StatusResponse};
use super::server::AppState;

#[utoipa::path(
    post,
    path = "/pico_data",
    request_body = SweepPayload,
    responses(
        (status = 200, description = "Sweep stored", body = StatusResponse),
        (status = 400, description = "Malformed payload", body = StatusResponse)
    ),
    tag = "relay"
)]
pub async fn receive_sweep(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Json<StatusResponse>> {
    let frame = payload::parse_sweep(&body)?;
    log::info!("received {} points", frame.len());
    state.store.replace_sweep(frame);
    Ok(Json(StatusResponse::new("received")))
}

#[utoipa::path(
    get,
    path = "/get_rpi_data",
    responses(
        (status = 200, description = "Pending command for the embedded side, empty when nothing fresh", body = CommandEnvelope)
    ),
    tag = "relay"
)]
pub async fn poll_command(State(state): State<AppState>) -> Json<CommandEnvelope> {
    let rpi_data = state.store.take_command().map(|c| c.0).unwrap_or_default();
    Json(CommandEnvelope { rpi_data })
}

#[utoipa::path(
    post,
    path = "/send_data",
    request_body = CommandUpdate,
    responses(
        (status = 200, description = "Command buffer updated", body = StatusResponse),
        (status = 400, description = "Malformed payload", body = StatusResponse)
    ),
    tag = "control"
)]
pub async fn update_command(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> ApiResult<Json<StatusResponse>> {
    let command = payload::parse_command(&body)?;
    log::info!("command buffer updated: {} entries", command.0.len());
    state.store.replace_command(command);
    Ok(Json(StatusResponse::with_message("success", "Data updated")))
}

#[utoipa::path(
    get,
    path = "/send_data",
    responses(
        (status = 200, description = "Last-known outbound command buffer", body = CommandEnvelope)
    ),
    tag = "control"
)]
pub async fn last_command(State(state): State<AppState>) -> Json<CommandEnvelope> {
    Json(CommandEnvelope {
        rpi_data: state.store.last_command().0,
    })
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SweepStatus {
    pub points: usize,
    pub received_at: Option<DateTime<Utc>>,
}

#[utoipa::path(
    get,
    path = "/status",
    responses(
        (status = 200, description = "Last sweep summary", body = SweepStatus)
    ),
    tag = "relay"
)]
pub async fn sweep_status(State(state): State<AppState>) -> Json<SweepStatus> {
    let frame = state.store.read_sweep();
    Json(SweepStatus {
        points: frame.len(),
        received_at: frame.received_at,
    })
}
