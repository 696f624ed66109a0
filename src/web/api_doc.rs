use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::receive_sweep,
        super::handlers::poll_command,
        super::handlers::update_command,
        super::handlers::last_command,
        super::handlers::sweep_status,
    ),
    components(
        schemas(
            crate::relay::payload::SweepPayload,
            crate::relay::payload::CommandEnvelope,
            crate::relay::payload::CommandUpdate,
            super::error::StatusResponse,
            super::handlers::SweepStatus,
        )
    ),
    info(
        title = "Arcscan Relay API",
        description = "Sweep telemetry relay and host control channel",
        version = "0.1.0"
    ),
    tags(
        (name = "relay", description = "Embedded-side telemetry relay"),
        (name = "control", description = "Host control channel")
    )
)]
pub struct ApiDoc;
