use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::oneshot;

use crate::telemetry::{SweepFrame, TelemetryStore};

#[derive(Debug, Error)]
#[error("{0}")]
pub struct RenderError(pub String);

/// Visualization boundary. Implementations draw or forward a completed
/// sweep; the poll loop survives any render failure.
pub trait RenderSink: Send {
    fn render(&mut self, frame: &SweepFrame) -> Result<(), RenderError>;
}

/// Sink that logs a one-line sweep summary, standing in for the
/// out-of-scope plot surface.
#[derive(Debug, Default)]
pub struct SweepLogSink;

impl RenderSink for SweepLogSink {
    fn render(&mut self, frame: &SweepFrame) -> Result<(), RenderError> {
        let nearest = frame
            .points
            .iter()
            .filter_map(|p| p.distance_cm.map(|d| (p.angle_deg, d)))
            .min_by(|a, b| a.1.total_cmp(&b.1));
        match nearest {
            Some((angle_deg, distance_cm)) => log::info!(
                "sweep: {} points, nearest {:.2} cm at {:.0}°",
                frame.len(),
                distance_cm,
                angle_deg
            ),
            None => log::info!("sweep: {} points, no echo", frame.len()),
        }
        Ok(())
    }
}

/// Poll the store at a fixed cadence and forward fresh sweeps to the sink.
/// A frame is forwarded once: identical points on the next tick are
/// skipped. Render errors are logged and never terminate the loop.
pub async fn run_consumer(
    store: Arc<TelemetryStore>,
    poll_interval: Duration,
    mut sink: impl RenderSink,
    mut stop_rx: oneshot::Receiver<()>,
) {
    let mut ticker = tokio::time::interval(poll_interval);
    let mut last_points = None;

    loop {
        let stopped = tokio::select! {
            _ = ticker.tick() => false,
            _ = &mut stop_rx => true,
        };
        if stopped {
            return;
        }

        let frame = store.read_sweep();
        if frame.is_empty() || last_points.as_ref() == Some(&frame.points) {
            continue;
        }
        last_points = Some(frame.points.clone());

        if let Err(e) = sink.render(&frame) {
            log::warn!("render failed: {}", e);
        }
    }
}
