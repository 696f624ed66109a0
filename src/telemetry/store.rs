use std::sync::Mutex;

use super::frame::{CommandBuffer, SweepFrame};

#[derive(Debug, Default)]
struct Shared {
    sweep: SweepFrame,
    pending_command: Option<CommandBuffer>,
    last_command: CommandBuffer,
}

/// The single synchronization boundary of the system: the last completed
/// sweep and the latest command buffer, both replaced wholesale under one
/// mutex. The guard is held only for the clone/swap, never across I/O.
#[derive(Debug, Default)]
pub struct TelemetryStore {
    shared: Mutex<Shared>,
}

impl TelemetryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn replace_sweep(&self, frame: SweepFrame) {
        let mut locked = self.shared.lock().unwrap();
        locked.sweep = frame;
    }

    pub fn read_sweep(&self) -> SweepFrame {
        self.shared.lock().unwrap().sweep.clone()
    }

    pub fn replace_command(&self, cmd: CommandBuffer) {
        let mut locked = self.shared.lock().unwrap();
        locked.last_command = cmd.clone();
        locked.pending_command = Some(cmd);
    }

    /// Consume the pending command. At most one caller observes a given
    /// write; later writes overwrite an unconsumed one (latest-value-wins).
    pub fn take_command(&self) -> Option<CommandBuffer> {
        self.shared.lock().unwrap().pending_command.take()
    }

    /// Last-known command buffer, whether or not it has been consumed.
    pub fn last_command(&self) -> CommandBuffer {
        self.shared.lock().unwrap().last_command.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::telemetry::PointSample;
    use serde_json::json;
    use std::sync::Arc;
    use std::thread;

    fn frame_of(angle: f64, n: usize) -> SweepFrame {
        let points = (0..n)
            .map(|_| PointSample {
                angle_deg: angle,
                distance_cm: Some(100.0),
            })
            .collect();
        SweepFrame::new(points)
    }

    #[test]
    fn replace_then_take_returns_exact_payload() {
        let store = TelemetryStore::new();
        let cmd = CommandBuffer(vec![json!(10), json!(20), json!(30)]);
        store.replace_command(cmd.clone());
        assert_eq!(store.take_command(), Some(cmd));
    }

    #[test]
    fn take_consumes_at_most_once() {
        let store = TelemetryStore::new();
        store.replace_command(CommandBuffer(vec![json!(1)]));
        assert!(store.take_command().is_some());
        assert_eq!(store.take_command(), None);
    }

    #[test]
    fn last_command_survives_take() {
        let store = TelemetryStore::new();
        let cmd = CommandBuffer(vec![json!("park")]);
        store.replace_command(cmd.clone());
        let _ = store.take_command();
        assert_eq!(store.last_command(), cmd);
    }

    #[test]
    fn latest_command_wins() {
        let store = TelemetryStore::new();
        store.replace_command(CommandBuffer(vec![json!(1)]));
        store.replace_command(CommandBuffer(vec![json!(2)]));
        assert_eq!(store.take_command(), Some(CommandBuffer(vec![json!(2)])));
    }

    #[test]
    fn sweep_replaced_wholesale() {
        let store = TelemetryStore::new();
        store.replace_sweep(frame_of(10.0, 37));
        store.replace_sweep(frame_of(20.0, 5));
        let frame = store.read_sweep();
        assert_eq!(frame.len(), 5);
        assert!(frame.points.iter().all(|p| p.angle_deg == 20.0));
    }

    // Writers alternate between two frame shapes; a reader must only ever
    // observe one of them in full, never a mix or a partial frame.
    #[test]
    fn concurrent_reader_never_sees_partial_frame() {
        let store = Arc::new(TelemetryStore::new());
        let writer_store = store.clone();

        let writer = thread::spawn(move || {
            for i in 0..500 {
                if i % 2 == 0 {
                    writer_store.replace_sweep(frame_of(1.0, 37));
                } else {
                    writer_store.replace_sweep(frame_of(2.0, 5));
                }
            }
        });

        let reader = thread::spawn(move || {
            for _ in 0..500 {
                let frame = store.read_sweep();
                match frame.len() {
                    0 => {}
                    37 => assert!(frame.points.iter().all(|p| p.angle_deg == 1.0)),
                    5 => assert!(frame.points.iter().all(|p| p.angle_deg == 2.0)),
                    n => panic!("observed partial frame of {} points", n),
                }
            }
        });

        writer.join().unwrap();
        reader.join().unwrap();
    }
}
