//! Engine Events
//!
//! Events flow from the backends to the host: recovery notices for the
//! out-of-process backend and processor messages (VDC parse errors,
//! liveprog script output) surfaced from the native engine.

use crossbeam_channel::Sender;
use serde::{Deserialize, Serialize};
use vireo_dsp::DspCallbacks;

/// Why the out-of-process backend tore down and recreated its instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RebootReason {
    /// Health check read an invalid process id; the engine crashed or
    /// detached from the session
    InvalidPid { pid: i32 },

    /// Health check read an abnormal sample rate
    AbnormalSampleRate { sample_rate: f32 },

    /// A hard-reboot notification forced recovery
    Requested,
}

/// Events sent from a backend to the host
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum EngineEvent {
    /// The out-of-process instance was released and recreated.
    /// `recovered` is false when recreation itself failed and the resync
    /// cycle was abandoned.
    Rebooted {
        reason: RebootReason,
        recovered: bool,
    },

    /// The active VDC document could not be parsed
    VdcParseError,

    /// A liveprog script started executing
    LiveprogExec { file_id: i32 },

    /// Console output from a running liveprog script
    LiveprogOutput { file_id: i32, message: String },

    /// A liveprog script finished compiling
    LiveprogResult {
        file_id: i32,
        code: i32,
        message: String,
    },
}

/// Adapter that forwards native processor callbacks onto an event channel.
///
/// Pass this as the callback sink when constructing the in-process backend
/// to surface liveprog/VDC messages next to the control-plane events.
pub struct ChannelCallbacks {
    sender: Sender<EngineEvent>,
}

impl ChannelCallbacks {
    pub fn new(sender: Sender<EngineEvent>) -> Self {
        Self { sender }
    }
}

impl DspCallbacks for ChannelCallbacks {
    fn on_vdc_parse_error(&self) {
        let _ = self.sender.send(EngineEvent::VdcParseError);
    }

    fn on_liveprog_exec(&self, file_id: i32) {
        let _ = self.sender.send(EngineEvent::LiveprogExec { file_id });
    }

    fn on_liveprog_output(&self, file_id: i32, message: &str) {
        let _ = self.sender.send(EngineEvent::LiveprogOutput {
            file_id,
            message: message.to_string(),
        });
    }

    fn on_liveprog_result(&self, file_id: i32, code: i32, message: &str) {
        let _ = self.sender.send(EngineEvent::LiveprogResult {
            file_id,
            code,
            message: message.to_string(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;

    #[test]
    fn test_event_serialization() {
        let event = EngineEvent::Rebooted {
            reason: RebootReason::InvalidPid { pid: -1 },
            recovered: true,
        };
        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("Rebooted"));

        let back: EngineEvent = serde_json::from_str(&json).unwrap();
        match back {
            EngineEvent::Rebooted { recovered, .. } => assert!(recovered),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_channel_callbacks_forward() {
        let (tx, rx) = unbounded();
        let callbacks = ChannelCallbacks::new(tx);

        callbacks.on_liveprog_result(3, 0, "compiled");

        match rx.try_recv().unwrap() {
            EngineEvent::LiveprogResult { file_id, code, message } => {
                assert_eq!(file_id, 3);
                assert_eq!(code, 0);
                assert_eq!(message, "compiled");
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_callbacks_survive_dropped_receiver() {
        let (tx, rx) = unbounded();
        let callbacks = ChannelCallbacks::new(tx);
        drop(rx);
        // Must not panic when the host stopped listening
        callbacks.on_vdc_parse_error();
    }
}
