//! Processor Callbacks
//!
//! The native engine reports events back to the host while processing:
//! VDC document parse failures, liveprog script console output, and script
//! execution results. Implementations are invoked from whatever thread the
//! native side happens to be on and must not block.

/// Receiver for messages originating inside the native engine.
///
/// All methods default to no-ops so hosts implement only what they surface.
pub trait DspCallbacks: Send + Sync {
    /// The active VDC document could not be parsed.
    fn on_vdc_parse_error(&self) {}

    /// A liveprog script was (re)loaded and started executing.
    fn on_liveprog_exec(&self, file_id: i32) {
        let _ = file_id;
    }

    /// Console output produced by a running liveprog script.
    fn on_liveprog_output(&self, file_id: i32, message: &str) {
        let _ = (file_id, message);
    }

    /// A liveprog script finished compiling; non-zero codes are errors.
    fn on_liveprog_result(&self, file_id: i32, code: i32, message: &str) {
        let _ = (file_id, code, message);
    }
}

/// Callback sink that ignores everything.
pub struct DummyCallbacks;

impl DspCallbacks for DummyCallbacks {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dummy_callbacks_are_noops() {
        let cb = DummyCallbacks;
        cb.on_vdc_parse_error();
        cb.on_liveprog_exec(1);
        cb.on_liveprog_output(1, "hello");
        cb.on_liveprog_result(1, 0, "ok");
    }
}
