//! Stub Native Engine
//!
//! In-memory `NativeDsp` for tests and for hosts running without the native
//! library. Records every call it receives; processing passes buffers
//! through untouched but counts invocations so tests can tell a real
//! dispatch from the disabled/closed no-op path.

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::callbacks::DspCallbacks;
use crate::eel::EelVmVariable;
use crate::error::DspError;
use crate::native::{NativeDsp, RawHandle};

/// Recording stand-in for the native DSP library.
pub struct StubDsp {
    next_handle: AtomicU64,
    calls: Mutex<Vec<String>>,
    freed: Mutex<Vec<RawHandle>>,
    variables: Mutex<Vec<EelVmVariable>>,
    /// When set, every setter reports rejection.
    reject_setters: AtomicBool,
    process_calls: AtomicUsize,
    frozen: AtomicBool,
}

impl StubDsp {
    pub fn new() -> Self {
        Self {
            next_handle: AtomicU64::new(1),
            calls: Mutex::new(Vec::new()),
            freed: Mutex::new(Vec::new()),
            variables: Mutex::new(Vec::new()),
            reject_setters: AtomicBool::new(false),
            process_calls: AtomicUsize::new(0),
            frozen: AtomicBool::new(false),
        }
    }

    /// Make all subsequent setters report rejection.
    pub fn reject_setters(&self, reject: bool) {
        self.reject_setters.store(reject, Ordering::SeqCst);
    }

    /// Names of setter calls received, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().clear();
    }

    /// Handles released so far, in release order.
    pub fn freed(&self) -> Vec<RawHandle> {
        self.freed.lock().clone()
    }

    /// Number of processing calls that actually reached the stub.
    pub fn process_calls(&self) -> usize {
        self.process_calls.load(Ordering::SeqCst)
    }

    pub fn is_frozen(&self) -> bool {
        self.frozen.load(Ordering::SeqCst)
    }

    /// Seed an EEL variable for enumeration tests.
    pub fn insert_variable(&self, var: EelVmVariable) {
        self.variables.lock().push(var);
    }

    fn record(&self, call: impl Into<String>) -> bool {
        self.calls.lock().push(call.into());
        !self.reject_setters.load(Ordering::SeqCst)
    }
}

impl Default for StubDsp {
    fn default() -> Self {
        Self::new()
    }
}

impl NativeDsp for StubDsp {
    fn alloc(&self, _callbacks: Arc<dyn DspCallbacks>) -> Result<RawHandle, DspError> {
        Ok(self.next_handle.fetch_add(1, Ordering::SeqCst))
    }

    fn free(&self, handle: RawHandle) {
        self.freed.lock().push(handle);
    }

    fn set_sampling_rate(&self, _handle: RawHandle, rate: f32, _force_refresh: bool) -> bool {
        self.record(format!("set_sampling_rate({rate})"))
    }

    fn set_limiter(&self, _handle: RawHandle, _threshold: f32, _release: f32) -> bool {
        self.record("set_limiter")
    }

    fn set_post_gain(&self, _handle: RawHandle, _post_gain: f32) -> bool {
        self.record("set_post_gain")
    }

    fn set_compressor(
        &self,
        _handle: RawHandle,
        _enable: bool,
        _max_attack: f32,
        _max_release: f32,
        _adapt_speed: f32,
    ) -> bool {
        self.record("set_compressor")
    }

    fn set_reverb(&self, _handle: RawHandle, _enable: bool, _preset: i32) -> bool {
        self.record("set_reverb")
    }

    fn set_crossfeed(
        &self,
        _handle: RawHandle,
        _enable: bool,
        mode: i32,
        _fcut: i32,
        _feed: i32,
    ) -> bool {
        self.record(format!("set_crossfeed(mode={mode})"))
    }

    fn set_bass_boost(&self, _handle: RawHandle, _enable: bool, _max_gain: f32) -> bool {
        self.record("set_bass_boost")
    }

    fn set_stereo_enhancement(&self, _handle: RawHandle, _enable: bool, _level: f32) -> bool {
        self.record("set_stereo_enhancement")
    }

    fn set_vacuum_tube(&self, _handle: RawHandle, _enable: bool, _level: f32) -> bool {
        self.record("set_vacuum_tube")
    }

    fn set_fir_equalizer(
        &self,
        _handle: RawHandle,
        _enable: bool,
        _filter_type: i32,
        _interpolation_mode: i32,
        _bands: &[f64],
    ) -> bool {
        self.record("set_fir_equalizer")
    }

    fn set_vdc(&self, _handle: RawHandle, _enable: bool, _vdc: &str) -> bool {
        self.record("set_vdc")
    }

    fn set_convolver(
        &self,
        _handle: RawHandle,
        _enable: bool,
        _impulse_response: &[f32],
        _channels: i32,
        _frames: i32,
    ) -> bool {
        self.record("set_convolver")
    }

    fn set_graphic_eq(&self, _handle: RawHandle, _enable: bool, _bands: &str) -> bool {
        self.record("set_graphic_eq")
    }

    fn set_liveprog(&self, _handle: RawHandle, _enable: bool, _name: &str, _path: &str) -> bool {
        self.record("set_liveprog")
    }

    fn process_i16(&self, _handle: RawHandle, input: Vec<i16>) -> Vec<i16> {
        self.process_calls.fetch_add(1, Ordering::SeqCst);
        input
    }

    fn process_i32(&self, _handle: RawHandle, input: Vec<i32>) -> Vec<i32> {
        self.process_calls.fetch_add(1, Ordering::SeqCst);
        input
    }

    fn process_f32(&self, _handle: RawHandle, input: Vec<f32>) -> Vec<f32> {
        self.process_calls.fetch_add(1, Ordering::SeqCst);
        input
    }

    fn enumerate_eel_variables(&self, _handle: RawHandle) -> Vec<EelVmVariable> {
        self.variables.lock().clone()
    }

    fn manipulate_eel_variable(&self, _handle: RawHandle, name: &str, value: f32) -> bool {
        let mut vars = self.variables.lock();
        match vars.iter_mut().find(|v| v.name == name) {
            Some(var) if !var.is_constant => {
                var.value = value;
                true
            }
            _ => false,
        }
    }

    fn freeze_liveprog_execution(&self, _handle: RawHandle, freeze: bool) {
        self.frozen.store(freeze, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DummyCallbacks;

    #[test]
    fn test_alloc_returns_distinct_nonnull_handles() {
        let stub = StubDsp::new();
        let a = stub.alloc(Arc::new(DummyCallbacks)).unwrap();
        let b = stub.alloc(Arc::new(DummyCallbacks)).unwrap();
        assert_ne!(a, 0);
        assert_ne!(a, b);
    }

    #[test]
    fn test_records_setter_calls_in_order() {
        let stub = StubDsp::new();
        let h = stub.alloc(Arc::new(DummyCallbacks)).unwrap();
        assert!(stub.set_reverb(h, true, 3));
        assert!(stub.set_bass_boost(h, true, 5.0));
        assert_eq!(stub.calls(), vec!["set_reverb", "set_bass_boost"]);
    }

    #[test]
    fn test_reject_setters() {
        let stub = StubDsp::new();
        let h = stub.alloc(Arc::new(DummyCallbacks)).unwrap();
        stub.reject_setters(true);
        assert!(!stub.set_reverb(h, true, 3));
    }

    #[test]
    fn test_eel_variable_mutation() {
        let stub = StubDsp::new();
        let h = stub.alloc(Arc::new(DummyCallbacks)).unwrap();
        stub.insert_variable(EelVmVariable::new("depth", 1.0));

        assert!(stub.manipulate_eel_variable(h, "depth", 2.0));
        assert_eq!(stub.enumerate_eel_variables(h)[0].value, 2.0);
        assert!(!stub.manipulate_eel_variable(h, "missing", 0.0));
    }

    #[test]
    fn test_constant_variable_rejects_mutation() {
        let stub = StubDsp::new();
        let h = stub.alloc(Arc::new(DummyCallbacks)).unwrap();
        stub.insert_variable(EelVmVariable {
            name: "srate".into(),
            value: 48000.0,
            is_constant: true,
        });
        assert!(!stub.manipulate_eel_variable(h, "srate", 1.0));
    }

    #[test]
    fn test_processing_passes_through_and_counts() {
        let stub = StubDsp::new();
        let h = stub.alloc(Arc::new(DummyCallbacks)).unwrap();
        let out = stub.process_f32(h, vec![0.25, -0.5]);
        assert_eq!(out, vec![0.25, -0.5]);
        assert_eq!(stub.process_calls(), 1);
    }
}
