//! Native Call Interface
//!
//! Defines the complete call surface the in-process backend may issue
//! against the native DSP library. Allocation and release are explicit and
//! keyed by handle value; every other call carries the handle it targets.
//!
//! Implementations are expected to be synchronous: when a call returns, the
//! native side has either applied the configuration or rejected it. Setter
//! methods report rejection as `false`, matching the native ABI, and are
//! never retried by callers.

use std::sync::Arc;

use crate::callbacks::DspCallbacks;
use crate::eel::EelVmVariable;
use crate::error::DspError;

/// Opaque identifier for a native processing context.
///
/// Valid from allocation until freed. The value `NULL_HANDLE` is reserved as
/// the closed sentinel and is never returned by a successful `alloc`.
pub type RawHandle = u64;

/// Sentinel value for a closed or never-allocated handle.
pub const NULL_HANDLE: RawHandle = 0;

/// Call interface to the native DSP engine.
///
/// The in-process backend owns exactly one allocated handle per instance and
/// routes every setter and processing call through this trait. A stub
/// implementation (`StubDsp`) stands in when the native library is absent.
pub trait NativeDsp: Send + Sync {
    /// Allocate a new processing context.
    ///
    /// Never returns `NULL_HANDLE` on success.
    fn alloc(&self, callbacks: Arc<dyn DspCallbacks>) -> Result<RawHandle, DspError>;

    /// Release a processing context. Calls against the handle after this
    /// point are undefined; `HandleGuard` exists to prevent them.
    fn free(&self, handle: RawHandle);

    /// Propagate a sample-rate change to the context.
    fn set_sampling_rate(&self, handle: RawHandle, rate: f32, force_refresh: bool) -> bool;

    // Effect configuration

    fn set_limiter(&self, handle: RawHandle, threshold: f32, release: f32) -> bool;
    fn set_post_gain(&self, handle: RawHandle, post_gain: f32) -> bool;
    fn set_compressor(
        &self,
        handle: RawHandle,
        enable: bool,
        max_attack: f32,
        max_release: f32,
        adapt_speed: f32,
    ) -> bool;
    fn set_reverb(&self, handle: RawHandle, enable: bool, preset: i32) -> bool;
    /// `mode == 99` selects the custom crossfeed curve described by
    /// `fcut`/`feed`; other modes ignore them.
    fn set_crossfeed(
        &self,
        handle: RawHandle,
        enable: bool,
        mode: i32,
        fcut: i32,
        feed: i32,
    ) -> bool;
    fn set_bass_boost(&self, handle: RawHandle, enable: bool, max_gain: f32) -> bool;
    fn set_stereo_enhancement(&self, handle: RawHandle, enable: bool, level: f32) -> bool;
    fn set_vacuum_tube(&self, handle: RawHandle, enable: bool, level: f32) -> bool;
    fn set_fir_equalizer(
        &self,
        handle: RawHandle,
        enable: bool,
        filter_type: i32,
        interpolation_mode: i32,
        bands: &[f64],
    ) -> bool;
    fn set_vdc(&self, handle: RawHandle, enable: bool, vdc: &str) -> bool;
    fn set_convolver(
        &self,
        handle: RawHandle,
        enable: bool,
        impulse_response: &[f32],
        channels: i32,
        frames: i32,
    ) -> bool;
    fn set_graphic_eq(&self, handle: RawHandle, enable: bool, bands: &str) -> bool;
    fn set_liveprog(&self, handle: RawHandle, enable: bool, name: &str, path: &str) -> bool;

    // Raw sample processing
    //
    // Buffer size and channel layout are the caller's responsibility; the
    // native side neither resamples nor reformats.

    fn process_i16(&self, handle: RawHandle, input: Vec<i16>) -> Vec<i16>;
    fn process_i32(&self, handle: RawHandle, input: Vec<i32>) -> Vec<i32>;
    fn process_f32(&self, handle: RawHandle, input: Vec<f32>) -> Vec<f32>;

    // EEL VM (liveprog) introspection

    fn enumerate_eel_variables(&self, handle: RawHandle) -> Vec<EelVmVariable>;
    fn manipulate_eel_variable(&self, handle: RawHandle, name: &str, value: f32) -> bool;
    fn freeze_liveprog_execution(&self, handle: RawHandle, freeze: bool);
}
