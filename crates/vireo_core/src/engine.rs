//! Capability Engine Interface
//!
//! The contract both backends implement. The host configures the DSP
//! pipeline exclusively through this trait; whether a call becomes a direct
//! native invocation or a pair of numeric protocol writes is the backend's
//! business.
//!
//! All methods take `&self`: backends use interior mutability so `close()`
//! is safe to call from a different thread than the one that created the
//! backend.

use vireo_dsp::EelVmVariable;

use crate::error::SetterResult;

/// Polymorphic DSP engine contract over the two transports.
pub trait DspEngine: Send + Sync {
    /// Mute/unmute processing immediately.
    fn set_enabled(&self, enabled: bool) -> SetterResult;

    fn is_enabled(&self) -> bool;

    /// Current sample rate. Always answers (cached or protocol-read value),
    /// never blocks indefinitely.
    fn sample_rate(&self) -> f32;

    /// Propagate a sample-rate change. No-op on the out-of-process backend,
    /// which derives its rate from the host rather than accepting one.
    fn set_sample_rate(&self, rate: f32);

    // Per-effect configuration.
    //
    // Every setter reports delivery failure through its result; a failed
    // write is never silently dropped and never retried here.

    /// Limiter threshold (dB), limiter release (ms), post gain (dB).
    fn set_output_control(&self, threshold: f32, release: f32, post_gain: f32) -> SetterResult;

    fn set_compressor(
        &self,
        enable: bool,
        max_attack: f32,
        max_release: f32,
        adapt_speed: f32,
    ) -> SetterResult;

    fn set_reverb(&self, enable: bool, preset: i32) -> SetterResult;

    fn set_crossfeed(&self, enable: bool, mode: i32) -> SetterResult;

    /// Custom crossfeed curve (cutoff frequency, feed level). Only the
    /// in-process backend implements this; check
    /// [`supports_custom_crossfeed`](Self::supports_custom_crossfeed) first.
    fn set_crossfeed_custom(&self, enable: bool, fcut: i32, feed: i32) -> SetterResult;

    fn set_bass_boost(&self, enable: bool, max_gain: f32) -> SetterResult;

    fn set_stereo_enhancement(&self, enable: bool, level: f32) -> SetterResult;

    fn set_vacuum_tube(&self, enable: bool, level: f32) -> SetterResult;

    /// `bands` is the packed frequency/gain layout: N center frequencies
    /// followed by N gains.
    fn set_fir_equalizer(
        &self,
        enable: bool,
        filter_type: i32,
        interpolation_mode: i32,
        bands: &[f64],
    ) -> SetterResult;

    /// Variable delay compensation document (raw text).
    fn set_vdc(&self, enable: bool, vdc: &str) -> SetterResult;

    fn set_convolver(
        &self,
        enable: bool,
        impulse_response: &[f32],
        channels: i32,
        frames: i32,
    ) -> SetterResult;

    /// Graphic EQ configuration string (e.g. `"GraphicEQ: 0.0 0.0;"`).
    fn set_graphic_eq(&self, enable: bool, bands: &str) -> SetterResult;

    fn set_liveprog(&self, enable: bool, name: &str, path: &str) -> SetterResult;

    // Capability queries

    fn supports_eel_vm_access(&self) -> bool;
    fn supports_custom_crossfeed(&self) -> bool;

    // EEL VM (liveprog) access; empty/negative no-ops on backends without
    // VM introspection

    fn enumerate_eel_variables(&self) -> Vec<EelVmVariable>;
    fn manipulate_eel_variable(&self, name: &str, value: f32) -> bool;
    fn freeze_liveprog_execution(&self, freeze: bool);

    /// Release all backend-owned resources. Idempotent; safe to call from
    /// any thread.
    fn close(&self);
}
