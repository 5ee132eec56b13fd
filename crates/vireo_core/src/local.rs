//! In-Process Engine Backend
//!
//! Owns one native processing handle; every setter translates 1:1 into a
//! strongly-typed native call. Raw sample buffers pass straight through to
//! the native engine, or come back untouched when the backend is disabled
//! or closed; processing is never an error.
//!
//! Closing swaps the handle to the sentinel immediately; the native release
//! itself waits for calls already in flight (see `vireo_dsp::HandleGuard`).

use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
use std::sync::Arc;

use tracing::debug;
use vireo_dsp::{DspCallbacks, EelVmVariable, HandleGuard, NativeDsp, RawHandle};

use crate::engine::DspEngine;
use crate::error::{EngineResult, SetterError, SetterResult};
use crate::notify::{Notification, NotificationHub};

const DEFAULT_SAMPLE_RATE: f32 = 48000.0;

/// DSP backend reached by direct, synchronous native calls.
pub struct LocalEngine {
    guard: HandleGuard,
    enabled: AtomicBool,
    /// f32 bits of the last rate pushed to the native engine
    sample_rate: AtomicU32,
    hub: NotificationHub,
}

impl LocalEngine {
    /// Allocate a native processing context and wrap it.
    pub fn new(
        native: Arc<dyn NativeDsp>,
        callbacks: Arc<dyn DspCallbacks>,
        hub: NotificationHub,
    ) -> EngineResult<Self> {
        let handle = native.alloc(callbacks)?;
        debug!(handle, "local engine allocated");
        Ok(Self {
            guard: HandleGuard::new(native, handle),
            enabled: AtomicBool::new(true),
            sample_rate: AtomicU32::new(DEFAULT_SAMPLE_RATE.to_bits()),
            hub,
        })
    }

    fn call(
        &self,
        name: &'static str,
        f: impl FnOnce(&dyn NativeDsp, RawHandle) -> bool,
    ) -> SetterResult {
        let active = self.guard.enter().ok_or(SetterError::InstanceUnavailable)?;
        if f(self.guard.native().as_ref(), active.handle()) {
            Ok(())
        } else {
            Err(SetterError::NativeRejected { call: name })
        }
    }

    /// Process a buffer of 16-bit integer samples.
    ///
    /// Returns the input unmodified when the backend is disabled or closed.
    pub fn process_i16(&self, input: Vec<i16>) -> Vec<i16> {
        if !self.is_enabled() {
            return input;
        }
        match self.guard.enter() {
            Some(active) => self.guard.native().process_i16(active.handle(), input),
            None => input,
        }
    }

    /// Process a buffer of 32-bit integer samples.
    pub fn process_i32(&self, input: Vec<i32>) -> Vec<i32> {
        if !self.is_enabled() {
            return input;
        }
        match self.guard.enter() {
            Some(active) => self.guard.native().process_i32(active.handle(), input),
            None => input,
        }
    }

    /// Process a buffer of floating-point samples.
    pub fn process_f32(&self, input: Vec<f32>) -> Vec<f32> {
        if !self.is_enabled() {
            return input;
        }
        match self.guard.enter() {
            Some(active) => self.guard.native().process_f32(active.handle(), input),
            None => input,
        }
    }
}

impl DspEngine for LocalEngine {
    fn set_enabled(&self, enabled: bool) -> SetterResult {
        self.enabled.store(enabled, Ordering::SeqCst);
        Ok(())
    }

    fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    fn sample_rate(&self) -> f32 {
        f32::from_bits(self.sample_rate.load(Ordering::SeqCst))
    }

    fn set_sample_rate(&self, rate: f32) {
        self.sample_rate.store(rate.to_bits(), Ordering::SeqCst);
        let _ = self.call("set_sampling_rate", |n, h| {
            n.set_sampling_rate(h, rate, false)
        });
        // Rate-dependent features on the remote path (the convolver) must
        // resync against the new rate
        self.hub.broadcast(Notification::SampleRateUpdated);
    }

    fn set_output_control(&self, threshold: f32, release: f32, post_gain: f32) -> SetterResult {
        let limiter = self.call("set_limiter", |n, h| n.set_limiter(h, threshold, release));
        let gain = self.call("set_post_gain", |n, h| n.set_post_gain(h, post_gain));
        limiter.and(gain)
    }

    fn set_compressor(
        &self,
        enable: bool,
        max_attack: f32,
        max_release: f32,
        adapt_speed: f32,
    ) -> SetterResult {
        self.call("set_compressor", |n, h| {
            n.set_compressor(h, enable, max_attack, max_release, adapt_speed)
        })
    }

    fn set_reverb(&self, enable: bool, preset: i32) -> SetterResult {
        self.call("set_reverb", |n, h| n.set_reverb(h, enable, preset))
    }

    fn set_crossfeed(&self, enable: bool, mode: i32) -> SetterResult {
        self.call("set_crossfeed", |n, h| {
            n.set_crossfeed(h, enable, mode, 0, 0)
        })
    }

    fn set_crossfeed_custom(&self, enable: bool, fcut: i32, feed: i32) -> SetterResult {
        self.call("set_crossfeed", |n, h| {
            n.set_crossfeed(h, enable, crate::settings::CUSTOM_CROSSFEED_MODE, fcut, feed)
        })
    }

    fn set_bass_boost(&self, enable: bool, max_gain: f32) -> SetterResult {
        self.call("set_bass_boost", |n, h| n.set_bass_boost(h, enable, max_gain))
    }

    fn set_stereo_enhancement(&self, enable: bool, level: f32) -> SetterResult {
        self.call("set_stereo_enhancement", |n, h| {
            n.set_stereo_enhancement(h, enable, level)
        })
    }

    fn set_vacuum_tube(&self, enable: bool, level: f32) -> SetterResult {
        self.call("set_vacuum_tube", |n, h| n.set_vacuum_tube(h, enable, level))
    }

    fn set_fir_equalizer(
        &self,
        enable: bool,
        filter_type: i32,
        interpolation_mode: i32,
        bands: &[f64],
    ) -> SetterResult {
        self.call("set_fir_equalizer", |n, h| {
            n.set_fir_equalizer(h, enable, filter_type, interpolation_mode, bands)
        })
    }

    fn set_vdc(&self, enable: bool, vdc: &str) -> SetterResult {
        self.call("set_vdc", |n, h| n.set_vdc(h, enable, vdc))
    }

    fn set_convolver(
        &self,
        enable: bool,
        impulse_response: &[f32],
        channels: i32,
        frames: i32,
    ) -> SetterResult {
        self.call("set_convolver", |n, h| {
            n.set_convolver(h, enable, impulse_response, channels, frames)
        })
    }

    fn set_graphic_eq(&self, enable: bool, bands: &str) -> SetterResult {
        self.call("set_graphic_eq", |n, h| n.set_graphic_eq(h, enable, bands))
    }

    fn set_liveprog(&self, enable: bool, name: &str, path: &str) -> SetterResult {
        self.call("set_liveprog", |n, h| n.set_liveprog(h, enable, name, path))
    }

    fn supports_eel_vm_access(&self) -> bool {
        true
    }

    fn supports_custom_crossfeed(&self) -> bool {
        true
    }

    fn enumerate_eel_variables(&self) -> Vec<EelVmVariable> {
        match self.guard.enter() {
            Some(active) => self
                .guard
                .native()
                .enumerate_eel_variables(active.handle()),
            None => Vec::new(),
        }
    }

    fn manipulate_eel_variable(&self, name: &str, value: f32) -> bool {
        match self.guard.enter() {
            Some(active) => self
                .guard
                .native()
                .manipulate_eel_variable(active.handle(), name, value),
            None => false,
        }
    }

    fn freeze_liveprog_execution(&self, freeze: bool) {
        if let Some(active) = self.guard.enter() {
            self.guard
                .native()
                .freeze_liveprog_execution(active.handle(), freeze);
        }
    }

    fn close(&self) {
        self.guard.close();
    }
}
