//! Configuration Replay
//!
//! Replays persisted settings onto an engine, one namespace at a time, in
//! the fixed `Namespace::ALL` order. Individual setter failures are logged
//! and do not abort the pass; each setter's own result is the only failure
//! signal.

use tracing::warn;

use crate::engine::DspEngine;
use crate::error::SetterResult;
use crate::settings::{DspSettings, Namespace, CUSTOM_CROSSFEED_MODE};

/// Replay one namespace's settings onto the engine.
pub fn apply_namespace(
    engine: &dyn DspEngine,
    settings: &DspSettings,
    namespace: Namespace,
) -> SetterResult {
    match namespace {
        Namespace::OutputControl => {
            let s = &settings.output_control;
            engine.set_output_control(s.threshold, s.release, s.post_gain)
        }
        Namespace::Compressor => {
            let s = &settings.compressor;
            engine.set_compressor(s.enabled, s.max_attack, s.max_release, s.adapt_speed)
        }
        Namespace::BassBoost => {
            let s = &settings.bass_boost;
            engine.set_bass_boost(s.enabled, s.max_gain)
        }
        Namespace::Equalizer => {
            let s = &settings.equalizer;
            engine.set_fir_equalizer(s.enabled, s.filter_type, s.interpolation_mode, &s.bands)
        }
        Namespace::GraphicEq => {
            let s = &settings.graphic_eq;
            engine.set_graphic_eq(s.enabled, &s.bands)
        }
        Namespace::Convolver => {
            let s = &settings.convolver;
            engine.set_convolver(s.enabled, &s.impulse_response, s.channels, s.frames())
        }
        Namespace::Crossfeed => {
            let s = &settings.crossfeed;
            if s.mode == CUSTOM_CROSSFEED_MODE && engine.supports_custom_crossfeed() {
                engine.set_crossfeed_custom(s.enabled, s.custom_fcut, s.custom_feed)
            } else {
                // Backends without the custom curve fall back to the plain
                // preset write; mode 99 is ignored remotely
                engine.set_crossfeed(s.enabled, s.mode)
            }
        }
        Namespace::Reverb => {
            let s = &settings.reverb;
            engine.set_reverb(s.enabled, s.preset)
        }
        Namespace::StereoWide => {
            let s = &settings.stereo_wide;
            engine.set_stereo_enhancement(s.enabled, s.level)
        }
        Namespace::Tube => {
            let s = &settings.tube;
            engine.set_vacuum_tube(s.enabled, s.level)
        }
        Namespace::Vdc => {
            let s = &settings.vdc;
            engine.set_vdc(s.enabled, &s.document)
        }
        Namespace::Liveprog => {
            let s = &settings.liveprog;
            engine.set_liveprog(s.enabled, &s.name, &s.path)
        }
    }
}

/// Replay the requested namespaces (or all, if unspecified) onto the
/// engine, sequentially, in `Namespace::ALL` order.
pub fn apply(engine: &dyn DspEngine, settings: &DspSettings, namespaces: Option<&[Namespace]>) {
    for namespace in Namespace::ALL {
        if let Some(filter) = namespaces {
            if !filter.contains(&namespace) {
                continue;
            }
        }
        if let Err(e) = apply_namespace(engine, settings, namespace) {
            warn!(?namespace, error = %e, "setter failed during configuration replay");
        }
    }
}
