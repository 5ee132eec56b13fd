//! Out-of-Process Engine Backend
//!
//! Drives a session-scoped effect instance through the numeric parameter
//! protocol. Setters marshal into one or two protocol writes resolved
//! through the parameter registry: the payload write happens only when the
//! feature is being enabled, the enable-flag write happens always, in that
//! order. A payload failure wins over a successful enable write.
//!
//! The instance can die at any time (the remote engine crashes or detaches
//! from the audio session), so every resynchronization pass starts with a
//! health check over the status parameters. An unhealthy instance is
//! released wholesale and recreated, never repaired in place; the fresh
//! instance then receives a full configuration replay. Recovery is attempted
//! once per trigger.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU8, Ordering};
use std::sync::Arc;

use crossbeam_channel::Sender;
use parking_lot::{Mutex, RwLock};
use tracing::{debug, error, info, warn};
use vireo_dsp::EelVmVariable;
use vireo_host::{codec, status, EffectHost, RemoteEffect};

use crate::engine::DspEngine;
use crate::error::{EngineResult, SetterError, SetterResult};
use crate::event::{EngineEvent, RebootReason};
use crate::notify::{Notification, NotificationHub, Subscription};
use crate::registry::{descriptor, Feature};
use crate::settings::{DspSettings, Namespace};
use crate::sync;

/// Observable phase of the resynchronization state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SyncPhase {
    Idle = 0,
    /// Reading status parameters to decide between Applying and Recovering
    Checking = 1,
    /// Replaying persisted settings onto the instance
    Applying = 2,
    /// Releasing and recreating the instance
    Recovering = 3,
}

impl SyncPhase {
    fn from_u8(value: u8) -> SyncPhase {
        match value {
            1 => SyncPhase::Checking,
            2 => SyncPhase::Applying,
            3 => SyncPhase::Recovering,
            _ => SyncPhase::Idle,
        }
    }
}

/// Snapshot of the status parameters a health check reads. Recomputed per
/// resync pass, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthStatus {
    pub pid: i32,
    pub sample_rate: f32,
}

impl HealthStatus {
    pub fn is_alive(&self) -> bool {
        self.pid > 0 && self.sample_rate > 0.0
    }

    fn reboot_reason(&self) -> Option<RebootReason> {
        if self.pid <= 0 {
            Some(RebootReason::InvalidPid { pid: self.pid })
        } else if self.sample_rate <= 0.0 {
            Some(RebootReason::AbnormalSampleRate {
                sample_rate: self.sample_rate,
            })
        } else {
            None
        }
    }
}

/// DSP backend reached through the out-of-process parameter protocol.
pub struct RemoteEngine {
    host: Arc<dyn EffectHost>,
    session_id: i32,
    priority: i32,
    /// `None` after close or while a failed recovery leaves us detached
    effect: Mutex<Option<Box<dyn RemoteEffect>>>,
    settings: Arc<RwLock<DspSettings>>,
    subscription: Mutex<Option<Subscription>>,
    events: Option<Sender<EngineEvent>>,
    /// Desired processing state, re-applied to a recovered instance
    enabled: AtomicBool,
    phase: AtomicU8,
    /// Single-flight guard: overlapping triggers serialize here so two
    /// Applying passes can never interleave their writes
    sync_guard: Mutex<()>,
    /// f32 bits of the last good sample-rate read; 0 when unknown
    cached_sample_rate: AtomicU32,
}

impl RemoteEngine {
    /// Create the effect instance and perform the initial full
    /// configuration replay. Instance creation failure is fatal.
    pub fn new(
        host: Arc<dyn EffectHost>,
        session_id: i32,
        priority: i32,
        settings: Arc<RwLock<DspSettings>>,
        hub: &NotificationHub,
        events: Option<Sender<EngineEvent>>,
    ) -> EngineResult<Self> {
        let mut effect = host.create_effect(session_id, priority)?;
        effect.set_enabled(true)?;
        info!(
            session_id,
            priority,
            host = host.name(),
            token = effect.token(),
            "remote engine attached"
        );

        let engine = Self {
            host,
            session_id,
            priority,
            effect: Mutex::new(Some(effect)),
            settings,
            subscription: Mutex::new(Some(hub.subscribe())),
            events,
            enabled: AtomicBool::new(true),
            phase: AtomicU8::new(SyncPhase::Idle as u8),
            sync_guard: Mutex::new(()),
            cached_sample_rate: AtomicU32::new(0),
        };
        engine.sync(None);
        Ok(engine)
    }

    pub fn session_id(&self) -> i32 {
        self.session_id
    }

    /// Current state-machine phase.
    pub fn phase(&self) -> SyncPhase {
        SyncPhase::from_u8(self.phase.load(Ordering::SeqCst))
    }

    fn set_phase(&self, phase: SyncPhase) {
        self.phase.store(phase as u8, Ordering::SeqCst);
    }

    /// Drain pending notifications and run the resync passes they request.
    ///
    /// This is the only pathway into the state machine; the host calls it
    /// cooperatively, there are no internal threads.
    pub fn pump(&self) {
        loop {
            let notification = {
                let guard = self.subscription.lock();
                guard.as_ref().and_then(|sub| sub.try_recv())
            };
            let Some(notification) = notification else {
                break;
            };
            debug!(?notification, "remote engine notification");
            match notification {
                Notification::PreferencesUpdated { namespaces } => {
                    self.sync(namespaces.as_deref())
                }
                Notification::SampleRateUpdated => self.sync(Some(&[Namespace::Convolver])),
                Notification::LiveprogReload => self.sync(Some(&[Namespace::Liveprog])),
                Notification::SoftReboot => {
                    self.cached_sample_rate.store(0, Ordering::SeqCst);
                    self.sync(None);
                }
                Notification::HardReboot => self.reboot(),
            }
        }
    }

    /// Run one resynchronization pass: health check, then either replay the
    /// requested namespaces or recover the instance and replay everything.
    pub fn sync(&self, namespaces: Option<&[Namespace]>) {
        let _flight = self.sync_guard.lock();

        self.set_phase(SyncPhase::Checking);
        let health = self.health();
        if let Some(reason) = health.reboot_reason() {
            warn!(?health, ?reason, "instance unhealthy, recovering");
            if !self.recover(reason) {
                self.set_phase(SyncPhase::Idle);
                return;
            }
            // Fresh instance starts from nothing; the requested subset is
            // superseded by a full replay
            self.apply(None);
            self.set_phase(SyncPhase::Idle);
            return;
        }

        self.apply(namespaces);
        self.set_phase(SyncPhase::Idle);
    }

    /// Forced teardown and recreation, bypassing the health check, followed
    /// by a full replay.
    fn reboot(&self) {
        let _flight = self.sync_guard.lock();
        self.set_phase(SyncPhase::Checking);
        if self.recover(RebootReason::Requested) {
            self.apply(None);
        }
        self.set_phase(SyncPhase::Idle);
    }

    fn apply(&self, namespaces: Option<&[Namespace]>) {
        self.set_phase(SyncPhase::Applying);
        let settings = self.settings.read().clone();
        sync::apply(self, &settings, namespaces);
    }

    /// Release the instance and create a replacement. Returns false when
    /// creation fails; the cycle is abandoned until the next trigger, no
    /// retry loop.
    fn recover(&self, reason: RebootReason) -> bool {
        self.set_phase(SyncPhase::Recovering);
        self.cached_sample_rate.store(0, Ordering::SeqCst);

        let mut guard = self.effect.lock();
        // Dropping the old instance releases it host-side
        *guard = None;

        match self.host.create_effect(self.session_id, self.priority) {
            Ok(mut effect) => {
                let token = effect.token();
                if let Err(e) = effect.set_enabled(self.enabled.load(Ordering::SeqCst)) {
                    warn!(error = %e, "could not restore enabled state on recovered instance");
                }
                *guard = Some(effect);
                drop(guard);
                info!(?reason, token, "instance recovered");
                self.emit(EngineEvent::Rebooted {
                    reason,
                    recovered: true,
                });
                true
            }
            Err(e) => {
                drop(guard);
                error!(?reason, error = %e, "recovery failed, abandoning resync cycle");
                self.emit(EngineEvent::Rebooted {
                    reason,
                    recovered: false,
                });
                false
            }
        }
    }

    fn emit(&self, event: EngineEvent) {
        if let Some(events) = &self.events {
            let _ = events.send(event);
        }
    }

    /// Read the status parameters the health check depends on.
    pub fn health(&self) -> HealthStatus {
        HealthStatus {
            pid: self.read_status(status::PROCESS_ID).unwrap_or(-1),
            sample_rate: self
                .read_status(status::SAMPLE_RATE)
                .map(|r| r as f32)
                .unwrap_or(0.0),
        }
    }

    fn read_status(&self, id: u32) -> Option<i32> {
        self.effect.lock().as_ref()?.get_parameter_int(id)
    }

    /// Process id of the remote engine; -1 when unknown.
    pub fn pid(&self) -> i32 {
        self.read_status(status::PROCESS_ID).unwrap_or(-1)
    }

    /// Number of parameter commits the instance has accepted; -1 when
    /// unknown.
    pub fn param_commit_count(&self) -> i32 {
        self.read_status(status::COMMITTED_PARAM_COUNT).unwrap_or(-1)
    }

    /// Whether any configuration has reached the instance yet.
    pub fn is_preset_initialized(&self) -> bool {
        self.param_commit_count() > 0
    }

    pub fn buffer_length(&self) -> i32 {
        self.read_status(status::BUFFER_LENGTH).unwrap_or(-1)
    }

    pub fn allocated_block_length(&self) -> i32 {
        self.read_status(status::ALLOCATED_BLOCK_LENGTH).unwrap_or(-1)
    }

    /// Marshal one feature write: payload (only when enabling), then the
    /// enable flag. The payload result wins when both fail or only the
    /// payload fails; the enable write is attempted regardless.
    fn write_feature(
        &self,
        feature: Feature,
        enable: bool,
        payload: Option<Vec<u8>>,
    ) -> SetterResult {
        let desc = descriptor(feature);
        let mut guard = self.effect.lock();
        let effect = guard.as_mut().ok_or(SetterError::InstanceUnavailable)?;

        let mut result = Ok(());
        if enable {
            if let (Some(id), Some(payload)) = (desc.payload_id, payload.as_ref()) {
                result = effect
                    .set_parameter(id, payload)
                    .map_err(SetterError::from);
            }
        }
        if let Some(enable_id) = desc.enable_id {
            let enable_result = effect
                .set_parameter(enable_id, &codec::encode_bool(enable))
                .map_err(SetterError::from);
            if result.is_ok() {
                result = enable_result;
            }
        }
        if let Err(e) = &result {
            warn!(feature = desc.name, error = %e, "feature write failed");
        }
        result
    }

    fn text_payload(feature: Feature, text: &str) -> Vec<u8> {
        let desc = descriptor(feature);
        codec::encode_char_buffer(desc.sub_key.unwrap_or(0), text)
    }
}

impl DspEngine for RemoteEngine {
    fn set_enabled(&self, enabled: bool) -> SetterResult {
        self.enabled.store(enabled, Ordering::SeqCst);
        let mut guard = self.effect.lock();
        let effect = guard.as_mut().ok_or(SetterError::InstanceUnavailable)?;
        effect.set_enabled(enabled).map_err(SetterError::from)
    }

    fn is_enabled(&self) -> bool {
        self.effect
            .lock()
            .as_ref()
            .map(|e| e.is_enabled())
            .unwrap_or(false)
    }

    fn sample_rate(&self) -> f32 {
        match self.read_status(status::SAMPLE_RATE) {
            Some(rate) if rate > 0 => {
                let rate = rate as f32;
                self.cached_sample_rate
                    .store(rate.to_bits(), Ordering::SeqCst);
                rate
            }
            _ => f32::from_bits(self.cached_sample_rate.load(Ordering::SeqCst)),
        }
    }

    fn set_sample_rate(&self, rate: f32) {
        // The remote engine derives its rate from the host audio session
        debug!(rate, "sample-rate push ignored on remote backend");
    }

    fn set_output_control(&self, threshold: f32, release: f32, post_gain: f32) -> SetterResult {
        let payload = codec::encode_float_array(&[threshold, release, post_gain]);
        self.write_feature(Feature::OutputControl, true, Some(payload))
    }

    fn set_compressor(
        &self,
        enable: bool,
        max_attack: f32,
        max_release: f32,
        adapt_speed: f32,
    ) -> SetterResult {
        let payload = codec::encode_float_array(&[max_attack, max_release, adapt_speed]);
        self.write_feature(Feature::Compressor, enable, Some(payload))
    }

    fn set_reverb(&self, enable: bool, preset: i32) -> SetterResult {
        let payload = codec::encode_short(preset as i16);
        self.write_feature(Feature::Reverb, enable, Some(payload))
    }

    fn set_crossfeed(&self, enable: bool, mode: i32) -> SetterResult {
        let payload = codec::encode_short(mode as i16);
        self.write_feature(Feature::Crossfeed, enable, Some(payload))
    }

    fn set_crossfeed_custom(&self, _enable: bool, _fcut: i32, _feed: i32) -> SetterResult {
        // Refused before any write reaches the wire
        Err(SetterError::Unsupported("custom crossfeed"))
    }

    fn set_bass_boost(&self, enable: bool, max_gain: f32) -> SetterResult {
        let payload = codec::encode_short(max_gain.round() as i16);
        self.write_feature(Feature::BassBoost, enable, Some(payload))
    }

    fn set_stereo_enhancement(&self, enable: bool, level: f32) -> SetterResult {
        let payload = codec::encode_short(level.round() as i16);
        self.write_feature(Feature::StereoEnhancement, enable, Some(payload))
    }

    fn set_vacuum_tube(&self, enable: bool, level: f32) -> SetterResult {
        // Drive level travels as thousandths
        let payload = codec::encode_short((level * 1000.0).round() as i16);
        self.write_feature(Feature::VacuumTube, enable, Some(payload))
    }

    fn set_fir_equalizer(
        &self,
        enable: bool,
        filter_type: i32,
        interpolation_mode: i32,
        bands: &[f64],
    ) -> SetterResult {
        let mut values = Vec::with_capacity(bands.len() + 2);
        values.push(if filter_type == 1 { 1.0 } else { -1.0 });
        values.push(if interpolation_mode == 1 { 1.0 } else { -1.0 });
        values.extend(bands.iter().map(|b| *b as f32));
        let payload = codec::encode_float_array(&values);
        self.write_feature(Feature::FirEqualizer, enable, Some(payload))
    }

    fn set_vdc(&self, enable: bool, vdc: &str) -> SetterResult {
        let payload = Self::text_payload(Feature::Vdc, vdc);
        self.write_feature(Feature::Vdc, enable, Some(payload))
    }

    fn set_convolver(
        &self,
        enable: bool,
        impulse_response: &[f32],
        channels: i32,
        _frames: i32,
    ) -> SetterResult {
        let desc = descriptor(Feature::Convolver);
        let payload =
            codec::encode_impulse_buffer(desc.sub_key.unwrap_or(0), impulse_response, channels);
        self.write_feature(Feature::Convolver, enable, Some(payload))
    }

    fn set_graphic_eq(&self, enable: bool, bands: &str) -> SetterResult {
        let payload = Self::text_payload(Feature::GraphicEq, bands);
        self.write_feature(Feature::GraphicEq, enable, Some(payload))
    }

    fn set_liveprog(&self, enable: bool, _name: &str, path: &str) -> SetterResult {
        let payload = Self::text_payload(Feature::Liveprog, path);
        self.write_feature(Feature::Liveprog, enable, Some(payload))
    }

    fn supports_eel_vm_access(&self) -> bool {
        false
    }

    fn supports_custom_crossfeed(&self) -> bool {
        false
    }

    fn enumerate_eel_variables(&self) -> Vec<EelVmVariable> {
        Vec::new()
    }

    fn manipulate_eel_variable(&self, _name: &str, _value: f32) -> bool {
        false
    }

    fn freeze_liveprog_execution(&self, _freeze: bool) {
        debug!("liveprog freeze ignored on remote backend");
    }

    fn close(&self) {
        // Drop the subscription first so no further notification can start
        // a pass against a released instance
        *self.subscription.lock() = None;
        let released = self.effect.lock().take();
        if released.is_some() {
            info!(session_id = self.session_id, "remote engine detached");
        }
        self.set_phase(SyncPhase::Idle);
    }
}

impl Drop for RemoteEngine {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::{unbounded, Receiver};
    use vireo_host::StubHost;

    /// Enable-flag ids in `Namespace::ALL` replay order, preceded by the
    /// always-on output-control payload id.
    const FULL_REPLAY_IDS: [u32; 12] = [
        1500, 1200, 1201, 1202, 1210, 1205, 1208, 1203, 1204, 1206, 1212, 1213,
    ];

    struct Fixture {
        host: StubHost,
        hub: NotificationHub,
        settings: Arc<RwLock<DspSettings>>,
        events: Receiver<EngineEvent>,
        engine: RemoteEngine,
    }

    fn fixture() -> Fixture {
        let host = StubHost::new();
        let hub = NotificationHub::new();
        let settings = Arc::new(RwLock::new(DspSettings::default()));
        let (tx, rx) = unbounded();
        let engine = RemoteEngine::new(
            Arc::new(host.clone()),
            5,
            0,
            Arc::clone(&settings),
            &hub,
            Some(tx),
        )
        .unwrap();
        Fixture {
            host,
            hub,
            settings,
            events: rx,
            engine,
        }
    }

    #[test]
    fn test_construction_failure_is_fatal() {
        let host = StubHost::new();
        host.fail_creates(true);
        let hub = NotificationHub::new();
        let result = RemoteEngine::new(
            Arc::new(host),
            5,
            0,
            Arc::new(RwLock::new(DspSettings::default())),
            &hub,
            None,
        );
        assert!(matches!(
            result,
            Err(crate::error::EngineError::Construction(_))
        ));
    }

    #[test]
    fn test_initial_sync_replays_every_namespace_once() {
        let f = fixture();
        let ids: Vec<u32> = f.host.writes().iter().map(|w| w.id).collect();
        assert_eq!(ids, FULL_REPLAY_IDS);
        assert!(f.engine.is_preset_initialized());
        assert_eq!(f.engine.phase(), SyncPhase::Idle);
    }

    #[test]
    fn test_disable_writes_only_the_enable_flag() {
        let f = fixture();
        f.host.clear_writes();

        f.engine.set_reverb(false, 5).unwrap();

        let writes = f.host.writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].id, 1203);
        assert_eq!(writes[0].payload, codec::encode_bool(false));
    }

    #[test]
    fn test_enable_writes_payload_then_flag() {
        let f = fixture();
        f.host.clear_writes();

        f.engine.set_reverb(true, 5).unwrap();

        let writes = f.host.writes();
        assert_eq!(writes.len(), 2);
        assert_eq!(writes[0].id, 128);
        assert_eq!(writes[0].payload, codec::encode_short(5));
        assert_eq!(writes[1].id, 1203);
        assert_eq!(writes[1].payload, codec::encode_bool(true));
    }

    #[test]
    fn test_payload_failure_wins_but_enable_flag_still_written() {
        let f = fixture();
        f.host.clear_writes();
        f.host.reject_writes_to(128);

        let err = f.engine.set_reverb(true, 3).unwrap_err();
        assert_eq!(err, SetterError::WriteRejected { id: 128 });

        // The enable flag was still attempted after the payload failed
        assert_eq!(f.host.writes_for(1203).len(), 1);
    }

    #[test]
    fn test_enable_flag_failure_reported_on_its_own() {
        let f = fixture();
        f.host.clear_writes();
        f.host.reject_writes_to(1203);

        let err = f.engine.set_reverb(true, 3).unwrap_err();
        assert_eq!(err, SetterError::WriteRejected { id: 1203 });
        // Payload went through
        assert_eq!(f.host.writes_for(128).len(), 1);
    }

    #[test]
    fn test_custom_crossfeed_refused_without_writing() {
        let f = fixture();
        f.host.clear_writes();

        let err = f.engine.set_crossfeed_custom(true, 700, 45).unwrap_err();
        assert_eq!(err, SetterError::Unsupported("custom crossfeed"));
        assert!(f.host.writes().is_empty());
        assert!(!f.engine.supports_custom_crossfeed());
    }

    #[test]
    fn test_vacuum_tube_level_scaled_to_thousandths() {
        let f = fixture();
        f.host.clear_writes();

        f.engine.set_vacuum_tube(true, 0.5).unwrap();
        assert_eq!(f.host.writes_for(150)[0].payload, codec::encode_short(500));
    }

    #[test]
    fn test_fir_equalizer_payload_layout() {
        let f = fixture();
        f.host.clear_writes();

        f.engine.set_fir_equalizer(true, 0, 1, &[440.0, 2.5]).unwrap();

        let payload = &f.host.writes_for(116)[0].payload;
        assert_eq!(payload.len(), 16);
        assert_eq!(&payload[0..4], &(-1.0f32).to_le_bytes());
        assert_eq!(&payload[4..8], &1.0f32.to_le_bytes());
        assert_eq!(&payload[8..12], &440.0f32.to_le_bytes());
    }

    #[test]
    fn test_graphic_eq_payload_carries_sub_key() {
        let f = fixture();
        f.host.clear_writes();

        f.engine.set_graphic_eq(true, "GraphicEQ: 0.0 0.0;").unwrap();

        let writes = f.host.writes_for(12001);
        assert_eq!(writes.len(), 1);
        assert_eq!(&writes[0].payload[0..4], &10006i32.to_le_bytes());
    }

    #[test]
    fn test_recovery_on_invalid_pid() {
        let f = fixture();
        let first_token = f.host.writes()[0].token;
        f.host.clear_writes();
        f.host.set_pid(-1);

        f.hub.broadcast(Notification::PreferencesUpdated { namespaces: None });
        f.engine.pump();

        // Old instance released, replacement fully replayed under a new token
        assert_eq!(f.host.released(), 1);
        let writes = f.host.writes();
        let ids: Vec<u32> = writes.iter().map(|w| w.id).collect();
        assert_eq!(ids, FULL_REPLAY_IDS);
        assert!(writes.iter().all(|w| w.token != first_token));

        match f.events.try_recv().unwrap() {
            EngineEvent::Rebooted { reason, recovered } => {
                assert_eq!(reason, RebootReason::InvalidPid { pid: -1 });
                assert!(recovered);
            }
            other => panic!("unexpected: {other:?}"),
        }
        assert_eq!(f.engine.phase(), SyncPhase::Idle);
    }

    #[test]
    fn test_recovery_on_abnormal_sample_rate() {
        let f = fixture();
        f.host.set_sample_rate(0);

        f.engine.sync(None);

        match f.events.try_recv().unwrap() {
            EngineEvent::Rebooted { reason, recovered } => {
                assert_eq!(
                    reason,
                    RebootReason::AbnormalSampleRate { sample_rate: 0.0 }
                );
                assert!(recovered);
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_failed_recovery_abandons_the_cycle() {
        let f = fixture();
        f.host.clear_writes();
        f.host.set_pid(-1);
        f.host.fail_creates(true);

        f.engine.sync(None);

        match f.events.try_recv().unwrap() {
            EngineEvent::Rebooted { recovered, .. } => assert!(!recovered),
            other => panic!("unexpected: {other:?}"),
        }
        // No replay happened and the backend reports unavailable until the
        // next trigger
        assert!(f.host.writes().is_empty());
        assert_eq!(f.engine.phase(), SyncPhase::Idle);
        assert_eq!(
            f.engine.set_reverb(true, 1).unwrap_err(),
            SetterError::InstanceUnavailable
        );
    }

    #[test]
    fn test_hard_reboot_recreates_a_healthy_instance() {
        let f = fixture();
        f.host.clear_writes();

        f.hub.broadcast(Notification::HardReboot);
        f.engine.pump();

        assert_eq!(f.host.released(), 1);
        match f.events.try_recv().unwrap() {
            EngineEvent::Rebooted { reason, recovered } => {
                assert_eq!(reason, RebootReason::Requested);
                assert!(recovered);
            }
            other => panic!("unexpected: {other:?}"),
        }
        let ids: Vec<u32> = f.host.writes().iter().map(|w| w.id).collect();
        assert_eq!(ids, FULL_REPLAY_IDS);
    }

    #[test]
    fn test_sample_rate_notification_resyncs_convolver_only() {
        let f = fixture();
        f.host.clear_writes();

        f.hub.broadcast(Notification::SampleRateUpdated);
        f.engine.pump();

        let ids: Vec<u32> = f.host.writes().iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![1205]);
    }

    #[test]
    fn test_liveprog_reload_resyncs_liveprog_only() {
        let f = fixture();
        f.host.clear_writes();

        f.hub.broadcast(Notification::LiveprogReload);
        f.engine.pump();

        let ids: Vec<u32> = f.host.writes().iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![1213]);
    }

    #[test]
    fn test_namespace_filtered_preferences_update() {
        let f = fixture();
        f.settings.write().reverb.enabled = true;
        f.settings.write().reverb.preset = 4;
        f.host.clear_writes();

        f.hub.broadcast(Notification::PreferencesUpdated {
            namespaces: Some(vec![Namespace::Reverb]),
        });
        f.engine.pump();

        let ids: Vec<u32> = f.host.writes().iter().map(|w| w.id).collect();
        assert_eq!(ids, vec![128, 1203]);
    }

    #[test]
    fn test_sample_rate_cached_across_detach() {
        let f = fixture();
        assert_eq!(f.engine.sample_rate(), 48000.0);

        f.engine.close();
        // Status reads are gone; the cached value still answers
        assert_eq!(f.engine.sample_rate(), 48000.0);
    }

    #[test]
    fn test_status_reads() {
        let f = fixture();
        assert_eq!(f.engine.pid(), 4242);
        assert_eq!(f.engine.buffer_length(), 960);
        assert_eq!(f.engine.allocated_block_length(), 1024);
        assert!(f.engine.health().is_alive());
    }

    #[test]
    fn test_close_releases_and_unsubscribes() {
        let f = fixture();
        assert_eq!(f.hub.subscriber_count(), 1);

        f.engine.close();

        assert_eq!(f.host.released(), 1);
        assert_eq!(f.hub.subscriber_count(), 0);
        assert_eq!(
            f.engine.set_reverb(true, 1).unwrap_err(),
            SetterError::InstanceUnavailable
        );
        assert_eq!(f.engine.pid(), -1);
    }
}
