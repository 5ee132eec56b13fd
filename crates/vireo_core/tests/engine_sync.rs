//! End-to-end resynchronization scenario over the out-of-process transport:
//! an engine attached to an audio session receives an unfiltered
//! preferences-updated notification and replays the full persisted
//! configuration onto a healthy instance, one namespace at a time, in the
//! fixed replay order.

use std::sync::Arc;

use parking_lot::RwLock;
use vireo_core::{
    DspSettings, Notification, NotificationHub, RemoteEngine, StubHost, SyncPhase,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_test_writer()
        .try_init();
}

#[test]
fn test_preferences_updated_replays_full_configuration() {
    init_tracing();

    let host = StubHost::new();
    let hub = NotificationHub::new();

    // A configuration with several effects active
    let mut settings = DspSettings::default();
    settings.compressor.enabled = true;
    settings.bass_boost.enabled = true;
    settings.bass_boost.max_gain = 7.0;
    settings.reverb.enabled = true;
    settings.reverb.preset = 3;
    settings.graphic_eq.enabled = true;
    let settings = Arc::new(RwLock::new(settings));

    let engine = RemoteEngine::new(
        Arc::new(host.clone()),
        5,
        0,
        Arc::clone(&settings),
        &hub,
        None,
    )
    .expect("instance creation must succeed against a healthy host");
    assert_eq!(engine.session_id(), 5);
    host.clear_writes();

    hub.broadcast(Notification::PreferencesUpdated { namespaces: None });
    engine.pump();

    // The healthy instance was kept, not recreated
    assert_eq!(host.released(), 0);
    assert_eq!(engine.phase(), SyncPhase::Idle);

    let ids: Vec<u32> = host.writes().iter().map(|w| w.id).collect();

    // Deterministic replay order: output control payload, then one
    // payload/enable pair (or lone enable flag) per namespace. Enabled
    // features write payload then flag; disabled ones write only the flag.
    assert_eq!(
        ids,
        vec![
            1500, // output control payload (always active)
            115, 1200, // compressor
            112, 1201, // bass boost
            1202, // equalizer (disabled)
            12001, 1210, // graphic EQ
            1205, // convolver (disabled)
            1208, // crossfeed (disabled)
            128, 1203, // reverb
            1204, // stereo wide (disabled)
            1206, // tube (disabled)
            1212, // vdc (disabled)
            1213, // liveprog (disabled)
        ]
    );

    // Exactly one enable-flag write per namespaced feature
    for flag in [1200, 1201, 1202, 1210, 1205, 1208, 1203, 1204, 1206, 1212, 1213] {
        assert_eq!(host.writes_for(flag).len(), 1, "flag {flag}");
    }
    assert!(engine.is_preset_initialized());
}

#[test]
fn test_settings_edit_propagates_through_notification() {
    init_tracing();

    let host = StubHost::new();
    let hub = NotificationHub::new();
    let settings = Arc::new(RwLock::new(DspSettings::default()));
    let engine = RemoteEngine::new(
        Arc::new(host.clone()),
        5,
        0,
        Arc::clone(&settings),
        &hub,
        None,
    )
    .unwrap();
    host.clear_writes();

    {
        let mut s = settings.write();
        s.bass_boost.enabled = true;
        s.bass_boost.max_gain = 9.0;
    }
    hub.broadcast(Notification::PreferencesUpdated {
        namespaces: Some(vec![vireo_core::Namespace::BassBoost]),
    });
    engine.pump();

    let writes = host.writes();
    assert_eq!(writes.len(), 2);
    assert_eq!(writes[0].id, 112);
    assert_eq!(writes[0].payload, 9i16.to_le_bytes().to_vec());
    assert_eq!(writes[1].id, 1201);
}
