//! Parameter Registry
//!
//! Closed enumeration of every tunable effect feature and its out-of-process
//! wire addressing: payload parameter id, enable-flag id, payload encoding,
//! and (for the generic buffer-write parameters) the sub-key that selects
//! the logical target. The table is static and immutable; the remote backend
//! resolves every setter through it, so the protocol surface is exhaustively
//! enumerable instead of scattered magic numbers.
//!
//! Read-only status ids (pid, sample rate, commit count, buffer lengths)
//! live in `vireo_host::status` with the rest of the protocol plumbing.

/// Every tunable effect feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Feature {
    /// Output limiter threshold/release plus post gain
    OutputControl,
    Compressor,
    Reverb,
    Crossfeed,
    /// Custom crossfeed curve (cutoff/feed); in-process backend only
    CrossfeedCustom,
    BassBoost,
    StereoEnhancement,
    VacuumTube,
    FirEqualizer,
    /// Variable delay/phase compensation document
    Vdc,
    Convolver,
    GraphicEq,
    /// Scripted (liveprog) effect program
    Liveprog,
}

impl Feature {
    pub const ALL: [Feature; 13] = [
        Feature::OutputControl,
        Feature::Compressor,
        Feature::Reverb,
        Feature::Crossfeed,
        Feature::CrossfeedCustom,
        Feature::BassBoost,
        Feature::StereoEnhancement,
        Feature::VacuumTube,
        Feature::FirEqualizer,
        Feature::Vdc,
        Feature::Convolver,
        Feature::GraphicEq,
        Feature::Liveprog,
    ];
}

/// Payload shape for a feature's protocol write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadEncoding {
    /// No payload; the feature only has an enable flag (or is not
    /// addressable remotely at all)
    None,
    /// Single short scalar
    Short,
    /// Packed float array
    FloatArray,
    /// Length-prefixed text buffer (sub-keyed)
    CharBuffer,
    /// Length-prefixed impulse-response buffer with channel count (sub-keyed)
    ImpulseBuffer,
}

/// Static wire addressing for one feature.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParameterDescriptor {
    pub feature: Feature,
    pub name: &'static str,

    /// Parameter id for the payload write, if the feature carries one
    pub payload_id: Option<u32>,

    /// Parameter id for the enable-flag write; `None` for features with no
    /// discrete enable flag (output control is always active)
    pub enable_id: Option<u32>,

    pub encoding: PayloadEncoding,

    /// Sub-key for the generic buffer-write parameters
    pub sub_key: Option<u32>,
}

/// The complete registry, one entry per `Feature`, in `Feature::ALL` order.
pub const REGISTRY: [ParameterDescriptor; 13] = [
    ParameterDescriptor {
        feature: Feature::OutputControl,
        name: "output_control",
        payload_id: Some(1500),
        enable_id: None,
        encoding: PayloadEncoding::FloatArray,
        sub_key: None,
    },
    ParameterDescriptor {
        feature: Feature::Compressor,
        name: "compressor",
        payload_id: Some(115),
        enable_id: Some(1200),
        encoding: PayloadEncoding::FloatArray,
        sub_key: None,
    },
    ParameterDescriptor {
        feature: Feature::Reverb,
        name: "reverb",
        payload_id: Some(128),
        enable_id: Some(1203),
        encoding: PayloadEncoding::Short,
        sub_key: None,
    },
    ParameterDescriptor {
        feature: Feature::Crossfeed,
        name: "crossfeed",
        payload_id: Some(188),
        enable_id: Some(1208),
        encoding: PayloadEncoding::Short,
        sub_key: None,
    },
    ParameterDescriptor {
        feature: Feature::CrossfeedCustom,
        name: "crossfeed_custom",
        payload_id: None,
        enable_id: Some(1209),
        encoding: PayloadEncoding::None,
        sub_key: None,
    },
    ParameterDescriptor {
        feature: Feature::BassBoost,
        name: "bass_boost",
        payload_id: Some(112),
        enable_id: Some(1201),
        encoding: PayloadEncoding::Short,
        sub_key: None,
    },
    ParameterDescriptor {
        feature: Feature::StereoEnhancement,
        name: "stereo_enhancement",
        payload_id: Some(137),
        enable_id: Some(1204),
        encoding: PayloadEncoding::Short,
        sub_key: None,
    },
    ParameterDescriptor {
        feature: Feature::VacuumTube,
        name: "vacuum_tube",
        payload_id: Some(150),
        enable_id: Some(1206),
        encoding: PayloadEncoding::Short,
        sub_key: None,
    },
    ParameterDescriptor {
        feature: Feature::FirEqualizer,
        name: "fir_equalizer",
        payload_id: Some(116),
        enable_id: Some(1202),
        encoding: PayloadEncoding::FloatArray,
        sub_key: None,
    },
    ParameterDescriptor {
        feature: Feature::Vdc,
        name: "vdc",
        payload_id: Some(BUFFER_WRITE_TEXT),
        enable_id: Some(1212),
        encoding: PayloadEncoding::CharBuffer,
        sub_key: Some(10009),
    },
    ParameterDescriptor {
        feature: Feature::Convolver,
        name: "convolver",
        payload_id: Some(BUFFER_WRITE_IMPULSE),
        enable_id: Some(1205),
        encoding: PayloadEncoding::ImpulseBuffer,
        sub_key: Some(10004),
    },
    ParameterDescriptor {
        feature: Feature::GraphicEq,
        name: "graphic_eq",
        payload_id: Some(BUFFER_WRITE_TEXT),
        enable_id: Some(1210),
        encoding: PayloadEncoding::CharBuffer,
        sub_key: Some(10006),
    },
    ParameterDescriptor {
        feature: Feature::Liveprog,
        name: "liveprog",
        payload_id: Some(BUFFER_WRITE_TEXT),
        enable_id: Some(1213),
        encoding: PayloadEncoding::CharBuffer,
        sub_key: Some(10010),
    },
];

/// Generic buffer-write parameter id for sub-keyed text payloads
/// (VDC document, graphic EQ string, liveprog path).
pub const BUFFER_WRITE_TEXT: u32 = 12001;

/// Generic buffer-write parameter id for the sub-keyed impulse-response
/// payload (convolver).
pub const BUFFER_WRITE_IMPULSE: u32 = 12000;

/// Look up the descriptor for a feature.
pub fn descriptor(feature: Feature) -> &'static ParameterDescriptor {
    // Indexed by Feature::ALL order; the exhaustive match keeps the mapping
    // compiler-checked if a feature is added.
    let index = match feature {
        Feature::OutputControl => 0,
        Feature::Compressor => 1,
        Feature::Reverb => 2,
        Feature::Crossfeed => 3,
        Feature::CrossfeedCustom => 4,
        Feature::BassBoost => 5,
        Feature::StereoEnhancement => 6,
        Feature::VacuumTube => 7,
        Feature::FirEqualizer => 8,
        Feature::Vdc => 9,
        Feature::Convolver => 10,
        Feature::GraphicEq => 11,
        Feature::Liveprog => 12,
    };
    &REGISTRY[index]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_registry_covers_every_feature() {
        for feature in Feature::ALL {
            assert_eq!(descriptor(feature).feature, feature);
        }
        assert_eq!(REGISTRY.len(), Feature::ALL.len());
    }

    #[test]
    fn test_enable_ids_are_unique() {
        let mut seen = HashSet::new();
        for desc in &REGISTRY {
            if let Some(id) = desc.enable_id {
                assert!(seen.insert(id), "duplicate enable id {id}");
            }
        }
    }

    #[test]
    fn test_sub_keyed_features_share_buffer_ids() {
        for desc in &REGISTRY {
            match desc.encoding {
                PayloadEncoding::CharBuffer => {
                    assert_eq!(desc.payload_id, Some(BUFFER_WRITE_TEXT));
                    assert!(desc.sub_key.is_some());
                }
                PayloadEncoding::ImpulseBuffer => {
                    assert_eq!(desc.payload_id, Some(BUFFER_WRITE_IMPULSE));
                    assert!(desc.sub_key.is_some());
                }
                _ => assert!(desc.sub_key.is_none()),
            }
        }
    }

    #[test]
    fn test_sub_keys_are_unique() {
        let mut seen = HashSet::new();
        for sub_key in REGISTRY.iter().filter_map(|d| d.sub_key) {
            assert!(seen.insert(sub_key), "duplicate sub-key {sub_key}");
        }
    }

    #[test]
    fn test_output_control_has_no_enable_flag() {
        let desc = descriptor(Feature::OutputControl);
        assert!(desc.enable_id.is_none());
        assert_eq!(desc.payload_id, Some(1500));
    }

    #[test]
    fn test_custom_crossfeed_has_no_payload() {
        let desc = descriptor(Feature::CrossfeedCustom);
        assert!(desc.payload_id.is_none());
        assert_eq!(desc.encoding, PayloadEncoding::None);
    }
}
