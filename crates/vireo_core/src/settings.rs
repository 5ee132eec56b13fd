//! Persisted DSP Preferences
//!
//! The configuration set the engines replay on resynchronization. Stored as
//! JSON under the platform config directory:
//! - Linux: `~/.config/vireo/settings.json`
//! - Windows: `%APPDATA%\vireo\settings.json`
//! - macOS: `~/Library/Application Support/vireo/settings.json`

use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{error, info, warn};

/// Configuration namespaces, one per effect stage.
///
/// `Namespace::ALL` fixes the deterministic order in which a
/// resynchronization pass replays configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Namespace {
    #[serde(rename = "dsp_output_control")]
    OutputControl,
    #[serde(rename = "dsp_compressor")]
    Compressor,
    #[serde(rename = "dsp_bass")]
    BassBoost,
    #[serde(rename = "dsp_equalizer")]
    Equalizer,
    #[serde(rename = "dsp_graphiceq")]
    GraphicEq,
    #[serde(rename = "dsp_convolver")]
    Convolver,
    #[serde(rename = "dsp_crossfeed")]
    Crossfeed,
    #[serde(rename = "dsp_reverb")]
    Reverb,
    #[serde(rename = "dsp_stereowide")]
    StereoWide,
    #[serde(rename = "dsp_tube")]
    Tube,
    #[serde(rename = "dsp_ddc")]
    Vdc,
    #[serde(rename = "dsp_liveprog")]
    Liveprog,
}

impl Namespace {
    /// Replay order for resynchronization.
    pub const ALL: [Namespace; 12] = [
        Namespace::OutputControl,
        Namespace::Compressor,
        Namespace::BassBoost,
        Namespace::Equalizer,
        Namespace::GraphicEq,
        Namespace::Convolver,
        Namespace::Crossfeed,
        Namespace::Reverb,
        Namespace::StereoWide,
        Namespace::Tube,
        Namespace::Vdc,
        Namespace::Liveprog,
    ];
}

/// Crossfeed mode value selecting the custom cutoff/feed curve.
pub const CUSTOM_CROSSFEED_MODE: i32 = 99;

/// Default FIR equalizer layout: 15 center frequencies followed by 15 gains.
pub const DEFAULT_EQ_BANDS: [f64; 30] = [
    25.0, 40.0, 63.0, 100.0, 160.0, 250.0, 400.0, 630.0, 1000.0, 1600.0, 2500.0, 4000.0, 6300.0,
    10000.0, 16000.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0,
];

/// Default graphic EQ configuration string.
pub const DEFAULT_GRAPHIC_EQ: &str = "GraphicEQ: 0.0 0.0;";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputControlSettings {
    /// Limiter threshold in dB
    pub threshold: f32,
    /// Limiter release in ms
    pub release: f32,
    /// Post gain in dB
    pub post_gain: f32,
}

impl Default for OutputControlSettings {
    fn default() -> Self {
        Self {
            threshold: -0.1,
            release: 60.0,
            post_gain: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressorSettings {
    pub enabled: bool,
    pub max_attack: f32,
    pub max_release: f32,
    pub adapt_speed: f32,
}

impl Default for CompressorSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            max_attack: 120.0,
            max_release: 200.0,
            adapt_speed: 800.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BassBoostSettings {
    pub enabled: bool,
    /// Maximum boost in dB
    pub max_gain: f32,
}

impl Default for BassBoostSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            max_gain: 5.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EqualizerSettings {
    pub enabled: bool,
    /// 0 = minimum phase, 1 = linear phase
    pub filter_type: i32,
    /// 0 = spline, 1 = linear interpolation
    pub interpolation_mode: i32,
    /// Packed frequency/gain layout (see `DEFAULT_EQ_BANDS`)
    pub bands: Vec<f64>,
}

impl Default for EqualizerSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            filter_type: 0,
            interpolation_mode: 0,
            bands: DEFAULT_EQ_BANDS.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphicEqSettings {
    pub enabled: bool,
    pub bands: String,
}

impl Default for GraphicEqSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            bands: DEFAULT_GRAPHIC_EQ.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConvolverSettings {
    pub enabled: bool,
    /// Interleaved impulse-response samples
    pub impulse_response: Vec<f32>,
    pub channels: i32,
}

impl ConvolverSettings {
    /// Frames per channel; zero when no impulse is configured.
    pub fn frames(&self) -> i32 {
        if self.channels > 0 {
            self.impulse_response.len() as i32 / self.channels
        } else {
            0
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrossfeedSettings {
    pub enabled: bool,
    /// Preset mode; `CUSTOM_CROSSFEED_MODE` selects the custom curve
    pub mode: i32,
    /// Cutoff frequency (Hz) for the custom curve
    pub custom_fcut: i32,
    /// Feed level (tenths of dB) for the custom curve
    pub custom_feed: i32,
}

impl Default for CrossfeedSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            mode: 0,
            custom_fcut: 700,
            custom_feed: 45,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReverbSettings {
    pub enabled: bool,
    pub preset: i32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StereoWideSettings {
    pub enabled: bool,
    pub level: f32,
}

impl Default for StereoWideSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            level: 60.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TubeSettings {
    pub enabled: bool,
    /// Drive level, 0.0 - 1.0
    pub level: f32,
}

impl Default for TubeSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            level: 0.2,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VdcSettings {
    pub enabled: bool,
    /// Raw VDC document text
    pub document: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LiveprogSettings {
    pub enabled: bool,
    pub name: String,
    pub path: String,
}

/// Root settings structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DspSettings {
    /// Master processing toggle
    pub enabled: bool,
    pub output_control: OutputControlSettings,
    pub compressor: CompressorSettings,
    pub bass_boost: BassBoostSettings,
    pub equalizer: EqualizerSettings,
    pub graphic_eq: GraphicEqSettings,
    pub convolver: ConvolverSettings,
    pub crossfeed: CrossfeedSettings,
    pub reverb: ReverbSettings,
    pub stereo_wide: StereoWideSettings,
    pub tube: TubeSettings,
    pub vdc: VdcSettings,
    pub liveprog: LiveprogSettings,
    #[serde(default)]
    pub saved_at: Option<DateTime<Utc>>,
}

impl Default for DspSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            output_control: OutputControlSettings::default(),
            compressor: CompressorSettings::default(),
            bass_boost: BassBoostSettings::default(),
            equalizer: EqualizerSettings::default(),
            graphic_eq: GraphicEqSettings::default(),
            convolver: ConvolverSettings::default(),
            crossfeed: CrossfeedSettings::default(),
            reverb: ReverbSettings::default(),
            stereo_wide: StereoWideSettings::default(),
            tube: TubeSettings::default(),
            vdc: VdcSettings::default(),
            liveprog: LiveprogSettings::default(),
            saved_at: None,
        }
    }
}

impl DspSettings {
    /// Get the settings file path
    fn settings_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "vireo", "vireo")
            .map(|dirs| dirs.config_dir().join("settings.json"))
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        let Some(path) = Self::settings_path() else {
            warn!("Could not determine config directory, using default settings");
            return Self::default();
        };

        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => {
                    info!("Loaded settings from {:?}", path);
                    settings
                }
                Err(e) => {
                    error!("Failed to parse settings file: {}", e);
                    Self::default()
                }
            },
            Err(_) => {
                info!("No settings file found, using defaults");
                Self::default()
            }
        }
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<(), String> {
        let Some(path) = Self::settings_path() else {
            return Err("Could not determine config directory".to_string());
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| format!("Failed to create config dir: {e}"))?;
        }

        let mut stamped = self.clone();
        stamped.saved_at = Some(Utc::now());

        let json = serde_json::to_string_pretty(&stamped)
            .map_err(|e| format!("Failed to serialize settings: {e}"))?;

        fs::write(&path, json).map_err(|e| format!("Failed to write settings: {e}"))?;
        info!("Saved settings to {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = DspSettings::default();
        assert!(settings.enabled);
        assert!(!settings.compressor.enabled);
        assert_eq!(settings.equalizer.bands.len(), 30);
        assert_eq!(settings.graphic_eq.bands, DEFAULT_GRAPHIC_EQ);
        assert_eq!(settings.convolver.frames(), 0);
    }

    #[test]
    fn test_settings_roundtrip() {
        let mut settings = DspSettings::default();
        settings.reverb.enabled = true;
        settings.reverb.preset = 7;
        settings.convolver.impulse_response = vec![0.0, 0.5, 0.5, 0.0];
        settings.convolver.channels = 2;

        let json = serde_json::to_string(&settings).unwrap();
        let back: DspSettings = serde_json::from_str(&json).unwrap();

        assert!(back.reverb.enabled);
        assert_eq!(back.reverb.preset, 7);
        assert_eq!(back.convolver.frames(), 2);
    }

    #[test]
    fn test_namespace_keys() {
        let json = serde_json::to_string(&Namespace::BassBoost).unwrap();
        assert_eq!(json, "\"dsp_bass\"");
        let ns: Namespace = serde_json::from_str("\"dsp_ddc\"").unwrap();
        assert_eq!(ns, Namespace::Vdc);
    }

    #[test]
    fn test_namespace_order_is_stable() {
        assert_eq!(Namespace::ALL.len(), 12);
        assert_eq!(Namespace::ALL[0], Namespace::OutputControl);
        assert_eq!(Namespace::ALL[11], Namespace::Liveprog);
    }

    #[test]
    fn test_convolver_frames_guard_zero_channels() {
        let convolver = ConvolverSettings {
            enabled: true,
            impulse_response: vec![0.1, 0.2],
            channels: 0,
        };
        assert_eq!(convolver.frames(), 0);
    }
}
