//! Render configuration
//!
//! All tunables of the synthesis and mixing stages live here. Every field has
//! a serde default so a partial JSON file is enough to override a single knob.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Parameters of the multi-performer ensembling in `get_sound`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnsemblingConfig {
    /// Number of virtual performers layered per hit
    #[serde(default = "EnsemblingConfig::default_layers")]
    pub layers: usize,
    /// Standard deviation of the per-layer detune factor (0.015 = 1.5%)
    #[serde(default = "EnsemblingConfig::default_detune_std")]
    pub detune_std: f64,
    /// Per-layer velocity is scaled by a uniform factor in [1 - jitter, 1 + jitter]
    #[serde(default = "EnsemblingConfig::default_velocity_jitter")]
    pub velocity_jitter: f64,
    /// Standard deviation of the per-layer onset offset, in seconds
    #[serde(default = "EnsemblingConfig::default_timing_std_s")]
    pub timing_std_s: f64,
}

impl EnsemblingConfig {
    fn default_layers() -> usize {
        4
    }
    fn default_detune_std() -> f64 {
        0.015
    }
    fn default_velocity_jitter() -> f64 {
        0.1
    }
    fn default_timing_std_s() -> f64 {
        0.008
    }
}

impl Default for EnsemblingConfig {
    fn default() -> Self {
        Self {
            layers: Self::default_layers(),
            detune_std: Self::default_detune_std(),
            velocity_jitter: Self::default_velocity_jitter(),
            timing_std_s: Self::default_timing_std_s(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MixerConfig {
    /// Level of the stick click mixed over each chenda strike
    #[serde(default = "MixerConfig::default_transient_gain")]
    pub transient_gain: f32,
    /// Level of the stick's own ring mixed over each chenda strike
    #[serde(default = "MixerConfig::default_resonance_gain")]
    pub resonance_gain: f32,
    /// Master peak ceiling after the glue stage
    #[serde(default = "MixerConfig::default_ceiling")]
    pub ceiling: f32,
    /// Propagation delays at or beyond this many samples are not applied
    #[serde(default = "MixerConfig::default_max_delay_samples")]
    pub max_delay_samples: usize,
    /// Speed of sound used for the distance delay, in m/s
    #[serde(default = "MixerConfig::default_speed_of_sound")]
    pub speed_of_sound: f32,
}

impl MixerConfig {
    fn default_transient_gain() -> f32 {
        0.3
    }
    fn default_resonance_gain() -> f32 {
        0.15
    }
    fn default_ceiling() -> f32 {
        0.98
    }
    fn default_max_delay_samples() -> usize {
        100
    }
    fn default_speed_of_sound() -> f32 {
        343.0
    }
}

impl Default for MixerConfig {
    fn default() -> Self {
        Self {
            transient_gain: Self::default_transient_gain(),
            resonance_gain: Self::default_resonance_gain(),
            ceiling: Self::default_ceiling(),
            max_delay_samples: Self::default_max_delay_samples(),
            speed_of_sound: Self::default_speed_of_sound(),
        }
    }
}

/// Where the partial bank comes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankConfig {
    /// JSON spectral database; when absent the bank is generated procedurally
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Variants generated per base sound for the procedural bank
    #[serde(default = "BankConfig::default_variants_per_category")]
    pub variants_per_category: usize,
}

impl BankConfig {
    fn default_variants_per_category() -> usize {
        32
    }
}

impl Default for BankConfig {
    fn default() -> Self {
        Self {
            path: None,
            variants_per_category: Self::default_variants_per_category(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "RenderConfig::default_sample_rate")]
    pub sample_rate: u32,
    #[serde(default)]
    pub ensembling: EnsemblingConfig,
    #[serde(default)]
    pub mixer: MixerConfig,
    #[serde(default)]
    pub bank: BankConfig,
}

impl RenderConfig {
    fn default_sample_rate() -> u32 {
        crate::SAMPLE_RATE
    }

    /// Load a configuration from a JSON file and validate it.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let config: RenderConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_rate == 0 {
            return Err(Error::InvalidConfig("sample_rate must be positive".into()));
        }
        if self.ensembling.layers == 0 {
            return Err(Error::InvalidConfig("ensembling.layers must be at least 1".into()));
        }
        if self.ensembling.detune_std < 0.0
            || self.ensembling.timing_std_s < 0.0
            || !(0.0..1.0).contains(&self.ensembling.velocity_jitter)
        {
            return Err(Error::InvalidConfig(
                "ensembling deviations must be non-negative and jitter below 1".into(),
            ));
        }
        if !(self.mixer.ceiling > 0.0 && self.mixer.ceiling <= 1.0) {
            return Err(Error::InvalidConfig("mixer.ceiling must be in (0, 1]".into()));
        }
        if !(self.mixer.speed_of_sound > 0.0) {
            return Err(Error::InvalidConfig("mixer.speed_of_sound must be positive".into()));
        }
        Ok(())
    }
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            sample_rate: Self::default_sample_rate(),
            ensembling: EnsemblingConfig::default(),
            mixer: MixerConfig::default(),
            bank: BankConfig::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RenderConfig::default();
        assert_eq!(config.sample_rate, 44_100);
        assert_eq!(config.ensembling.layers, 4);
        assert!((config.mixer.ceiling - 0.98).abs() < 1e-6);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: RenderConfig =
            serde_json::from_str(r#"{ "ensembling": { "layers": 2 } }"#).unwrap();
        assert_eq!(config.ensembling.layers, 2);
        assert!((config.ensembling.detune_std - 0.015).abs() < 1e-12);
        assert_eq!(config.sample_rate, 44_100);
        assert_eq!(config.bank.variants_per_category, 32);
    }

    #[test]
    fn test_validate_rejects_zero_layers() {
        let mut config = RenderConfig::default();
        config.ensembling.layers = 0;
        assert!(matches!(config.validate(), Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn test_validate_rejects_bad_ceiling() {
        let mut config = RenderConfig::default();
        config.mixer.ceiling = 1.5;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_round_trip_file() {
        let path = std::env::temp_dir().join("melam_config_test.json");
        let mut config = RenderConfig::default();
        config.mixer.transient_gain = 0.5;
        fs::write(&path, serde_json::to_string(&config).unwrap()).unwrap();

        let loaded = RenderConfig::load(&path).unwrap();
        assert_eq!(loaded, config);

        fs::remove_file(&path).unwrap();
    }
}
