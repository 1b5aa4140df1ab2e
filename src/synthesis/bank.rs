//! Partial bank
//!
//! The spectral database: acoustic signatures (partial lists) grouped by
//! category, loaded from JSON or generated procedurally from the radial
//! modes of a circular membrane. Read-only once built.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

use super::SoundCategory;
use crate::config::BankConfig;
use crate::error::Result;
use crate::rng::Gaussian;

/// First zeros of the Bessel function J₀, one per radial membrane mode
const BESSEL_J0_ZEROS: [f64; 12] = [
    2.404825557695773,
    5.520078110286311,
    8.653727912911013,
    11.79153443901428,
    14.93091770848779,
    18.07106396791092,
    21.21163662987926,
    24.35247153074930,
    27.49347913204025,
    30.63460646843198,
    33.77582021357357,
    36.91709835366404,
];

/// Wood body thud resonances in Hz: (frequency, amplitude, decay scale)
const BODY_RESONANCES: [(f64, f64, f64); 3] = [(60.0, 0.7, 2.5), (95.0, 0.5, 2.0), (130.0, 0.3, 1.5)];

/// Base sounds of the procedural bank: (id prefix, fundamental Hz, category)
const BASE_SOUNDS: [(&str, f64, SoundCategory); 7] = [
    ("CHENDA_THAAM", 280.0, SoundCategory::Thaam),
    ("CHENDA_DHEEM", 95.0, SoundCategory::Dheem),
    ("CHENDA_NAM", 720.0, SoundCategory::Nam),
    ("CHENDA_URUTTU", 320.0, SoundCategory::Uruttu),
    ("CHENDA_CHAPU", 310.0, SoundCategory::Chapu),
    ("KOMBU_SA", 370.0, SoundCategory::Wind),
    ("KOMBU_PA", 554.0, SoundCategory::Wind),
];

/// One sinusoidal component. Serialized as `[frequency, amplitude, decay]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 3]", into = "[f32; 3]")]
pub struct Partial {
    /// Absolute frequency in Hz
    pub frequency: f32,
    pub amplitude: f32,
    /// Decay scale; the envelope is `exp(-5 decay t)`
    pub decay: f32,
}

impl From<[f32; 3]> for Partial {
    fn from([frequency, amplitude, decay]: [f32; 3]) -> Self {
        Self {
            frequency,
            amplitude,
            decay,
        }
    }
}

impl From<Partial> for [f32; 3] {
    fn from(p: Partial) -> Self {
        [p.frequency, p.amplitude, p.decay]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoiseColor {
    White,
    Pink,
    Brown,
}

/// Noise layer of a signature. Stored with the bank; the additive kernel
/// renders partials only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoiseDescriptor {
    pub color: NoiseColor,
    /// Seconds
    pub attack: f32,
    pub mix: f32,
}

impl Default for NoiseDescriptor {
    fn default() -> Self {
        Self {
            color: NoiseColor::Brown,
            attack: 0.001,
            mix: 0.08,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AcousticSignature {
    pub id: String,
    pub category: SoundCategory,
    pub partials: Vec<Partial>,
    pub noise: NoiseDescriptor,
}

/// On-disk record: `{ "cat": ..., "partials": [[f, a, d], ...], "noise": {...} }`
#[derive(Debug, Serialize, Deserialize)]
struct SignatureRecord {
    cat: String,
    partials: Vec<Partial>,
    #[serde(default)]
    noise: NoiseDescriptor,
}

/// Acoustic signatures grouped by category
#[derive(Debug, Clone, Default)]
pub struct PartialBank {
    signatures: BTreeMap<SoundCategory, Vec<AcousticSignature>>,
}

impl PartialBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a signature. REST signatures are ignored.
    pub fn insert(&mut self, signature: AcousticSignature) {
        if signature.category.is_rest() {
            return;
        }
        self.signatures
            .entry(signature.category)
            .or_default()
            .push(signature);
    }

    /// All variants of a category; empty for categories without signatures.
    pub fn variants(&self, category: SoundCategory) -> &[AcousticSignature] {
        self.signatures
            .get(&category)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.signatures.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of signatures per category
    pub fn category_counts(&self) -> BTreeMap<SoundCategory, usize> {
        self.signatures
            .iter()
            .map(|(category, sigs)| (*category, sigs.len()))
            .collect()
    }

    /// Parse a JSON spectral database. Entries with an unknown category are skipped.
    pub fn from_json(text: &str) -> Result<Self> {
        let records: BTreeMap<String, SignatureRecord> = serde_json::from_str(text)?;
        let mut bank = PartialBank::new();
        for (id, record) in records {
            match SoundCategory::from_name(&record.cat) {
                Some(category) => bank.insert(AcousticSignature {
                    id,
                    category,
                    partials: record.partials,
                    noise: record.noise,
                }),
                None => warn!(id = %id, cat = %record.cat, "skipping signature with unknown category"),
            }
        }
        Ok(bank)
    }

    pub fn to_json(&self) -> Result<String> {
        let records: BTreeMap<&str, SignatureRecord> = self
            .signatures
            .values()
            .flatten()
            .map(|sig| {
                (
                    sig.id.as_str(),
                    SignatureRecord {
                        cat: sig.category.name().to_string(),
                        partials: sig.partials.clone(),
                        noise: sig.noise.clone(),
                    },
                )
            })
            .collect();
        Ok(serde_json::to_string(&records)?)
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bank = Self::from_json(&fs::read_to_string(path)?)?;
        info!(path = %path.display(), signatures = bank.len(), "loaded spectral database");
        bank.log_counts();
        Ok(bank)
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Build the procedural bank: `variants` signatures per base sound.
    ///
    /// Each base sound gets twelve radial membrane modes (ratios of J₀ zeros)
    /// with most energy in the first three, plus three sub-bass body
    /// resonances. Every variant is tuned by N(1, 0.02) and each partial is
    /// jittered in ratio, amplitude and decay.
    pub fn generate<R: Rng + ?Sized>(variants: usize, rng: &mut R) -> Self {
        let mut bank = PartialBank::new();
        for (prefix, base_freq, category) in BASE_SOUNDS {
            let modes = base_modes(base_freq);
            for i in 0..variants {
                let tension = rng.normal(1.0, 0.02);
                let instance_freq = base_freq * tension;
                let partials = modes
                    .iter()
                    .map(|&(ratio, amp, decay)| Partial {
                        frequency: round_to(ratio * rng.normal(1.0, 0.01) * instance_freq, 2) as f32,
                        amplitude: round_to((amp * rng.normal(1.0, 0.08)).max(0.0), 4) as f32,
                        decay: round_to(decay * rng.normal(1.0, 0.05), 4) as f32,
                    })
                    .collect();
                bank.insert(AcousticSignature {
                    id: format!("{}_VAR_{:04}", prefix, i),
                    category,
                    partials,
                    noise: NoiseDescriptor::default(),
                });
            }
        }
        info!(signatures = bank.len(), "generated procedural spectral database");
        bank.log_counts();
        bank
    }

    /// Load the configured database, or generate one when no path is set.
    pub fn from_config<R: Rng + ?Sized>(config: &BankConfig, rng: &mut R) -> Result<Self> {
        match &config.path {
            Some(path) => Self::load(path),
            None => Ok(Self::generate(config.variants_per_category, rng)),
        }
    }

    fn log_counts(&self) {
        for (category, count) in self.category_counts() {
            info!(%category, count, "signatures");
        }
    }
}

/// Body resonances followed by the membrane modes, as (ratio, amplitude, decay).
fn base_modes(base_freq: f64) -> Vec<(f64, f64, f64)> {
    let body = BODY_RESONANCES
        .iter()
        .map(|&(freq, amp, decay)| (freq / base_freq, amp, decay));

    let fundamental = BESSEL_J0_ZEROS[0];
    let membrane = BESSEL_J0_ZEROS.iter().enumerate().map(move |(i, zero)| {
        let ratio = zero / fundamental;
        let amp = match i {
            0 => 1.0,
            1 => 0.8,
            2 => 0.6,
            _ => 0.3 / (i as f64).powf(1.5),
        };
        (
            round_to(ratio, 4),
            round_to(amp, 4),
            round_to(2.0 / ratio.powf(0.8), 4),
        )
    });

    body.chain(membrane).collect()
}

fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    (value * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RenderRng;
    use rand::SeedableRng;

    #[test]
    fn test_base_modes() {
        let modes = base_modes(280.0);
        assert_eq!(modes.len(), 15);
        assert!((modes[0].0 * 280.0 - 60.0).abs() < 1e-9);
        assert_eq!(modes[3], (1.0, 1.0, 2.0));
        assert!((modes[4].0 - 2.2954).abs() < 1e-9);
        assert_eq!(modes[4].1, 0.8);
        assert!((modes[6].1 - round_to(0.3 / 3f64.powf(1.5), 4)).abs() < 1e-12);
    }

    #[test]
    fn test_generate_counts() {
        let mut rng = RenderRng::seed_from_u64(1);
        let bank = PartialBank::generate(4, &mut rng);
        assert_eq!(bank.len(), 28);
        assert_eq!(bank.variants(SoundCategory::Thaam).len(), 4);
        assert_eq!(bank.variants(SoundCategory::Wind).len(), 8);
        assert!(bank.variants(SoundCategory::Rest).is_empty());

        let thaam = &bank.variants(SoundCategory::Thaam)[0];
        assert_eq!(thaam.id, "CHENDA_THAAM_VAR_0000");
        assert_eq!(thaam.partials.len(), 15);
        assert!(thaam.partials.iter().all(|p| p.amplitude >= 0.0));
        // The fundamental stays within a few percent of 280 Hz
        assert!((thaam.partials[3].frequency - 280.0).abs() < 30.0);
    }

    #[test]
    fn test_json_layout() {
        let text = r#"{
            "X_1": { "cat": "THAAM", "partials": [[280.0, 1.0, 2.0], [640.0, 0.5, 1.0]],
                     "noise": { "color": "brown", "attack": 0.001, "mix": 0.08 } },
            "X_2": { "cat": "DHEEM", "partials": [[95.0, 1.0, 2.0]] },
            "X_3": { "cat": "OPPU", "partials": [[500.0, 1.0, 1.0]] }
        }"#;
        let bank = PartialBank::from_json(text).unwrap();
        assert_eq!(bank.len(), 2);
        let thaam = &bank.variants(SoundCategory::Thaam)[0];
        assert_eq!(thaam.partials[1], Partial { frequency: 640.0, amplitude: 0.5, decay: 1.0 });
        assert_eq!(bank.variants(SoundCategory::Dheem)[0].noise, NoiseDescriptor::default());
    }

    #[test]
    fn test_save_and_load() {
        let mut rng = RenderRng::seed_from_u64(2);
        let bank = PartialBank::generate(2, &mut rng);
        let path = std::env::temp_dir().join("melam_bank_test.json");
        bank.save(&path).unwrap();

        let loaded = PartialBank::load(&path).unwrap();
        assert_eq!(loaded.category_counts(), bank.category_counts());
        assert_eq!(
            loaded.variants(SoundCategory::Nam),
            bank.variants(SoundCategory::Nam)
        );
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_bad_json_is_error() {
        assert!(PartialBank::from_json("{ not json").is_err());
    }
}
