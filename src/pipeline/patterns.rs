//! Stroke library and traditional pattern presets
//!
//! Maps stroke syllables to sound categories and turns a stroke list plus a
//! tempo into timed [`StrokeEvent`]s. The presets are the five kaalams
//! (tempo stages) of Panchari melam.

use super::events::StrokeEvent;
use super::parser::StrokeToken;
use crate::error::{Error, Result};
use crate::synthesis::SoundCategory;

/// Intensity of a stroke without an explicit one
pub const DEFAULT_INTENSITY: f32 = 0.7;
/// Fraction of a beat a stroke lasts
const DURATION_FRACTION: f32 = 0.8;

/// Sound category of a stroke syllable; unknown syllables are rests.
pub fn category_for(syllable: &str) -> SoundCategory {
    match syllable {
        "Ta" | "ta" | "TaTa" | "TaKiTa" => SoundCategory::Thaam,
        "Ka" | "ka" | "KaKa" | "Chapu" | "Ki" => SoundCategory::Chapu,
        "Na" => SoundCategory::Nam,
        "Dha" | "Dheem" => SoundCategory::Dheem,
        // Cymbal stroke
        "1" => SoundCategory::METALLIC,
        _ => SoundCategory::Rest,
    }
}

fn event_at(index: usize, syllable: &str, intensity: Option<f32>, beat: f32) -> StrokeEvent {
    let category = category_for(syllable);
    let intensity = intensity.unwrap_or(if category.is_rest() {
        0.0
    } else {
        DEFAULT_INTENSITY
    });
    StrokeEvent::new(
        index as f32 * beat,
        syllable,
        category,
        intensity,
        beat * DURATION_FRACTION,
    )
}

/// One event per stroke, a beat apart.
///
/// Intensities come from `intensity_curve` where it covers the stroke,
/// otherwise 0.7 (0.0 for rests). A non-positive tempo yields no events.
///
/// # Arguments
/// * `strokes` - Stroke syllables, `.` for rests
/// * `bpm` - Tempo in beats per minute
/// * `intensity_curve` - Optional per-stroke intensities
pub fn events_from_pattern<S: AsRef<str>>(
    strokes: &[S],
    bpm: f32,
    intensity_curve: Option<&[f32]>,
) -> Vec<StrokeEvent> {
    if !(bpm > 0.0) {
        return Vec::new();
    }
    let beat = 60.0 / bpm;
    strokes
        .iter()
        .enumerate()
        .map(|(i, stroke)| {
            let intensity = intensity_curve.and_then(|curve| curve.get(i).copied());
            event_at(i, stroke.as_ref(), intensity, beat)
        })
        .collect()
}

/// Events from parsed notation, honoring `@intensity` suffixes.
pub fn events_from_tokens(tokens: &[StrokeToken], bpm: f32) -> Vec<StrokeEvent> {
    if !(bpm > 0.0) {
        return Vec::new();
    }
    let beat = 60.0 / bpm;
    tokens
        .iter()
        .enumerate()
        .map(|(i, token)| event_at(i, &token.syllable, token.intensity, beat))
        .collect()
}

/// A named traditional pattern with its customary tempo
#[derive(Debug, Clone, PartialEq)]
pub struct PatternPreset {
    pub name: &'static str,
    pub bpm: f32,
    pub strokes: &'static [&'static str],
}

impl PatternPreset {
    pub fn events(&self) -> Vec<StrokeEvent> {
        events_from_pattern(self.strokes, self.bpm, None)
    }
}

const PATHIKAALAM: &[&str] = &[
    // Nerkol
    "Ta", ".", "ka", ".", "Ta", ".", "ka", ".", "Ta", "Ka", "Ta", ".", "Na", ".", "ka", ".",
    "Ta", ".", "Ka", ".", "Ta", ".", "Na", ".", "Ta", "Ka", "ta", "Ka", "Na", ".", "Ta", ".",
    // Koora
    "Ta", "Ki", "Ta", "Ta", "Ki", "Ta", ".", ".", "Ta", "Ki", "Ta", "Ta", "Ki", "Ta", ".", ".",
    // Nerkol return
    "Ta", ".", "Ka", "Ta", "ka", ".", "Na", ".", "Ta", "Ka", "Ta", "Na", "Ta", ".", "Ka", ".",
    // Koora development
    "Ta", "Ki", "Ta", "Ta", "Ki", "Ta", "Ta", "Ki", "Ta", "Dheem", ".", "Dheem", ".", "Dheem", ".", ".",
    "Ta", "Ka", "Ta", "Ka", "Ta", "Ka", "Ta", "Ka", "Ta", "Ka", "Ta", "Ka", "Ta", "Ka", "Ta", "Ka",
];

const RANDAM_KAALAM: &[&str] = &[
    "Ta", "Ka", "Ta", "Na", "Ta", "Ka", "Ta", "Ka",
    "Ta", "Ka", "Na", "Ta", "Ta", "Ki", "Ta", ".",
    "Ta", "Ka", "Dheem", "Ta", "Ka", "Dheem", "Ta", "Ka",
    "Ta", "Ka", "Na", "Ta", "Dha", "Ka", "Na", "Ta",
];

const MOONAM_KAALAM: &[&str] = &[
    "Ta", "Ka", "Na", "Ta", "Ka", "Na", "Ta", "Ka",
    "Ta", "Ki", "Ta", "Ta", "Ki", "Ta", "Ta", "Ki", "Ta",
    "Ta", "Ka", "Ta", "Na", "Ta", "Ka", "Na", "Ta",
];

const NAALAM_KAALAM: &[&str] = &[
    "Ta", "Ka", "Na", "Ta", "Ka", "Na", "Ta", "Ka", "Na", "Ta", "Ka", "Na",
    "Dheem", "Ta", "Ka", "Dheem", "Ta", "Ka", "Dheem", "Ta", "Ka",
];

const ANCHAAM_KAALAM: &[&str] = &[
    // Kalasam
    "Ta", "Na", "Ta", "Na", "Ta", "Na", "Ta", "Na",
    "Ta", "Ka", "Ta", "Ka", "Ta", "Ka", "Ta", "Ka",
    // Theermanam
    "Ta", ".", "Ta", ".", "Ta", ".",
    "Ta", ".", "Ta", ".", "Ta", ".",
];

pub const PRESETS: [PatternPreset; 5] = [
    PatternPreset {
        name: "pathikaalam",
        bpm: 85.0,
        strokes: PATHIKAALAM,
    },
    PatternPreset {
        name: "randam_kaalam",
        bpm: 170.0,
        strokes: RANDAM_KAALAM,
    },
    PatternPreset {
        name: "moonam_kaalam",
        bpm: 240.0,
        strokes: MOONAM_KAALAM,
    },
    PatternPreset {
        name: "naalam_kaalam",
        bpm: 320.0,
        strokes: NAALAM_KAALAM,
    },
    PatternPreset {
        name: "anchaam_kaalam",
        bpm: 400.0,
        strokes: ANCHAAM_KAALAM,
    },
];

/// Look up a preset by name.
pub fn preset(name: &str) -> Result<&'static PatternPreset> {
    PRESETS
        .iter()
        .find(|p| p.name == name)
        .ok_or_else(|| Error::UnknownPreset(name.to_string()))
}
