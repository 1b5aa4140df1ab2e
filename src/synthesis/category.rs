use serde::{Deserialize, Serialize};
use std::fmt;

/// Coarse acoustic class of a stroke, keying the partial bank
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SoundCategory {
    /// Open center tone on the treble head
    Thaam,
    /// Slap on the treble head
    Chapu,
    /// Bass tone
    Dheem,
    /// Rim stroke; also serves as the metallic class for cymbals
    Nam,
    /// Roll
    Uruttu,
    Wind,
    /// Silence. Never assigned to a player and never rendered.
    Rest,
}

impl SoundCategory {
    /// Category used for cymbal hits
    pub const METALLIC: SoundCategory = SoundCategory::Nam;

    pub const ALL: [SoundCategory; 7] = [
        SoundCategory::Thaam,
        SoundCategory::Chapu,
        SoundCategory::Dheem,
        SoundCategory::Nam,
        SoundCategory::Uruttu,
        SoundCategory::Wind,
        SoundCategory::Rest,
    ];

    pub fn name(self) -> &'static str {
        match self {
            SoundCategory::Thaam => "THAAM",
            SoundCategory::Chapu => "CHAPU",
            SoundCategory::Dheem => "DHEEM",
            SoundCategory::Nam => "NAM",
            SoundCategory::Uruttu => "URUTTU",
            SoundCategory::Wind => "WIND",
            SoundCategory::Rest => "REST",
        }
    }

    /// Look up a category by its database name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(name.trim()))
    }

    pub fn is_rest(self) -> bool {
        self == SoundCategory::Rest
    }

    /// Strokes played on the treble (valam) head of a chenda
    pub fn is_treble(self) -> bool {
        matches!(self, SoundCategory::Thaam | SoundCategory::Chapu)
    }
}

impl fmt::Display for SoundCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
