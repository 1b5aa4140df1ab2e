//! Parser for the stroke pattern notation
//!
//! Format:
//! <stroke> <stroke>, <stroke>@<intensity>   # comments
//!
//! Strokes:
//! - A syllable from the stroke library (e.g., Ta, ka, Dheem, Na)
//! - `.` for a rest
//! - Optional `@<intensity>` suffix in [0, 1] (e.g., Ta@0.9)
//!
//! Strokes are separated by whitespace or commas and may span several lines.

use thiserror::Error;

/// A stroke as written in a pattern
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeToken {
    pub syllable: String,
    /// Explicit intensity, if the token carried one
    pub intensity: Option<f32>,
}

/// Parse errors, with the 1-based line they occurred on
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParseError {
    #[error("line {line}: missing stroke before '@' in '{token}'")]
    MissingSyllable { line: usize, token: String },

    #[error("line {line}: invalid intensity in '{token}'")]
    InvalidIntensity { line: usize, token: String },

    #[error("line {line}: intensity {value} in '{token}' is outside [0, 1]")]
    IntensityOutOfRange {
        line: usize,
        token: String,
        value: f32,
    },
}

/// Parse a single stroke token
/// Examples: Ta, ., Dheem@0.95
fn parse_token(token: &str, line: usize) -> Result<StrokeToken, ParseError> {
    let (syllable, intensity) = match token.split_once('@') {
        Some((syllable, value)) => (syllable, Some(value)),
        None => (token, None),
    };

    if syllable.is_empty() {
        return Err(ParseError::MissingSyllable {
            line,
            token: token.to_string(),
        });
    }

    let intensity = match intensity {
        Some(value) => {
            let value = value
                .parse::<f32>()
                .map_err(|_| ParseError::InvalidIntensity {
                    line,
                    token: token.to_string(),
                })?;
            if !(0.0..=1.0).contains(&value) {
                return Err(ParseError::IntensityOutOfRange {
                    line,
                    token: token.to_string(),
                    value,
                });
            }
            Some(value)
        }
        None => None,
    };

    Ok(StrokeToken {
        syllable: syllable.to_string(),
        intensity,
    })
}

/// Parse one line of notation; `line` is its 1-based number for error reporting.
pub fn parse_line(text: &str, line: usize) -> Result<Vec<StrokeToken>, ParseError> {
    let text = text.split('#').next().unwrap_or(text);
    text.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|token| parse_token(token, line))
        .collect()
}

/// Parse a full pattern
/// Returns the strokes in playing order
pub fn parse_pattern(text: &str) -> Result<Vec<StrokeToken>, ParseError> {
    let mut result = Vec::new();
    for (index, line) in text.lines().enumerate() {
        result.extend(parse_line(line, index + 1)?);
    }
    Ok(result)
}
