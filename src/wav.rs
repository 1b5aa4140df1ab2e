//! WAV file writer utility
//!
//! 16-bit PCM output through `hound`: mono, interleaved stereo, and one mono
//! file per stem.

use hound::{SampleFormat, WavSpec, WavWriter};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::Result;

fn spec(channels: u16, sample_rate: u32) -> WavSpec {
    WavSpec {
        channels,
        sample_rate,
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    }
}

/// Convert a sample in [-1.0, 1.0] to i16, clamping out-of-range values.
///
/// -1.0 maps to -32768 and 1.0 to 32767.
pub fn to_i16(sample: f32) -> i16 {
    let clamped = if sample.is_nan() { 0.0 } else { sample.clamp(-1.0, 1.0) };
    if clamped >= 0.0 {
        (clamped * i16::MAX as f32) as i16
    } else {
        (clamped * -(i16::MIN as f32)) as i16
    }
}

/// Write a mono 16-bit PCM WAV file
///
/// # Arguments
/// * `path` - Output file path
/// * `samples` - Audio samples (f32, range [-1.0, 1.0])
/// * `sample_rate` - Sample rate in Hz
pub fn write_mono<P: AsRef<Path>>(path: P, samples: &[f32], sample_rate: u32) -> Result<()> {
    let mut writer = WavWriter::create(path, spec(1, sample_rate))?;
    for &s in samples {
        writer.write_sample(to_i16(s))?;
    }
    writer.finalize()?;
    Ok(())
}

/// Write an interleaved stereo 16-bit PCM WAV file.
///
/// The shorter channel is padded with silence.
pub fn write_stereo<P: AsRef<Path>>(
    path: P,
    left: &[f32],
    right: &[f32],
    sample_rate: u32,
) -> Result<()> {
    let mut writer = WavWriter::create(path, spec(2, sample_rate))?;
    let frames = left.len().max(right.len());
    for i in 0..frames {
        writer.write_sample(to_i16(left.get(i).copied().unwrap_or(0.0)))?;
        writer.write_sample(to_i16(right.get(i).copied().unwrap_or(0.0)))?;
    }
    writer.finalize()?;
    Ok(())
}

/// Write each stem to `<dir>/<player_id>.wav`, creating `dir` if needed.
///
/// Returns the written paths in player id order.
pub fn write_stems<P: AsRef<Path>>(
    dir: P,
    stems: &BTreeMap<String, Vec<f32>>,
    sample_rate: u32,
) -> Result<Vec<PathBuf>> {
    let dir = dir.as_ref();
    fs::create_dir_all(dir)?;
    let mut paths = Vec::with_capacity(stems.len());
    for (id, samples) in stems {
        let path = dir.join(format!("{}.wav", id));
        write_mono(&path, samples, sample_rate)?;
        paths.push(path);
    }
    info!(dir = %dir.display(), stems = paths.len(), "wrote stems");
    Ok(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use hound::WavReader;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(name)
    }

    #[test]
    fn test_to_i16_clamping() {
        assert_eq!(to_i16(1.0), i16::MAX);
        assert_eq!(to_i16(-1.0), i16::MIN);
        assert_eq!(to_i16(2.0), i16::MAX);
        assert_eq!(to_i16(-1.5), i16::MIN);
        assert_eq!(to_i16(0.0), 0);
        assert_eq!(to_i16(f32::NAN), 0);
    }

    #[test]
    fn test_write_mono() {
        let path = temp_path("melam_test_mono.wav");
        write_mono(&path, &[1.0, -1.0, 0.5, 0.0], 16_000).unwrap();

        let mut reader = WavReader::open(&path).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, 16_000);
        assert_eq!(spec.bits_per_sample, 16);
        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![i16::MAX, i16::MIN, 16_383, 0]);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_stereo_interleaves() {
        let path = temp_path("melam_test_stereo.wav");
        write_stereo(&path, &[1.0, 0.0], &[-1.0], 44_100).unwrap();

        let mut reader = WavReader::open(&path).unwrap();
        assert_eq!(reader.spec().channels, 2);
        assert_eq!(reader.duration(), 2);
        let samples: Vec<i16> = reader.samples::<i16>().map(|s| s.unwrap()).collect();
        assert_eq!(samples, vec![i16::MAX, i16::MIN, 0, 0]);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_stems() {
        let dir = temp_path("melam_test_stems");
        let mut stems = BTreeMap::new();
        stems.insert("P2".to_string(), vec![0.0; 10]);
        stems.insert("P1".to_string(), vec![0.5; 20]);

        let paths = write_stems(&dir, &stems, 44_100).unwrap();
        assert_eq!(paths, vec![dir.join("P1.wav"), dir.join("P2.wav")]);
        assert_eq!(WavReader::open(&paths[0]).unwrap().duration(), 20);

        fs::remove_dir_all(&dir).unwrap();
    }
}
