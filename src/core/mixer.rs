use std::path::{Path, PathBuf};

use ndarray::{s, Array2};
use tracing::{error, info, warn};

use crate::{
    audio::{read_audio, write_audio, WavEncoding},
    error::{Result, SessionError},
    paths::{DRUMS_STEM, OTHER_STEM},
    types::AudioData,
};

/// Peak ceiling of the backing track on a [-1, 1] scale.
pub const PEAK_CEILING: f32 = 0.95;

/// Stems required for a backing track that are absent from `stem_dir`.
pub fn missing_stems(stem_dir: &Path) -> Vec<PathBuf> {
    [DRUMS_STEM, OTHER_STEM]
        .iter()
        .map(|name| stem_dir.join(name))
        .filter(|p| !p.exists())
        .collect()
}

/// Combines drums and other from `stem_dir` into a bass-free track at
/// `output_path`. Failures are logged and reported as `false`; nothing is
/// written unless the whole mix succeeds.
pub fn create_backing_track(stem_dir: &Path, output_path: &Path) -> bool {
    let missing = missing_stems(stem_dir);
    for path in &missing {
        let file = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        warn!("Missing {} in {}", file, stem_dir.display());
    }
    if !missing.is_empty() {
        return false;
    }

    match mix_present_stems(stem_dir, output_path) {
        Ok(_) => {
            let name = output_path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            info!("Created: {}", name);
            true
        }
        Err(e) => {
            error!("Error creating backing track: {}", e);
            false
        }
    }
}

/// Loads the two stems, mixes them and writes the result as 32-bit float WAV.
pub fn mix_backing_track(stem_dir: &Path, output_path: &Path) -> Result<AudioData> {
    if let Some(path) = missing_stems(stem_dir).into_iter().next() {
        return Err(SessionError::MissingStem { path });
    }
    mix_present_stems(stem_dir, output_path)
}

fn mix_present_stems(stem_dir: &Path, output_path: &Path) -> Result<AudioData> {
    let drums_path = stem_dir.join(DRUMS_STEM);
    let other_path = stem_dir.join(OTHER_STEM);
    let drums = read_audio(&drums_path)?;
    let other = read_audio(&other_path)?;

    // No resampling: the backing track is written at the drums' rate.
    if drums.sample_rate != other.sample_rate {
        warn!(
            "Sample rate mismatch in {}: drums {} Hz, other {} Hz",
            stem_dir.display(),
            drums.sample_rate,
            other.sample_rate
        );
    }

    let backing = mix_stems(&drums, &other).map_err(|e| match e {
        SessionError::EmptyAudio { .. } => SessionError::EmptyAudio {
            path: stem_dir.to_path_buf(),
        },
        SessionError::NonFiniteSample { .. } => SessionError::NonFiniteSample {
            path: stem_dir.to_path_buf(),
        },
        e => e,
    })?;
    write_audio(output_path, &backing, WavEncoding::Float32)?;
    Ok(backing)
}

/// Sums `drums` and `other` over their common length and limits the peak to
/// `PEAK_CEILING`. NaN or infinite samples fail the mix.
pub fn mix_stems(drums: &AudioData, other: &AudioData) -> Result<AudioData> {
    if drums.channels != other.channels {
        return Err(SessionError::ChannelMismatch {
            drums: drums.channels,
            other: other.channels,
        });
    }

    let d = to_planar(drums)?;
    let o = to_planar(other)?;
    let min_len = d.ncols().min(o.ncols());
    if min_len == 0 {
        return Err(SessionError::EmptyAudio {
            path: PathBuf::new(),
        });
    }

    let mut backing = &d.slice(s![.., ..min_len]) + &o.slice(s![.., ..min_len]);
    if backing.iter().any(|x| !x.is_finite()) {
        return Err(SessionError::NonFiniteSample {
            path: PathBuf::new(),
        });
    }

    let peak = backing.fold(0.0f32, |m, x| m.max(x.abs()));
    if peak > PEAK_CEILING {
        let gain = PEAK_CEILING / peak;
        backing.mapv_inplace(|x| x * gain);
    }

    Ok(AudioData {
        samples: backing.t().iter().copied().collect(),
        sample_rate: drums.sample_rate,
        channels: drums.channels,
    })
}

/// Interleaved samples to a (channels, frames) array. Trailing partial frames
/// are dropped.
fn to_planar(audio: &AudioData) -> Result<Array2<f32>> {
    let channels = audio.channels as usize;
    if channels == 0 {
        return Err(SessionError::EmptyAudio {
            path: PathBuf::new(),
        });
    }
    let frames = audio.frames();
    let interleaved = Array2::from_shape_vec(
        (frames, channels),
        audio.samples[..frames * channels].to_vec(),
    )?;
    Ok(interleaved.reversed_axes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn stereo(frames: &[[f32; 2]], sample_rate: u32) -> AudioData {
        AudioData {
            samples: frames.iter().flat_map(|f| f.iter().copied()).collect(),
            sample_rate,
            channels: 2,
        }
    }

    #[test]
    fn quiet_mix_is_plain_sum() {
        let d = stereo(&[[0.1, 0.2], [0.0, -0.1]], 44_100);
        let o = stereo(&[[0.2, 0.1], [0.3, -0.2]], 44_100);
        let out = mix_stems(&d, &o).unwrap();
        let expected = [0.3, 0.3, 0.3, -0.3];
        for (a, b) in out.samples.iter().zip(expected) {
            assert_abs_diff_eq!(*a, b, epsilon = 1e-6);
        }
    }

    #[test]
    fn loud_mix_is_scaled_to_ceiling() {
        let d = stereo(&[[0.8, -0.2], [0.5, 0.5]], 44_100);
        let o = stereo(&[[0.8, 0.1], [-0.5, 0.2]], 44_100);
        let out = mix_stems(&d, &o).unwrap();
        assert_abs_diff_eq!(out.peak(), PEAK_CEILING, epsilon = 1e-6);
        // 1.6 was the loudest sample; everything scales by the same factor.
        assert_abs_diff_eq!(out.samples[1], -0.1 * PEAK_CEILING / 1.6, epsilon = 1e-6);
    }

    #[test]
    fn truncates_to_shorter_stem() {
        let d = stereo(&[[0.1, 0.1]; 5], 44_100);
        let o = stereo(&[[0.1, 0.1]; 3], 44_100);
        let out = mix_stems(&d, &o).unwrap();
        assert_eq!(out.frames(), 3);
        assert_eq!(out.samples.len(), 6);
    }

    #[test]
    fn interleaving_is_preserved() {
        let d = stereo(&[[0.1, -0.1], [0.2, -0.2], [0.3, -0.3]], 8_000);
        let o = stereo(&[[0.0, 0.0]; 3], 8_000);
        let out = mix_stems(&d, &o).unwrap();
        assert_eq!(out.samples, d.samples);
    }

    #[test]
    fn channel_mismatch_is_an_error() {
        let d = stereo(&[[0.1, 0.1]], 44_100);
        let o = AudioData {
            samples: vec![0.1],
            sample_rate: 44_100,
            channels: 1,
        };
        assert!(matches!(
            mix_stems(&d, &o),
            Err(SessionError::ChannelMismatch { drums: 2, other: 1 })
        ));
    }

    #[test]
    fn non_finite_samples_fail_the_mix() {
        let d = stereo(&[[f32::NAN, 2.0]], 44_100);
        let o = stereo(&[[0.0, 0.0]], 44_100);
        assert!(matches!(
            mix_stems(&d, &o),
            Err(SessionError::NonFiniteSample { .. })
        ));

        let d = stereo(&[[f32::INFINITY, 0.1]], 44_100);
        let o = stereo(&[[f32::NEG_INFINITY, 0.1]], 44_100);
        assert!(mix_stems(&d, &o).is_err());
    }

    #[test]
    fn both_missing_stems_are_reported_in_order() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            missing_stems(dir.path()),
            vec![dir.path().join(DRUMS_STEM), dir.path().join(OTHER_STEM)]
        );

        std::fs::write(dir.path().join(DRUMS_STEM), b"").unwrap();
        assert_eq!(missing_stems(dir.path()), vec![dir.path().join(OTHER_STEM)]);

        std::fs::write(dir.path().join(OTHER_STEM), b"").unwrap();
        assert!(missing_stems(dir.path()).is_empty());
    }

    #[test]
    fn empty_stem_is_an_error() {
        let d = stereo(&[], 44_100);
        let o = stereo(&[[0.1, 0.1]], 44_100);
        assert!(matches!(
            mix_stems(&d, &o),
            Err(SessionError::EmptyAudio { .. })
        ));
    }
}
