use std::{fs, fs::File, path::Path};

use anyhow::{Context, Result};
use hound::WavWriter;
use symphonia::core::{
    audio::SampleBuffer, codecs::DecoderOptions, formats::FormatOptions, io::MediaSourceStream,
    meta::MetadataOptions, probe::Hint,
};
use symphonia::default::{get_codecs, get_probe};
use tracing::debug;

use crate::types::AudioData;

/// Loudness target for the reference full mix, in dB below full scale.
pub const LOUDNESS_HEADROOM_DB: f32 = 14.0;

/// Sample encoding used when writing WAV files.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WavEncoding {
    Pcm16,
    Float32,
}

pub fn read_audio<P: AsRef<Path>>(path: P) -> Result<AudioData> {
    let path: &Path = path.as_ref();

    let file: File =
        File::open(path).with_context(|| format!("Failed to open audio file: {:?}", path))?;

    let mss: MediaSourceStream = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint: Hint = Hint::new();

    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = get_probe()
        .format(
            &hint,
            mss,
            &FormatOptions::default(),
            &MetadataOptions::default(),
        )
        .with_context(|| format!("Unrecognized audio format: {:?}", path))?;

    let mut format = probed.format;
    let track = format.default_track().context("No default track found")?;

    let mut decoder = get_codecs().make(&track.codec_params, &DecoderOptions::default())?;

    let mut samples: Vec<f32> = Vec::new();
    let mut sample_rate: u32 = track.codec_params.sample_rate.unwrap_or(0);
    let mut channels: u16 = track
        .codec_params
        .channels
        .map(|c| c.count() as u16)
        .unwrap_or(0);

    while let Ok(packet) = format.next_packet() {
        let decoded = decoder.decode(&packet)?;
        sample_rate = decoded.spec().rate;
        channels = decoded.spec().channels.count() as u16;

        let mut buffer = SampleBuffer::<f32>::new(decoded.capacity() as u64, *decoded.spec());
        buffer.copy_interleaved_ref(decoded);

        samples.extend_from_slice(buffer.samples());
    }

    debug!(
        "Read audio {}: sample_rate={}, channels={}, samples={}",
        path.display(),
        sample_rate,
        channels,
        samples.len()
    );

    Ok(AudioData {
        samples,
        sample_rate,
        channels,
    })
}

/// Writes `audio` to `path`. The file is assembled next to the target and
/// renamed into place, so a failed write never clobbers an existing file.
pub fn write_audio<P: AsRef<Path>>(path: P, audio: &AudioData, encoding: WavEncoding) -> Result<()> {
    let path = path.as_ref();
    let tmp = path.with_extension("part");

    let spec = match encoding {
        WavEncoding::Pcm16 => hound::WavSpec {
            channels: audio.channels,
            sample_rate: audio.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        },
        WavEncoding::Float32 => hound::WavSpec {
            channels: audio.channels,
            sample_rate: audio.sample_rate,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        },
    };

    let written = (|| -> Result<()> {
        let mut writer = WavWriter::create(&tmp, spec)?;
        match encoding {
            WavEncoding::Pcm16 => {
                for sample in &audio.samples {
                    let s = (sample * i16::MAX as f32).clamp(i16::MIN as f32, i16::MAX as f32)
                        as i16;
                    writer.write_sample(s)?;
                }
            }
            WavEncoding::Float32 => {
                for sample in &audio.samples {
                    writer.write_sample(*sample)?;
                }
            }
        }
        writer.finalize()?;
        Ok(())
    })();

    if let Err(e) = written {
        fs::remove_file(&tmp).ok();
        return Err(e.context(format!("Failed to write {:?}", path)));
    }

    fs::rename(&tmp, path).with_context(|| format!("Failed to move audio into {:?}", path))?;
    Ok(())
}

/// Normalizes to `-LOUDNESS_HEADROOM_DB` (RMS estimate of loudness), clamps to
/// full scale, and writes 16-bit PCM.
pub fn write_loudness_normalized<P: AsRef<Path>>(path: P, audio: &AudioData) -> Result<()> {
    let normalized = normalize_loudness(audio, LOUDNESS_HEADROOM_DB);
    write_audio(path, &normalized, WavEncoding::Pcm16)
}

pub fn normalize_loudness(audio: &AudioData, headroom_db: f32) -> AudioData {
    let rms = rms(&audio.samples);
    // Silence stays silent.
    let gain = if rms > f32::EPSILON {
        let loudness_db = 20.0 * rms.log10();
        10f32.powf((-headroom_db - loudness_db) / 20.0)
    } else {
        1.0
    };

    AudioData {
        samples: audio
            .samples
            .iter()
            .map(|s| (s * gain).clamp(-1.0, 1.0))
            .collect(),
        sample_rate: audio.sample_rate,
        channels: audio.channels,
    }
}

fn rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum / samples.len() as f64).sqrt() as f32
}
