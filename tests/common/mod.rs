#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    f32::consts::PI,
    fs,
    path::{Path, PathBuf},
};

use backing_tracks::{
    read_audio, write_audio, AudioData, MusicGenerator, SessionError, StemSeparator, WavEncoding,
    STEM_NAMES,
};

pub const SR: u32 = 32_000;

pub fn sine(freq: f32, amplitude: f32, frames: usize, channels: u16, sample_rate: u32) -> AudioData {
    let mut samples = Vec::with_capacity(frames * channels as usize);
    for i in 0..frames {
        let t = i as f32 / sample_rate as f32;
        let s = (2.0 * PI * freq * t).sin() * amplitude;
        for _ in 0..channels {
            samples.push(s);
        }
    }
    AudioData {
        samples,
        sample_rate,
        channels,
    }
}

pub fn write_wav_f32(path: &Path, audio: &AudioData) {
    write_audio(path, audio, WavEncoding::Float32).unwrap();
}

/// Generator that returns short sines and records every batch it was asked for.
pub struct FakeGenerator {
    pub duration: Option<u32>,
    pub batches: RefCell<Vec<Vec<String>>>,
    pub reclaims: Cell<usize>,
    pub frames: usize,
}

impl FakeGenerator {
    pub fn new() -> Self {
        Self {
            duration: None,
            batches: RefCell::new(Vec::new()),
            reclaims: Cell::new(0),
            frames: 2048,
        }
    }

    pub fn calls(&self) -> usize {
        self.batches.borrow().len()
    }
}

impl MusicGenerator for FakeGenerator {
    fn set_duration(&mut self, seconds: u32) {
        self.duration = Some(seconds);
    }

    fn sample_rate(&self) -> u32 {
        SR
    }

    fn generate(&self, prompts: &[String]) -> backing_tracks::Result<Vec<AudioData>> {
        self.batches.borrow_mut().push(prompts.to_vec());
        Ok(prompts
            .iter()
            .enumerate()
            .map(|(k, _)| sine(220.0 * (k + 1) as f32, 0.5, self.frames, 2, SR))
            .collect())
    }

    fn reclaim(&mut self) {
        self.reclaims.set(self.reclaims.get() + 1);
    }
}

/// Separator that writes four stems derived from the input, failing for any
/// take directory listed in `fail_dirs` and skipping any stem in `omit`.
pub struct FakeSeparator {
    pub fail_dirs: Vec<String>,
    pub omit: Vec<&'static str>,
    pub calls: RefCell<Vec<PathBuf>>,
}

impl FakeSeparator {
    pub fn new() -> Self {
        Self {
            fail_dirs: Vec::new(),
            omit: Vec::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn failing_for(dirs: &[&str]) -> Self {
        Self {
            fail_dirs: dirs.iter().map(|d| d.to_string()).collect(),
            ..Self::new()
        }
    }
}

impl StemSeparator for FakeSeparator {
    fn separate(&self, input: &Path, output_dir: &Path) -> backing_tracks::Result<()> {
        self.calls.borrow_mut().push(input.to_path_buf());

        let dir_name = output_dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if self.fail_dirs.contains(&dir_name) {
            return Err(SessionError::Separation {
                input: input.to_path_buf(),
                reason: "simulated failure".into(),
            });
        }

        let mix = read_audio(input)?;
        let stem_dir = self.stem_dir(input, output_dir);
        fs::create_dir_all(&stem_dir)?;
        for stem in STEM_NAMES {
            if self.omit.contains(&stem) {
                continue;
            }
            let gain = match stem {
                "drums" => 0.6f32,
                "other" => 0.5,
                "bass" => 0.2,
                _ => 0.0,
            };
            let audio = AudioData {
                samples: mix.samples.iter().map(|s| s * gain).collect(),
                ..mix.clone()
            };
            write_audio(stem_dir.join(format!("{stem}.wav")), &audio, WavEncoding::Pcm16)?;
        }
        Ok(())
    }

    fn stem_dir(&self, input: &Path, output_dir: &Path) -> PathBuf {
        let track = input.file_stem().unwrap().to_string_lossy().into_owned();
        output_dir.join("fakedemucs").join(track)
    }
}

pub fn peak_of_wav(path: &Path) -> f32 {
    let reader = hound::WavReader::open(path).unwrap();
    match reader.spec().sample_format {
        hound::SampleFormat::Float => reader
            .into_samples::<f32>()
            .map(|s| s.unwrap().abs())
            .fold(0.0, f32::max),
        hound::SampleFormat::Int => reader
            .into_samples::<i16>()
            .map(|s| (s.unwrap() as f32 / i16::MAX as f32).abs())
            .fold(0.0, f32::max),
    }
}
