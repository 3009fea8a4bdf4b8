use std::{
    path::{Path, PathBuf},
    process::Command,
};

use tempfile::tempdir;
use tracing::{debug, info, warn};

use crate::{
    audio::read_audio,
    error::{Result, SessionError},
    types::AudioData,
};

/// Text-to-music model. Loaded once per run and shared by every prompt.
pub trait MusicGenerator {
    /// Fixes the length of every take produced afterwards.
    fn set_duration(&mut self, seconds: u32);

    fn sample_rate(&self) -> u32;

    /// Generates one buffer per entry of `prompts`, in order, as a single batch.
    fn generate(&self, prompts: &[String]) -> Result<Vec<AudioData>>;

    /// Releases memory held between batches.
    fn reclaim(&mut self) {}

    fn device(&self) -> &str {
        "cpu"
    }
}

/// MusicGen driven through an external runner script.
///
/// Each batch is one invocation of
/// `<python> <script> --model M --device D --duration S --output DIR --prompt P...`
/// which must leave `take_1.wav .. take_N.wav` in `DIR`.
pub struct ScriptGenerator {
    python: String,
    script: PathBuf,
    model: String,
    device: String,
    duration: u32,
    sample_rate: u32,
}

/// Native output rate of MusicGen checkpoints.
pub const MUSICGEN_SAMPLE_RATE: u32 = 32_000;

impl ScriptGenerator {
    pub fn load(
        python: impl Into<String>,
        script: impl Into<PathBuf>,
        model: impl Into<String>,
        device: impl Into<String>,
    ) -> Result<Self> {
        let script = script.into();
        if !script.exists() {
            return Err(SessionError::Generation(format!(
                "generator script not found: {}",
                script.display()
            )));
        }

        let generator = Self {
            python: python.into(),
            script,
            model: model.into(),
            device: device.into(),
            duration: 0,
            sample_rate: MUSICGEN_SAMPLE_RATE,
        };
        info!(
            "Generator {} ready on {} via {}",
            generator.model,
            generator.device,
            generator.script.display()
        );
        Ok(generator)
    }

    pub fn command(&self, prompts: &[String], output_dir: &Path) -> Command {
        let mut cmd = Command::new(&self.python);
        cmd.arg(&self.script)
            .arg("--model")
            .arg(&self.model)
            .arg("--device")
            .arg(&self.device)
            .arg("--duration")
            .arg(self.duration.to_string())
            .arg("--output")
            .arg(output_dir);
        for p in prompts {
            cmd.arg("--prompt").arg(p);
        }
        cmd
    }
}

impl MusicGenerator for ScriptGenerator {
    fn set_duration(&mut self, seconds: u32) {
        self.duration = seconds;
    }

    fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    // Takes are read into memory and the scratch directory is removed on
    // return, so there is nothing left for `reclaim` to release.
    fn generate(&self, prompts: &[String]) -> Result<Vec<AudioData>> {
        let scratch = tempdir()?;
        let mut cmd = self.command(prompts, scratch.path());
        debug!("Running {:?}", cmd);

        let output = cmd.output().map_err(|e| {
            SessionError::Generation(format!("could not run `{}`: {}", self.python, e))
        })?;
        if !output.status.success() {
            return Err(SessionError::Generation(format!(
                "{} ({})",
                String::from_utf8_lossy(&output.stderr).trim(),
                output.status
            )));
        }

        let mut takes = Vec::with_capacity(prompts.len());
        for k in 1..=prompts.len() {
            let path = scratch.path().join(format!("take_{k}.wav"));
            if !path.exists() {
                warn!("Generator produced {} of {} takes", k - 1, prompts.len());
                break;
            }
            let audio = read_audio(&path)?;
            if audio.sample_rate != self.sample_rate {
                warn!(
                    "Take {} came back at {} Hz, expected {} Hz",
                    k, audio.sample_rate, self.sample_rate
                );
            }
            takes.push(audio);
        }

        Ok(takes)
    }

    fn device(&self) -> &str {
        &self.device
    }
}
