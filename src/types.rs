use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Interleaved audio samples in nominal [-1, 1] full scale.
#[derive(Clone, Debug, PartialEq)]
pub struct AudioData {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub channels: u16,
}

impl AudioData {
    pub fn frames(&self) -> usize {
        if self.channels == 0 {
            0
        } else {
            self.samples.len() / self.channels as usize
        }
    }

    pub fn peak(&self) -> f32 {
        self.samples.iter().fold(0.0f32, |m, s| m.max(s.abs()))
    }
}

/// One named prompt from the prompts file.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PromptSpec {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub prompt: String,
}

impl PromptSpec {
    pub fn new(name: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            prompt: prompt.into(),
        }
    }

    /// Name used for take directories; falls back to `Prompt_{n}` (1-based).
    pub fn session_name(&self, index: usize) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| format!("Prompt_{}", index + 1))
    }
}

/// Top-level layout of the prompts YAML file.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct PromptFile {
    #[serde(default)]
    pub prompts: Option<Vec<PromptSpec>>,
}

#[derive(Clone, Debug)]
pub struct SessionConfig {
    /// Seconds of audio per take.
    pub duration: u32,
    /// Takes generated per prompt.
    pub takes: usize,
    pub output_root: PathBuf,
}

impl SessionConfig {
    pub fn validate(&self) -> crate::error::Result<()> {
        if self.duration == 0 {
            return Err(crate::error::SessionError::Config(
                "duration must be at least 1 second".into(),
            ));
        }
        if self.takes == 0 {
            return Err(crate::error::SessionError::Config(
                "takes must be at least 1".into(),
            ));
        }
        Ok(())
    }
}

/// Record written next to every take that made it past separation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TakeMetadata {
    pub name: String,
    pub prompt: String,
    pub take: usize,
    pub generated: String,
}

/// Counters reported at the end of a run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub prompts: usize,
    pub generation_calls: usize,
    pub takes: usize,
    pub backing_tracks: usize,
    pub separation_failures: usize,
    pub mix_failures: usize,
}

impl SessionSummary {
    pub fn failed_takes(&self) -> usize {
        self.separation_failures + self.mix_failures
    }
}
