use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the backing-tracks crate.
///
/// Per-take failures (separation, mixing) are contained by the session loop;
/// configuration and generation failures end the run.
#[derive(Debug, Error)]
pub enum SessionError {
    // Generic fallback (wraps anyhow)
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),

    #[error("Prompts file not found: {}", path.display())]
    PromptsNotFound { path: PathBuf },

    #[error("No prompts found in file")]
    NoPrompts,

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Stem separation failed for {}: {reason}", input.display())]
    Separation { input: PathBuf, reason: String },

    #[error("Missing stem {}", path.display())]
    MissingStem { path: PathBuf },

    #[error("Channel mismatch: drums has {drums} channels, other has {other}")]
    ChannelMismatch { drums: u16, other: u16 },

    #[error("Non-finite sample in mix of {}", path.display())]
    NonFiniteSample { path: PathBuf },

    #[error("Generation failed: {0}")]
    Generation(String),

    #[error("Audio contains no samples: {}", path.display())]
    EmptyAudio { path: PathBuf },
}

impl SessionError {
    /// True for failures that only spoil one take and must not stop the batch.
    pub fn is_take_recoverable(&self) -> bool {
        matches!(
            self,
            SessionError::Separation { .. }
                | SessionError::MissingStem { .. }
                | SessionError::ChannelMismatch { .. }
                | SessionError::EmptyAudio { .. }
                | SessionError::NonFiniteSample { .. }
        )
    }

    /// True when the run never started because its inputs were unusable.
    pub fn is_config_error(&self) -> bool {
        matches!(
            self,
            SessionError::PromptsNotFound { .. } | SessionError::NoPrompts | SessionError::Config(_)
        )
    }
}

// --- Implement From conversions for common errors ---
impl From<std::io::Error> for SessionError {
    fn from(e: std::io::Error) -> Self {
        SessionError::Anyhow(e.into())
    }
}

impl From<serde_yml::Error> for SessionError {
    fn from(e: serde_yml::Error) -> Self {
        SessionError::Anyhow(e.into())
    }
}

impl From<hound::Error> for SessionError {
    fn from(e: hound::Error) -> Self {
        SessionError::Anyhow(e.into())
    }
}

impl From<ndarray::ShapeError> for SessionError {
    fn from(e: ndarray::ShapeError) -> Self {
        SessionError::Anyhow(e.into())
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
