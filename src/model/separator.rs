use std::{
    path::{Path, PathBuf},
    process::Command,
};

use tracing::{debug, error, info};

use crate::error::{Result, SessionError};

/// Output naming template handed to demucs: one directory per track.
pub const STEM_FILENAME_TEMPLATE: &str = "{track}/{stem}.{ext}";

/// Names of the stems the separator writes for each input.
pub const STEM_NAMES: [&str; 4] = ["drums", "bass", "other", "vocals"];

/// Splits one audio file into stems on disk.
pub trait StemSeparator {
    /// Separates `input` into stems under `output_dir`.
    fn separate(&self, input: &Path, output_dir: &Path) -> Result<()>;

    /// Directory the stems of `input` end up in after a successful `separate`.
    fn stem_dir(&self, input: &Path, output_dir: &Path) -> PathBuf;
}

#[derive(Clone, Debug)]
pub struct DemucsSeparator {
    pub program: String,
    pub model: String,
    pub device: String,
}

impl DemucsSeparator {
    pub fn new(program: impl Into<String>, model: impl Into<String>, device: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            model: model.into(),
            device: device.into(),
        }
    }

    pub fn command(&self, input: &Path, output_dir: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg("-n")
            .arg(&self.model)
            .arg("-d")
            .arg(&self.device)
            .arg("-o")
            .arg(output_dir)
            .arg("--filename")
            .arg(STEM_FILENAME_TEMPLATE)
            .arg(input);
        cmd
    }
}

impl StemSeparator for DemucsSeparator {
    fn separate(&self, input: &Path, output_dir: &Path) -> Result<()> {
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        info!("Separating stems for {}", name);

        let mut cmd = self.command(input, output_dir);
        debug!("Running {:?}", cmd);

        let output = cmd.output().map_err(|e| SessionError::Separation {
            input: input.to_path_buf(),
            reason: format!("could not run `{}`: {}", self.program, e),
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            error!("Demucs error: {}", stderr);
            return Err(SessionError::Separation {
                input: input.to_path_buf(),
                reason: format!("{} ({})", stderr, output.status),
            });
        }

        Ok(())
    }

    fn stem_dir(&self, input: &Path, output_dir: &Path) -> PathBuf {
        let track = input
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "output".into());
        output_dir.join(&self.model).join(track)
    }
}
