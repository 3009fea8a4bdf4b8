//! Runtime configuration settings

use std::path::PathBuf;

use crate::{
    types::SessionConfig,
    utils::{demucs_bin, generator_script, python_bin},
};

/// How the stem separator is invoked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeparatorSettings {
    pub program: String,
    pub model: String,
    pub device: String,
}

/// How the generator runner script is invoked
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorSettings {
    pub python: String,
    pub script: PathBuf,
    pub model: String,
    pub device: String,
}

/// Runtime settings for a producer run
#[derive(Debug, Clone)]
pub struct Settings {
    pub prompts_file: PathBuf,
    pub session: SessionConfig,
    pub separator: SeparatorSettings,
    pub generator: GeneratorSettings,
}

impl Settings {
    /// Create settings from CLI arguments, with program paths from the environment
    pub fn from_cli(cli: &super::cli::Cli) -> Self {
        Self {
            prompts_file: cli.prompts.clone(),
            session: SessionConfig {
                duration: cli.duration,
                takes: cli.takes,
                output_root: cli.output.clone(),
            },
            separator: SeparatorSettings {
                program: demucs_bin(),
                model: cli.separator_model.clone(),
                device: cli.device.clone(),
            },
            generator: GeneratorSettings {
                python: python_bin(),
                script: PathBuf::from(generator_script()),
                model: cli.generator_model.clone(),
                device: cli.device.clone(),
            },
        }
    }
}
