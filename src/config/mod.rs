//! Configuration and CLI handling

pub mod cli;
pub mod settings;

pub use cli::Cli;
pub use settings::{GeneratorSettings, SeparatorSettings, Settings};
