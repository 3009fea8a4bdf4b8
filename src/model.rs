//! External models: the text-to-music generator and the stem separator.

pub mod generator;
pub mod separator;

pub use generator::{MusicGenerator, ScriptGenerator};
pub use separator::{DemucsSeparator, StemSeparator, STEM_NAMES};
