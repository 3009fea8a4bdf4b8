//! # backing-tracks
//!
//! Batch producer of bass-free backing tracks. For every prompt the
//! generator renders several takes in one batch; each take is separated into
//! stems and its drums and other stems are remixed into `READY_FOR_BASS.wav`.

pub mod audio;
pub mod config;
pub mod core;
pub mod error;
pub mod io;
pub mod model;
pub mod paths;
pub mod prompts;
pub mod types;
pub mod utils;

pub use crate::{
    audio::{read_audio, write_audio, write_loudness_normalized, WavEncoding},
    core::{
        mixer::{create_backing_track, mix_backing_track, mix_stems, PEAK_CEILING},
        session::{process_take, run_session, TakeOutcome},
    },
    error::{Result, SessionError},
    io::metadata::write_metadata,
    model::{DemucsSeparator, MusicGenerator, ScriptGenerator, StemSeparator, STEM_NAMES},
    prompts::load_prompts,
    types::{AudioData, PromptSpec, SessionConfig, SessionSummary, TakeMetadata},
};
