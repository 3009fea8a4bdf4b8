//! Session orchestration.
//!
//! One batched generation call per prompt, then separation, mixing and
//! metadata for each take in turn. A take that fails separation or mixing is
//! logged and left behind; the run moves on to the next take.

use std::{fs, path::Path};

use anyhow::Context;
use tracing::{debug, error, info, warn};

use crate::{
    audio::write_loudness_normalized,
    config::{GeneratorSettings, SeparatorSettings, Settings},
    core::mixer::create_backing_track,
    error::{Result, SessionError},
    io::metadata::write_metadata,
    model::{MusicGenerator, StemSeparator},
    paths::{take_dir, take_name, BACKING_TRACK_FILE, FULL_MIX_FILE},
    prompts::load_prompts,
    types::{AudioData, PromptSpec, SessionConfig, SessionSummary},
};

/// Every take produced a backing track.
pub const EXIT_OK: u8 = 0;
/// The run finished but some takes failed, or generation aborted it.
pub const EXIT_TAKES_FAILED: u8 = 1;
/// Nothing was produced: missing prompts file, no prompts, bad options.
pub const EXIT_CONFIG: u8 = 2;

const BANNER_WIDTH: usize = 60;
const PROMPT_PREVIEW_CHARS: usize = 80;

/// What became of a single take.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TakeOutcome {
    /// Backing track and metadata written.
    Ready,
    /// Separation worked but no backing track could be mixed; metadata written.
    MixFailed,
    /// Separation failed; only the full mix exists.
    SeparationFailed,
}

/// Runs every prompt through generation, separation, mixing and metadata.
///
/// `generator` must already be loaded; its duration is set here once for the
/// whole run.
pub fn run_session(
    prompts: &[PromptSpec],
    config: &SessionConfig,
    generator: &mut dyn MusicGenerator,
    separator: &dyn StemSeparator,
) -> Result<SessionSummary> {
    config.validate()?;
    if prompts.is_empty() {
        return Err(SessionError::NoPrompts);
    }

    println!(">>> Loaded {} prompts", prompts.len());
    println!(">>> Duration: {}s per track", config.duration);
    println!(">>> Takes: {} per prompt", config.takes);
    println!(">>> Total tracks to generate: {}", prompts.len() * config.takes);
    println!();

    fs::create_dir_all(&config.output_root)
        .with_context(|| format!("Failed to create output root {:?}", config.output_root))?;

    generator.set_duration(config.duration);
    info!(
        "Generator configured on {} at {} Hz",
        generator.device(),
        generator.sample_rate()
    );

    let mut summary = SessionSummary {
        prompts: prompts.len(),
        ..Default::default()
    };

    for (i, prompt) in prompts.iter().enumerate() {
        let session_name = prompt.session_name(i);

        println!();
        println!("{}", "=".repeat(BANNER_WIDTH));
        println!("SESSION {}/{}: {}", i + 1, prompts.len(), session_name);
        println!("{}", "=".repeat(BANNER_WIDTH));
        println!("Prompt: {}...", preview(&prompt.prompt));
        println!();

        info!("Generating {} takes", config.takes);
        let batch = vec![prompt.prompt.clone(); config.takes];
        let wavs = generator.generate(&batch)?;
        summary.generation_calls += 1;
        if wavs.len() != config.takes {
            warn!(
                "Requested {} takes for {}, generator returned {}",
                config.takes,
                session_name,
                wavs.len()
            );
        }

        for (take_idx, wav) in wavs.iter().enumerate() {
            let take = take_idx + 1;
            println!();
            println!("   --- Take {}/{} ---", take, config.takes);

            summary.takes += 1;
            match process_take(&config.output_root, &session_name, prompt, take, wav, separator)? {
                TakeOutcome::Ready => summary.backing_tracks += 1,
                TakeOutcome::MixFailed => summary.mix_failures += 1,
                TakeOutcome::SeparationFailed => summary.separation_failures += 1,
            }
        }

        generator.reclaim();
        debug!("Reclaimed generator resources after {}", session_name);
    }

    println!();
    println!("{}", "=".repeat(BANNER_WIDTH));
    println!(">>> ALL SESSIONS COMPLETE");
    println!(">>> Output: {}", config.output_root.display());
    println!(
        ">>> Backing tracks: {}/{} ({} separation failures, {} mix failures)",
        summary.backing_tracks, summary.takes, summary.separation_failures, summary.mix_failures
    );
    println!("{}", "=".repeat(BANNER_WIDTH));

    Ok(summary)
}

/// Validates settings and loads prompts before any model is touched, then
/// runs the session. Returns the number of failed takes.
///
/// `load_generator` is only called once the prompts are known to be usable.
pub fn run<G, S>(
    settings: &Settings,
    load_generator: impl FnOnce(&GeneratorSettings) -> Result<G>,
    make_separator: impl FnOnce(&SeparatorSettings) -> S,
) -> Result<usize>
where
    G: MusicGenerator,
    S: StemSeparator,
{
    settings.session.validate()?;

    let prompts = load_prompts(&settings.prompts_file)?;
    if prompts.is_empty() {
        return Err(SessionError::NoPrompts);
    }

    println!(">>> Loading {} generator...", settings.generator.model);
    let mut generator = load_generator(&settings.generator)?;
    println!(">>> Model loaded on {}", generator.device());
    println!();

    let separator = make_separator(&settings.separator);

    let summary = run_session(&prompts, &settings.session, &mut generator, &separator)?;
    Ok(summary.failed_takes())
}

/// Process exit code for the result of [`run`].
pub fn exit_code(result: &Result<usize>) -> u8 {
    match result {
        Ok(0) => EXIT_OK,
        Ok(_) => EXIT_TAKES_FAILED,
        Err(e) if e.is_config_error() => EXIT_CONFIG,
        Err(_) => EXIT_TAKES_FAILED,
    }
}

/// Saves, separates, mixes and describes one take. Only I/O failures on the
/// take directory itself are returned as errors.
pub fn process_take(
    output_root: &Path,
    session_name: &str,
    prompt: &PromptSpec,
    take: usize,
    wav: &AudioData,
    separator: &dyn StemSeparator,
) -> Result<TakeOutcome> {
    let name = take_name(session_name, take);
    let dir = take_dir(output_root, session_name, take);
    fs::create_dir_all(&dir).with_context(|| format!("Failed to create take dir {:?}", dir))?;

    let full_mix = dir.join(FULL_MIX_FILE);
    write_loudness_normalized(&full_mix, wav)?;
    info!("Saved full mix for {}", name);

    if let Err(e) = separator.separate(&full_mix, &dir) {
        error!("Stem separation failed for {}: {}", name, e);
        return Ok(TakeOutcome::SeparationFailed);
    }

    let stem_dir = separator.stem_dir(&full_mix, &dir);
    let outcome = if create_backing_track(&stem_dir, &dir.join(BACKING_TRACK_FILE)) {
        TakeOutcome::Ready
    } else {
        warn!("No {} for {}", BACKING_TRACK_FILE, name);
        TakeOutcome::MixFailed
    };

    write_metadata(&dir, prompt, take)?;
    Ok(outcome)
}

fn preview(text: &str) -> String {
    text.chars().take(PROMPT_PREVIEW_CHARS).collect()
}
