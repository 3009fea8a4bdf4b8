//! CLI argument parsing

use clap::Parser;
use std::path::PathBuf;

pub const DEFAULT_DURATION: u32 = 60;
pub const DEFAULT_TAKES: usize = 4;
pub const DEFAULT_OUTPUT_DIR: &str = "/workspace/sessions";

/// Generate bass-free backing tracks for live jam sessions
///
/// For every prompt in the prompts file, generates several takes, separates
/// their stems, and writes READY_FOR_BASS.wav (drums + other) per take.
#[derive(Parser, Debug)]
#[command(name = "backing-tracks")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to prompts YAML file
    #[arg(short, long, value_name = "PATH", default_value = "prompts.yaml")]
    pub prompts: PathBuf,

    /// Duration in seconds per track
    #[arg(short, long, value_name = "SECS", default_value_t = DEFAULT_DURATION)]
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    pub duration: u32,

    /// Number of takes per prompt
    #[arg(short, long, value_name = "N", default_value_t = DEFAULT_TAKES)]
    #[arg(value_parser = parse_takes)]
    pub takes: usize,

    /// Output directory
    #[arg(short, long, value_name = "DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output: PathBuf,

    /// Device for generation and separation
    #[arg(long, default_value = "cuda")]
    pub device: String,

    /// MusicGen checkpoint passed to the generator script
    #[arg(long, default_value = "facebook/musicgen-large")]
    pub generator_model: String,

    /// Demucs model variant
    #[arg(long, default_value = "htdemucs")]
    pub separator_model: String,

    /// Verbose output (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only print errors
    #[arg(short, long, default_value = "false")]
    pub quiet: bool,
}

fn parse_takes(s: &str) -> Result<usize, String> {
    let n: usize = s.parse().map_err(|e| format!("{e}"))?;
    if n == 0 {
        return Err("takes must be at least 1".into());
    }
    Ok(n)
}

impl Cli {
    /// Log filter implied by -v / -q
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_producer_defaults() {
        let cli = Cli::parse_from(["backing-tracks"]);
        assert_eq!(cli.prompts, PathBuf::from("prompts.yaml"));
        assert_eq!(cli.duration, 60);
        assert_eq!(cli.takes, 4);
        assert_eq!(cli.output, PathBuf::from("/workspace/sessions"));
    }

    #[test]
    fn short_flags() {
        let cli = Cli::parse_from(["backing-tracks", "-p", "jam.yaml", "-d", "45", "-t", "2", "-o", "out"]);
        assert_eq!(cli.prompts, PathBuf::from("jam.yaml"));
        assert_eq!(cli.duration, 45);
        assert_eq!(cli.takes, 2);
        assert_eq!(cli.output, PathBuf::from("out"));
    }

    #[test]
    fn zero_takes_rejected() {
        assert!(Cli::try_parse_from(["backing-tracks", "-t", "0"]).is_err());
        assert!(Cli::try_parse_from(["backing-tracks", "-d", "0"]).is_err());
    }
}
