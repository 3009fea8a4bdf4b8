use std::env;

pub fn demucs_bin() -> String {
    env::var("BACKING_TRACKS_DEMUCS_BIN").unwrap_or_else(|_| "demucs".to_string())
}

pub fn generator_script() -> String {
    env::var("BACKING_TRACKS_GENERATOR_SCRIPT")
        .unwrap_or_else(|_| "musicgen_runner.py".to_string())
}

pub fn python_bin() -> String {
    env::var("BACKING_TRACKS_PYTHON").unwrap_or_else(|_| "python3".to_string())
}
