use std::path::{Path, PathBuf};

pub const FULL_MIX_FILE: &str = "full_mix.wav";
pub const BACKING_TRACK_FILE: &str = "READY_FOR_BASS.wav";
pub const METADATA_FILE: &str = "metadata.yaml";
pub const DRUMS_STEM: &str = "drums.wav";
pub const OTHER_STEM: &str = "other.wav";

/// Whitespace and path separators become `_` so a prompt name can be used as a
/// directory name.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| {
            if c.is_whitespace() || c == '/' || c == '\\' {
                '_'
            } else {
                c
            }
        })
        .collect()
}

pub fn take_name(session_name: &str, take: usize) -> String {
    format!("{}_Take_{}", sanitize_name(session_name), take)
}

pub fn take_dir(output_root: &Path, session_name: &str, take: usize) -> PathBuf {
    output_root.join(take_name(session_name, take))
}
