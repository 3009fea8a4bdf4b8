use std::{fs, path::Path};

use anyhow::Context;

use crate::{
    error::{Result, SessionError},
    types::{PromptFile, PromptSpec},
};

/// Loads the ordered prompt list. A missing `prompts` key or an empty file
/// both yield an empty list.
pub fn load_prompts<P: AsRef<Path>>(path: P) -> Result<Vec<PromptSpec>> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(SessionError::PromptsNotFound {
            path: path.to_path_buf(),
        });
    }

    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read prompts file: {:?}", path))?;
    parse_prompts(&text)
}

pub fn parse_prompts(text: &str) -> Result<Vec<PromptSpec>> {
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }
    let file: Option<PromptFile> = serde_yml::from_str(text)?;
    Ok(file.and_then(|f| f.prompts).unwrap_or_default())
}
