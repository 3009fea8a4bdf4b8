use std::{fs, path::Path};

use anyhow::Context;
use chrono::Local;

use crate::{
    error::Result,
    paths::METADATA_FILE,
    types::{PromptSpec, TakeMetadata},
};

pub fn take_metadata(prompt: &PromptSpec, take: usize) -> TakeMetadata {
    TakeMetadata {
        name: prompt.name.clone().unwrap_or_else(|| "Unknown".into()),
        prompt: prompt.prompt.clone(),
        take,
        generated: Local::now()
            .naive_local()
            .format("%Y-%m-%dT%H:%M:%S%.6f")
            .to_string(),
    }
}

/// Writes `metadata.yaml` into `take_dir`.
pub fn write_metadata(take_dir: &Path, prompt: &PromptSpec, take: usize) -> Result<()> {
    let record = take_metadata(prompt, take);
    let path = take_dir.join(METADATA_FILE);
    let yaml = serde_yml::to_string(&record)?;
    fs::write(&path, yaml).with_context(|| format!("Failed to write {:?}", path))?;
    Ok(())
}

pub fn read_metadata(take_dir: &Path) -> Result<TakeMetadata> {
    let path = take_dir.join(METADATA_FILE);
    let text =
        fs::read_to_string(&path).with_context(|| format!("Failed to read {:?}", path))?;
    Ok(serde_yml::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;
    use tempfile::tempdir;

    #[test]
    fn writes_all_fields() {
        let dir = tempdir().unwrap();
        let prompt = PromptSpec::new("Neo Soul", "rhodes, 85 bpm");
        write_metadata(dir.path(), &prompt, 3).unwrap();

        let back = read_metadata(dir.path()).unwrap();
        assert_eq!(back.name, "Neo Soul");
        assert_eq!(back.prompt, "rhodes, 85 bpm");
        assert_eq!(back.take, 3);
        assert!(NaiveDateTime::parse_from_str(&back.generated, "%Y-%m-%dT%H:%M:%S%.f").is_ok());
    }

    #[test]
    fn unnamed_prompt_is_unknown() {
        let prompt = PromptSpec {
            name: None,
            prompt: "x".into(),
        };
        assert_eq!(take_metadata(&prompt, 1).name, "Unknown");
    }
}
