use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::proposal::Proposal;

/// Reads proposal files (YAML, or JSON since YAML accepts it) relative to a
/// base directory.
pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    /// Loads and validates one proposal. A file without an `id` takes its
    /// file stem.
    pub fn load(&self, file: impl AsRef<Path>) -> Result<Proposal> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read proposal file {}", path.display()))?;
        let mut proposal: Proposal = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        if proposal.id.trim().is_empty() {
            proposal.id = path
                .file_stem()
                .map(|stem| stem.to_string_lossy().into_owned())
                .unwrap_or_else(|| "proposal".to_string());
        }
        proposal
            .input
            .validate()
            .with_context(|| format!("Invalid proposal in {}", path.display()))?;
        tracing::debug!(id = %proposal.id, path = %path.display(), "loaded proposal");
        Ok(proposal)
    }
}
