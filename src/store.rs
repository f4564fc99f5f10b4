use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::proposal::{Proposal, ProposalInput};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("no proposal with id '{0}'")]
    UnknownProposal(String),
    #[error("proposal name must not be blank")]
    BlankName,
    #[error("cannot delete the only remaining proposal")]
    LastProposal,
}

/// On-disk layout: every proposal plus the one last being edited.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreFile {
    proposals: Vec<Proposal>,
    #[serde(default)]
    active: Option<String>,
}

/// A collection of proposals persisted as one JSON document.
pub struct ProposalStore {
    path: PathBuf,
    proposals: Vec<Proposal>,
    active: Option<String>,
}

impl ProposalStore {
    /// Opens the store at `path`. A missing, unreadable or empty store starts
    /// over with one reference proposal.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = match fs::read_to_string(&path) {
            Ok(text) => match serde_json::from_str::<StoreFile>(&text) {
                Ok(file) => file,
                Err(err) => {
                    warn!(path = %path.display(), %err, "proposal store is corrupt, starting fresh");
                    StoreFile::default()
                }
            },
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => StoreFile::default(),
            Err(err) => {
                return Err(err)
                    .with_context(|| format!("Failed to read proposal store {}", path.display()))
            }
        };

        let mut store = Self {
            path,
            proposals: file.proposals,
            active: file.active,
        };
        if store.proposals.is_empty() {
            let proposal = Proposal::new(store.next_id(Utc::now().timestamp_millis()));
            store.proposals.push(proposal);
        }
        store.repair_active();
        info!(
            path = %store.path.display(),
            proposals = store.proposals.len(),
            "opened proposal store"
        );
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create store directory {}", parent.display())
                })?;
            }
        }
        let file = StoreFile {
            proposals: self.proposals.clone(),
            active: self.active.clone(),
        };
        let json = serde_json::to_string_pretty(&file)?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write proposal store {}", self.path.display()))?;
        Ok(())
    }

    pub fn list(&self) -> &[Proposal] {
        &self.proposals
    }

    pub fn get(&self, id: &str) -> Option<&Proposal> {
        self.proposals.iter().find(|p| p.id == id)
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn active(&self) -> Option<&Proposal> {
        self.active.as_deref().and_then(|id| self.get(id))
    }

    /// Adds a reference proposal under a fresh id and makes it active.
    pub fn create(&mut self) -> &Proposal {
        self.create_at(Utc::now().timestamp_millis())
    }

    fn create_at(&mut self, millis: i64) -> &Proposal {
        let id = self.next_id(millis);
        let suffix = millis.rem_euclid(10_000);
        let mut proposal = Proposal::new(id.clone());
        proposal.farm_name = format!("New Farm {suffix:04}");
        info!(%id, "created proposal");
        self.proposals.push(proposal);
        self.active = Some(id);
        let last = self.proposals.len() - 1;
        &self.proposals[last]
    }

    pub fn select(&mut self, id: &str) -> Result<(), StoreError> {
        self.index_of(id)?;
        self.active = Some(id.to_string());
        Ok(())
    }

    pub fn rename(&mut self, id: &str, name: &str) -> Result<(), StoreError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(StoreError::BlankName);
        }
        let index = self.index_of(id)?;
        self.proposals[index].farm_name = name.to_string();
        Ok(())
    }

    pub fn update(&mut self, id: &str, input: ProposalInput) -> Result<&Proposal, StoreError> {
        let index = self.index_of(id)?;
        self.proposals[index].input = input;
        Ok(&self.proposals[index])
    }

    /// Removes a proposal. Deleting the active one hands focus to the first
    /// remaining proposal; the last proposal cannot be deleted.
    pub fn delete(&mut self, id: &str) -> Result<Proposal, StoreError> {
        let index = self.index_of(id)?;
        if self.proposals.len() <= 1 {
            return Err(StoreError::LastProposal);
        }
        let removed = self.proposals.remove(index);
        self.repair_active();
        info!(%id, remaining = self.proposals.len(), "deleted proposal");
        Ok(removed)
    }

    fn index_of(&self, id: &str) -> Result<usize, StoreError> {
        self.proposals
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| StoreError::UnknownProposal(id.to_string()))
    }

    fn repair_active(&mut self) {
        let valid = self
            .active
            .as_deref()
            .map(|id| self.get(id).is_some())
            .unwrap_or(false);
        if !valid {
            self.active = self.proposals.first().map(|p| p.id.clone());
        }
    }

    fn next_id(&self, millis: i64) -> String {
        let mut stamp = millis;
        loop {
            let id = format!("farm_{stamp}");
            if self.get(&id).is_none() {
                return id;
            }
            stamp += 1;
        }
    }
}
