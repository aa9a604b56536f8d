//! Config directory resource.

use super::{ApplyContext, ApplyResult, Ensure, Resource, ResourceState};
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// The directory holding the generated config file.
///
/// Removal only happens when the directory is empty; the parent path may
/// be shared with files this tool does not own.
#[derive(Debug, Clone)]
pub struct ConfigDirectory {
    pub path: PathBuf,
    pub ensure: Ensure,
}

impl ConfigDirectory {
    pub fn new(path: PathBuf, ensure: Ensure) -> Self {
        Self { path, ensure }
    }

    fn is_empty(&self) -> Result<bool> {
        let mut entries = fs::read_dir(&self.path)
            .with_context(|| format!("could not enumerate {}", self.path.display()))?;
        Ok(entries.next().is_none())
    }
}

impl Resource for ConfigDirectory {
    fn id(&self) -> String {
        format!("directory:{}", self.path.display())
    }

    fn description(&self) -> String {
        match self.ensure {
            Ensure::Present => format!("Create directory {}", self.path.display()),
            Ensure::Absent => format!("Remove directory {} if empty", self.path.display()),
        }
    }

    fn resource_type(&self) -> &'static str {
        "directory"
    }

    fn current_state(&self) -> Result<ResourceState> {
        if self.path.is_dir() {
            Ok(ResourceState::Present { details: None })
        } else {
            Ok(ResourceState::Absent)
        }
    }

    fn desired_state(&self) -> ResourceState {
        match self.ensure {
            Ensure::Present => ResourceState::Present { details: None },
            Ensure::Absent => ResourceState::Absent,
        }
    }

    fn apply(&self, ctx: &ApplyContext) -> Result<ApplyResult> {
        if ctx.dry_run {
            return Ok(ApplyResult::Skipped {
                reason: "dry run".to_string(),
            });
        }

        match self.ensure {
            Ensure::Present => {
                if self.path.is_dir() {
                    return Ok(ApplyResult::NoChange);
                }
                fs::create_dir_all(&self.path)
                    .with_context(|| format!("could not create {}", self.path.display()))?;
                Ok(ApplyResult::Created)
            }
            Ensure::Absent => {
                if !self.path.is_dir() {
                    return Ok(ApplyResult::NoChange);
                }
                if !self.is_empty()? {
                    log::debug!("{} is not empty, leaving it in place", self.path.display());
                    return Ok(ApplyResult::Skipped {
                        reason: format!("{} is not empty", self.path.display()),
                    });
                }
                fs::remove_dir(&self.path)
                    .with_context(|| format!("could not remove {}", self.path.display()))?;
                Ok(ApplyResult::Removed)
            }
        }
    }
}
