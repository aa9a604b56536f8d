//! Generated config file resource.

use super::{ApplyContext, ApplyResult, Ensure, Resource, ResourceState};
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// The JSON document written to the daemon's config path.
///
/// Ensure-present writes the freshly generated content, overwriting
/// whatever is there; ensure-absent deletes unconditionally.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub path: PathBuf,
    pub content: String,
    pub ensure: Ensure,
}

impl ConfigFile {
    pub fn new(path: PathBuf, content: String, ensure: Ensure) -> Self {
        Self {
            path,
            content,
            ensure,
        }
    }

    /// The on-disk content, if the file exists.
    pub fn on_disk(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => {
                Err(e).with_context(|| format!("could not read {}", self.path.display()))
            }
        }
    }
}

impl Resource for ConfigFile {
    fn id(&self) -> String {
        format!("file:{}", self.path.display())
    }

    fn description(&self) -> String {
        match self.ensure {
            Ensure::Present => format!("Write config file {}", self.path.display()),
            Ensure::Absent => format!("Delete config file {}", self.path.display()),
        }
    }

    fn resource_type(&self) -> &'static str {
        "file"
    }

    fn current_state(&self) -> Result<ResourceState> {
        match self.on_disk()? {
            None => Ok(ResourceState::Absent),
            Some(text) if text == self.content && self.ensure == Ensure::Present => {
                Ok(ResourceState::Present { details: None })
            }
            Some(_) => Ok(ResourceState::Present {
                details: Some("content differs".to_string()),
            }),
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

        let existing = self.on_disk()?;
        match self.ensure {
            Ensure::Present => {
                if existing.as_deref() == Some(self.content.as_str()) {
                    return Ok(ApplyResult::NoChange);
                }
                fs::write(&self.path, &self.content)
                    .with_context(|| format!("could not write {}", self.path.display()))?;
                if existing.is_none() {
                    Ok(ApplyResult::Created)
                } else {
                    Ok(ApplyResult::Modified)
                }
            }
            Ensure::Absent => {
                if existing.is_none() {
                    return Ok(ApplyResult::NoChange);
                }
                fs::remove_file(&self.path)
                    .with_context(|| format!("could not remove {}", self.path.display()))?;
                Ok(ApplyResult::Removed)
            }
        }
    }
}
