//! Upstart init script resource.

use super::{ApplyContext, ApplyResult, Ensure, Resource, ResourceState};
use crate::platform::{self, InitFlavor};
use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// The rendered Upstart job at `<init_dir>/<name>.conf`.
///
/// Construction validates the init flavor, so an unsupported platform
/// fails at plan time rather than halfway through an apply.
#[derive(Debug, Clone)]
pub struct InitScript {
    pub path: PathBuf,
    pub content: String,
    pub ensure: Ensure,
}

impl InitScript {
    pub fn new(
        flavor: InitFlavor,
        init_dir: &Path,
        name: &str,
        conf_file: &Path,
        ensure: Ensure,
    ) -> crate::error::Result<Self> {
        let content = platform::render_init_script(flavor, name, conf_file)?;
        Ok(Self {
            path: init_dir.join(format!("{name}.conf")),
            content,
            ensure,
        })
    }
}

impl Resource for InitScript {
    fn id(&self) -> String {
        format!("init_script:{}", self.path.display())
    }

    fn description(&self) -> String {
        match self.ensure {
            Ensure::Present => format!("Write init script {}", self.path.display()),
            Ensure::Absent => format!("Delete init script {}", self.path.display()),
        }
    }

    fn resource_type(&self) -> &'static str {
        "init_script"
    }

    fn current_state(&self) -> Result<ResourceState> {
        match fs::read_to_string(&self.path) {
            Ok(text) if text == self.content && self.ensure == Ensure::Present => {
                Ok(ResourceState::Present { details: None })
            }
            Ok(_) => Ok(ResourceState::Present {
                details: Some("content differs".to_string()),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(ResourceState::Absent),
            Err(e) => Err(e).with_context(|| format!("could not read {}", self.path.display())),
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

        let exists = self.path.exists();
        match self.ensure {
            Ensure::Present => {
                if exists && fs::read_to_string(&self.path)? == self.content {
                    return Ok(ApplyResult::NoChange);
                }
                fs::write(&self.path, &self.content)
                    .with_context(|| format!("could not write {}", self.path.display()))?;
                if exists {
                    Ok(ApplyResult::Modified)
                } else {
                    Ok(ApplyResult::Created)
                }
            }
            Ensure::Absent => {
                if !exists {
                    return Ok(ApplyResult::NoChange);
                }
                fs::remove_file(&self.path)
                    .with_context(|| format!("could not remove {}", self.path.display()))?;
                Ok(ApplyResult::Removed)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    #[test]
    fn writes_the_rendered_job() {
        let dir = tempfile::tempdir().unwrap();
        let script = InitScript::new(
            InitFlavor::Upstart,
            dir.path(),
            "hipache",
            &PathBuf::from("/etc/hipache.json"),
            Ensure::Present,
        )
        .unwrap();

        assert_eq!(
            script.apply(&ApplyContext::new(false, false)).unwrap(),
            ApplyResult::Created
        );
        let written = fs::read_to_string(dir.path().join("hipache.conf")).unwrap();
        assert!(written.contains("exec hipache --config /etc/hipache.json"));
    }

    #[test]
    fn systemd_is_rejected_at_construction() {
        let dir = tempfile::tempdir().unwrap();
        let err = InitScript::new(
            InitFlavor::Systemd,
            dir.path(),
            "hipache",
            &PathBuf::from("/etc/hipache.json"),
            Ensure::Present,
        )
        .unwrap_err();
        assert!(matches!(err, Error::UnsupportedPlatform { .. }));
    }

    #[test]
    fn removes_the_job_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hipache.conf");
        fs::write(&path, "stale").unwrap();

        let script = InitScript::new(
            InitFlavor::Upstart,
            dir.path(),
            "hipache",
            &PathBuf::from("/etc/hipache.json"),
            Ensure::Absent,
        )
        .unwrap();
        assert_eq!(
            script.apply(&ApplyContext::new(false, false)).unwrap(),
            ApplyResult::Removed
        );
        assert!(!path.exists());
    }
}
