//! Npm package resource for the proxy daemon.

use super::{ApplyContext, ApplyResult, Ensure, Resource, ResourceState};
use crate::settings::Version;
use crate::system::PackageManager;
use anyhow::Result;
use std::sync::Arc;

/// The globally installed npm package for the daemon.
///
/// Version diffing is delegated to npm: an installed package satisfies
/// ensure-present regardless of the requested pin.
#[derive(Debug, Clone)]
pub struct NodePackage {
    pub name: String,
    pub version: Version,
    pub ensure: Ensure,
    packages: Arc<dyn PackageManager>,
}

impl NodePackage {
    pub fn new(
        name: &str,
        version: Version,
        ensure: Ensure,
        packages: Arc<dyn PackageManager>,
    ) -> Self {
        Self {
            name: name.to_string(),
            version,
            ensure,
            packages,
        }
    }
}

impl Resource for NodePackage {
    fn id(&self) -> String {
        format!("package:{}", self.name)
    }

    fn description(&self) -> String {
        match self.ensure {
            Ensure::Present => format!("Install npm package {} ({})", self.name, self.version),
            Ensure::Absent => format!("Uninstall npm package {}", self.name),
        }
    }

    fn resource_type(&self) -> &'static str {
        "package"
    }

    fn current_state(&self) -> Result<ResourceState> {
        match self.packages.installed_version(&self.name)? {
            Some(version) => Ok(ResourceState::Present {
                details: Some(version),
            }),
            None => Ok(ResourceState::Absent),
        }
    }

    fn desired_state(&self) -> ResourceState {
        match self.ensure {
            Ensure::Present => ResourceState::Present { details: None },
            Ensure::Absent => ResourceState::Absent,
        }
    }

    fn needs_apply(&self) -> Result<bool> {
        let installed = self.current_state()?.is_present();
        Ok(match self.ensure {
            Ensure::Present => !installed,
            Ensure::Absent => installed,
        })
    }

    fn apply(&self, ctx: &ApplyContext) -> Result<ApplyResult> {
        if ctx.dry_run {
            return Ok(ApplyResult::Skipped {
                reason: "dry run".to_string(),
            });
        }

        let installed = self.current_state()?.is_present();
        match self.ensure {
            Ensure::Present => {
                if installed {
                    return Ok(ApplyResult::NoChange);
                }
                log::info!("installing {} ({})", self.name, self.version);
                self.packages.install(&self.name, self.version.pin())?;
                Ok(ApplyResult::Created)
            }
            Ensure::Absent => {
                if !installed {
                    return Ok(ApplyResult::NoChange);
                }
                log::info!("uninstalling {}", self.name);
                self.packages.uninstall(&self.name)?;
                Ok(ApplyResult::Removed)
            }
        }
    }
}
