//! Observed runtime state of the managed service.

use crate::declaration::Declaration;
use crate::engine::SystemContext;
use anyhow::Result;
use std::path::PathBuf;

/// What the host currently reports about the declared instance.
#[derive(Debug, Clone)]
pub struct ManagedService {
    pub name: String,
    pub version: Option<String>,
    pub installed: bool,
    pub enabled: bool,
    pub running: bool,
    pub config_path: PathBuf,
    pub config_present: bool,
}

impl ManagedService {
    /// Query the collaborators for the current state of a declaration.
    pub fn observe(declaration: &Declaration, system: &SystemContext) -> Result<Self> {
        let version = system.packages.installed_version(&declaration.name)?;
        Ok(Self {
            name: declaration.name.clone(),
            installed: version.is_some(),
            version,
            enabled: system.services.is_enabled(&declaration.name)?,
            running: system.services.is_running(&declaration.name)?,
            config_path: declaration.config_path.clone(),
            config_present: declaration.config_path.is_file(),
        })
    }
}
