//! Plan construction: the ordered step lists for each action.
//!
//! Install order satisfies each step's prerequisite: the package first,
//! then the init script, then the config directory, then the config file.
//! Uninstall runs the reverse: stop and disable the service, delete the
//! config file, conditionally the directory, the init script, and finally
//! the package.

use super::SystemContext;
use crate::confgen;
use crate::declaration::Declaration;
use crate::error::Result;
use crate::resource::{
    BoxedResource, ConfigDirectory, ConfigFile, Ensure, InitScript, NodePackage, ProxyService,
    ServiceAction,
};

/// An ordered list of reconciliation steps.
///
/// Steps run strictly in order; there is no privilege or parallelism
/// grouping to do here.
#[derive(Debug)]
pub struct Plan {
    pub steps: Vec<BoxedResource>,
}

impl Plan {
    pub fn len(&self) -> usize {
        self.steps.len()
    }
}

/// Build the install plan for a declaration.
///
/// Fails with `UnsupportedPlatform` before any step runs when the host's
/// init system cannot take the init script, and with a validation error
/// when the declaration is malformed.
pub fn install_plan(declaration: &Declaration, system: &SystemContext) -> Result<Plan> {
    let version = declaration.version()?;
    let settings = declaration.settings()?;
    let content = confgen::render(&confgen::generate(&settings))?;

    let steps: Vec<BoxedResource> = vec![
        Box::new(NodePackage::new(
            &declaration.name,
            version,
            Ensure::Present,
            system.packages.clone(),
        )),
        Box::new(InitScript::new(
            system.flavor,
            &system.init_dir,
            &declaration.name,
            &declaration.config_path,
            Ensure::Present,
        )?),
        Box::new(ConfigDirectory::new(
            declaration.config_dir(),
            Ensure::Present,
        )),
        Box::new(ConfigFile::new(
            declaration.config_path.clone(),
            content,
            Ensure::Present,
        )),
    ];

    Ok(Plan { steps })
}

/// Build the uninstall plan for a declaration, the install plan reversed.
pub fn uninstall_plan(declaration: &Declaration, system: &SystemContext) -> Result<Plan> {
    let version = declaration.version()?;

    let steps: Vec<BoxedResource> = vec![
        Box::new(ProxyService::new(
            &declaration.name,
            ServiceAction::Stop,
            system.services.clone(),
        )),
        Box::new(ProxyService::new(
            &declaration.name,
            ServiceAction::Disable,
            system.services.clone(),
        )),
        Box::new(ConfigFile::new(
            declaration.config_path.clone(),
            String::new(),
            Ensure::Absent,
        )),
        Box::new(ConfigDirectory::new(
            declaration.config_dir(),
            Ensure::Absent,
        )),
        Box::new(InitScript::new(
            system.flavor,
            &system.init_dir,
            &declaration.name,
            &declaration.config_path,
            Ensure::Absent,
        )?),
        Box::new(NodePackage::new(
            &declaration.name,
            version,
            Ensure::Absent,
            system.packages.clone(),
        )),
    ];

    Ok(Plan { steps })
}

/// Build a single-step plan for one service lifecycle action.
pub fn service_plan(declaration: &Declaration, action: ServiceAction, system: &SystemContext) -> Plan {
    Plan {
        steps: vec![Box::new(ProxyService::new(
            &declaration.name,
            action,
            system.services.clone(),
        ))],
    }
}
