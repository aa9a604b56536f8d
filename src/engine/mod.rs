//! Reconciliation engine: ordered plans and a sequential executor.

pub mod executor;
pub mod planner;

pub use executor::{ExecuteOptions, ExecuteSummary, NoProgress, ProgressCallback, execute};
pub use planner::Plan;

use crate::platform::{self, InitFlavor};
use crate::system::{Npm, PackageManager, ServiceSupervisor, Upstart};
use std::path::PathBuf;
use std::sync::Arc;

/// Handles to the host facilities a plan reconciles against.
///
/// Tests construct this with fakes and a temp init directory.
#[derive(Debug, Clone)]
pub struct SystemContext {
    pub flavor: InitFlavor,
    pub init_dir: PathBuf,
    pub packages: Arc<dyn PackageManager>,
    pub services: Arc<dyn ServiceSupervisor>,
}

impl SystemContext {
    /// Probe the current host and wire up the real collaborators.
    pub fn detect() -> Self {
        let init_dir = PathBuf::from("/etc/init");
        Self {
            flavor: platform::detect(),
            init_dir: init_dir.clone(),
            packages: Arc::new(Npm),
            services: Arc::new(Upstart::new(init_dir)),
        }
    }
}
