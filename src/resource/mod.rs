//! Resource trait and types for declarative reconciliation.
//!
//! Every step of an install or uninstall is modeled as a Resource with:
//! - State detection (current vs desired)
//! - Apply function (converge current toward desired)
//!
//! Resources are idempotent: applying one that is already in its desired
//! state reports `NoChange`.

#![allow(dead_code)]

use anyhow::Result;
use std::fmt;

/// Target intent for a managed object.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ensure {
    Present,
    Absent,
}

/// Current or desired state of a resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState {
    /// Resource exists/is configured
    Present { details: Option<String> },
    /// Resource does not exist/is not configured
    Absent,
    /// State cannot be determined
    Unknown,
}

impl ResourceState {
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present { .. })
    }
}

/// Result of applying a resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApplyResult {
    /// No changes needed
    NoChange,
    /// Resource was created
    Created,
    /// Resource was modified
    Modified,
    /// Resource was removed
    Removed,
    /// Apply was skipped
    Skipped { reason: String },
}

impl ApplyResult {
    /// Check if the result represents a change
    pub fn is_change(&self) -> bool {
        matches!(self, Self::Created | Self::Modified | Self::Removed)
    }
}

/// Context passed to apply operations
pub struct ApplyContext {
    pub dry_run: bool,
    pub verbose: bool,
}

impl ApplyContext {
    pub fn new(dry_run: bool, verbose: bool) -> Self {
        Self { dry_run, verbose }
    }
}

/// Core trait for all reconciliation steps
pub trait Resource: fmt::Debug {
    /// Unique identifier for this resource (e.g. "package:hipache",
    /// "file:/etc/hipache.json")
    fn id(&self) -> String;

    /// Human-readable description
    fn description(&self) -> String;

    /// Resource type category (e.g. "package", "directory", "file",
    /// "init_script", "service")
    fn resource_type(&self) -> &'static str;

    /// Detect current state of this resource
    fn current_state(&self) -> Result<ResourceState>;

    /// Get the desired state (from the declaration)
    fn desired_state(&self) -> ResourceState;

    /// Check if resource needs changes
    fn needs_apply(&self) -> Result<bool> {
        let current = self.current_state()?;
        let desired = self.desired_state();
        Ok(current != desired)
    }

    /// Apply changes to reach desired state
    fn apply(&self, ctx: &ApplyContext) -> Result<ApplyResult>;
}

/// A boxed resource for type-erased plan storage
pub type BoxedResource = Box<dyn Resource>;

/// A diff between current and desired state
#[derive(Debug, Clone)]
pub struct ResourceDiff {
    pub resource_id: String,
    pub resource_type: String,
    pub description: String,
    pub current: ResourceState,
    pub desired: ResourceState,
}

impl ResourceDiff {
    /// Create a diff from a resource, returning None if no changes needed
    pub fn from_resource(resource: &dyn Resource) -> Result<Option<Self>> {
        let current = resource.current_state()?;
        let desired = resource.desired_state();

        if current == desired {
            return Ok(None);
        }

        Ok(Some(Self {
            resource_id: resource.id(),
            resource_type: resource.resource_type().to_string(),
            description: resource.description(),
            current,
            desired,
        }))
    }
}

/// Compute diffs for a plan's resources, keeping only the ones that differ.
pub fn compute_diffs(resources: &[BoxedResource]) -> Vec<ResourceDiff> {
    resources
        .iter()
        .filter_map(|r| ResourceDiff::from_resource(r.as_ref()).ok().flatten())
        .collect()
}

pub mod config_file;
pub mod directory;
pub mod init_script;
pub mod package;
pub mod service;

pub use config_file::ConfigFile;
pub use directory::ConfigDirectory;
pub use init_script::InitScript;
pub use package::NodePackage;
pub use service::{ProxyService, ServiceAction};
