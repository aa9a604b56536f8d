//! System collaborators: package manager and service supervisor.
//!
//! Reconciliation resources talk to the host through these traits so plans
//! can be exercised against fakes. The real implementations shell out to
//! `npm` and `initctl`; neither retries, and failures propagate to abort
//! the remaining plan steps.

use anyhow::{Context, Result, bail};
use std::fmt;
use std::path::PathBuf;
use std::process::Command;

/// Installs and removes the proxy's npm package.
pub trait PackageManager: Send + Sync + fmt::Debug {
    /// The installed version of a global package, if present.
    fn installed_version(&self, name: &str) -> Result<Option<String>>;

    /// Install a global package, pinned when a version is given.
    fn install(&self, name: &str, version: Option<&str>) -> Result<()>;

    /// Uninstall a global package.
    fn uninstall(&self, name: &str) -> Result<()>;
}

/// Drives service enable/disable/start/stop and status queries.
pub trait ServiceSupervisor: Send + Sync + fmt::Debug {
    fn enable(&self, name: &str) -> Result<()>;
    fn disable(&self, name: &str) -> Result<()>;
    fn start(&self, name: &str) -> Result<()>;
    fn stop(&self, name: &str) -> Result<()>;
    fn is_running(&self, name: &str) -> Result<bool>;
    fn is_enabled(&self, name: &str) -> Result<bool>;
}

/// Global npm, the package manager the Hipache daemon ships through.
#[derive(Debug, Clone, Default)]
pub struct Npm;

impl Npm {
    fn run(&self, args: &[&str]) -> Result<std::process::Output> {
        Command::new("npm")
            .args(args)
            .output()
            .with_context(|| format!("failed to execute: npm {}", args.join(" ")))
    }
}

impl PackageManager for Npm {
    fn installed_version(&self, name: &str) -> Result<Option<String>> {
        let output = self.run(&["ls", "--global", "--depth=0", "--json", name])?;
        // npm ls exits non-zero when the package is missing; the JSON body
        // still tells us what we need.
        let json: serde_json::Value = match serde_json::from_slice(&output.stdout) {
            Ok(v) => v,
            Err(_) => return Ok(None),
        };
        Ok(json["dependencies"][name]["version"]
            .as_str()
            .map(str::to_string))
    }

    fn install(&self, name: &str, version: Option<&str>) -> Result<()> {
        let spec = match version {
            Some(v) => format!("{name}@{v}"),
            None => name.to_string(),
        };
        let output = self.run(&["install", "--global", &spec])?;
        if !output.status.success() {
            bail!(
                "npm install {} failed: {}",
                spec,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(())
    }

    fn uninstall(&self, name: &str) -> Result<()> {
        let output = self.run(&["uninstall", "--global", name])?;
        if !output.status.success() {
            bail!(
                "npm uninstall {} failed: {}",
                name,
                String::from_utf8_lossy(&output.stderr).trim()
            );
        }
        Ok(())
    }
}

/// Upstart supervision via `initctl`.
///
/// Enablement is modeled the Upstart way: a job with a `<name>.override`
/// file containing `manual` will not start on boot. Enable removes the
/// override, disable writes it.
#[derive(Debug, Clone)]
pub struct Upstart {
    init_dir: PathBuf,
}

impl Default for Upstart {
    fn default() -> Self {
        Self {
            init_dir: PathBuf::from("/etc/init"),
        }
    }
}

impl Upstart {
    pub fn new(init_dir: PathBuf) -> Self {
        Self { init_dir }
    }

    fn override_path(&self, name: &str) -> PathBuf {
        self.init_dir.join(format!("{name}.override"))
    }

    fn initctl(&self, action: &str, name: &str) -> Result<std::process::Output> {
        Command::new("initctl")
            .args([action, name])
            .output()
            .with_context(|| format!("failed to execute: initctl {action} {name}"))
    }
}

impl ServiceSupervisor for Upstart {
    fn enable(&self, name: &str) -> Result<()> {
        let path = self.override_path(name);
        if path.exists() {
            std::fs::remove_file(&path)
                .with_context(|| format!("could not remove {}", path.display()))?;
        }
        Ok(())
    }

    fn disable(&self, name: &str) -> Result<()> {
        let path = self.override_path(name);
        std::fs::write(&path, "manual\n")
            .with_context(|| format!("could not write {}", path.display()))?;
        Ok(())
    }

    fn start(&self, name: &str) -> Result<()> {
        let output = self.initctl("start", name)?;
        let stderr = String::from_utf8_lossy(&output.stderr);
        // Starting an already-running job is a no-op, not a failure
        if !output.status.success() && !stderr.contains("already running") {
            bail!("initctl start {} failed: {}", name, stderr.trim());
        }
        Ok(())
    }

    fn stop(&self, name: &str) -> Result<()> {
        let output = self.initctl("stop", name)?;
        let stderr = String::from_utf8_lossy(&output.stderr);
        if !output.status.success() && !stderr.contains("Unknown instance") {
            bail!("initctl stop {} failed: {}", name, stderr.trim());
        }
        Ok(())
    }

    fn is_running(&self, name: &str) -> Result<bool> {
        let output = self.initctl("status", name)?;
        Ok(String::from_utf8_lossy(&output.stdout).contains("start/running"))
    }

    fn is_enabled(&self, name: &str) -> Result<bool> {
        Ok(!self.override_path(name).exists())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn upstart_enable_disable_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let upstart = Upstart::new(dir.path().to_path_buf());

        assert!(upstart.is_enabled("hipache").unwrap());
        upstart.disable("hipache").unwrap();
        assert!(!upstart.is_enabled("hipache").unwrap());
        let contents = std::fs::read_to_string(dir.path().join("hipache.override")).unwrap();
        assert_eq!(contents, "manual\n");

        upstart.enable("hipache").unwrap();
        assert!(upstart.is_enabled("hipache").unwrap());
    }

    #[test]
    fn upstart_enable_when_already_enabled_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let upstart = Upstart::new(dir.path().to_path_buf());
        upstart.enable("hipache").unwrap();
        upstart.enable("hipache").unwrap();
    }
}
