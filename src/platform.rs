//! Init-system detection and init-script rendering.
//!
//! Only Upstart gets an init script; the template is the one unit style
//! this tool knows how to render. Requesting it anywhere else fails loudly
//! with `UnsupportedPlatform` instead of silently degrading.

use crate::error::{Error, Result};
use std::fmt;
use std::path::Path;

/// The init system supervising services on this host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitFlavor {
    Upstart,
    Systemd,
    Unknown,
}

impl InitFlavor {
    /// Whether this flavor supports the init-script template.
    pub fn supports_init_script(self) -> bool {
        self == Self::Upstart
    }
}

impl fmt::Display for InitFlavor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Upstart => write!(f, "upstart"),
            Self::Systemd => write!(f, "systemd"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// Detect the init system of the current host.
pub fn detect() -> InitFlavor {
    if Path::new("/run/systemd/system").is_dir() {
        InitFlavor::Systemd
    } else if Path::new("/sbin/initctl").exists() {
        InitFlavor::Upstart
    } else {
        InitFlavor::Unknown
    }
}

/// Upstart job definition for the proxy daemon.
const UPSTART_TEMPLATE: &str = "\
description \"Hipache distributed proxy\"

start on (local-filesystems and net-device-up IFACE!=lo)
stop on runlevel [!2345]

respawn
respawn limit 10 5

exec {executable} --config {conf_file}
";

/// Render the Upstart job for the given flavor.
///
/// Template variables are the daemon binary name and the config file path.
pub fn render_init_script(
    flavor: InitFlavor,
    executable: &str,
    conf_file: &Path,
) -> Result<String> {
    if !flavor.supports_init_script() {
        return Err(Error::UnsupportedPlatform {
            init_system: flavor.to_string(),
        });
    }
    Ok(UPSTART_TEMPLATE
        .replace("{executable}", executable)
        .replace("{conf_file}", &conf_file.display().to_string()))
}
