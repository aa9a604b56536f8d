//! Status command: observed state of the declared instance.

use crate::Context;
use crate::declaration::Declaration;
use crate::engine::SystemContext;
use crate::state::ManagedService;
use crate::ui;
use anyhow::Result;

pub fn run(_ctx: &Context, declaration: &Declaration) -> Result<()> {
    let system = SystemContext::detect();
    let observed = ManagedService::observe(declaration, &system)?;

    ui::header(&observed.name);
    ui::kv(
        "installed",
        &if observed.installed {
            let version = observed.version.as_deref().unwrap_or("unknown");
            format!("yes ({version})")
        } else {
            "no".to_string()
        },
    );
    ui::kv("enabled", &observed.enabled.to_string());
    ui::kv("running", &observed.running.to_string());
    ui::kv(
        "config",
        &format!(
            "{} ({})",
            observed.config_path.display(),
            if observed.config_present {
                "present"
            } else {
                "missing"
            }
        ),
    );
    ui::kv("init system", &system.flavor.to_string());
    Ok(())
}
