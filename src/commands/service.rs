//! Service lifecycle commands: enable, disable, start, stop.

use crate::Context;
use crate::declaration::Declaration;
use crate::engine::{self, ExecuteOptions, NoProgress, SystemContext, planner};
use crate::resource::ServiceAction;
use crate::state::ManagedService;
use crate::ui;
use anyhow::Result;

pub fn run(ctx: &Context, declaration: &Declaration, action: ServiceAction) -> Result<()> {
    let system = SystemContext::detect();
    let plan = planner::service_plan(declaration, action, &system);
    let opts = ExecuteOptions {
        dry_run: false,
        verbose: ctx.verbose > 0,
    };
    let summary = engine::execute(&plan, &opts, &mut NoProgress)?;

    // Surface the post-action state the supervisor reports
    let observed = ManagedService::observe(declaration, &system)?;
    if !ctx.quiet {
        if summary.total_changes() == 0 {
            ui::info(&format!("{} {}: no change needed", action, declaration.name));
        } else {
            ui::success(&format!("{} {}: done", action, declaration.name));
        }
        ui::kv("enabled", &observed.enabled.to_string());
        ui::kv("running", &observed.running.to_string());
    }
    Ok(())
}
