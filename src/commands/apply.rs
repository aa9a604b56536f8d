//! Install and uninstall commands.

use crate::Context;
use crate::declaration::Declaration;
use crate::engine::{self, ExecuteOptions, ExecuteSummary, ProgressCallback, SystemContext, planner};
use crate::resource::ApplyResult;
use crate::ui;
use anyhow::Result;

/// Terminal progress reporting for plan execution.
struct UiProgress {
    quiet: bool,
}

impl ProgressCallback for UiProgress {
    fn on_step_start(&mut self, index: usize, total: usize, description: &str) {
        if !self.quiet {
            ui::step(index, total, description);
        }
    }

    fn on_step_complete(&mut self, _id: &str, result: &ApplyResult) {
        if self.quiet {
            return;
        }
        match result {
            ApplyResult::NoChange => ui::dim("already up to date"),
            ApplyResult::Skipped { reason } => ui::dim(&format!("skipped: {reason}")),
            _ => {}
        }
    }
}

pub fn install(ctx: &Context, declaration: &Declaration, dry_run: bool) -> Result<()> {
    declaration.validate()?;
    let system = SystemContext::detect();
    let plan = planner::install_plan(declaration, &system)?;
    run_plan(ctx, &plan, dry_run, &format!("install {}", declaration.name))
}

pub fn uninstall(ctx: &Context, declaration: &Declaration, dry_run: bool) -> Result<()> {
    let system = SystemContext::detect();
    let plan = planner::uninstall_plan(declaration, &system)?;
    run_plan(
        ctx,
        &plan,
        dry_run,
        &format!("uninstall {}", declaration.name),
    )
}

fn run_plan(ctx: &Context, plan: &planner::Plan, dry_run: bool, what: &str) -> Result<()> {
    if dry_run && !ctx.quiet {
        ui::info(&format!("dry run: no changes will be made ({what})"));
        for diff in crate::resource::compute_diffs(&plan.steps) {
            ui::kv(&diff.resource_id, &diff.description);
        }
    }

    let opts = ExecuteOptions {
        dry_run,
        verbose: ctx.verbose > 0,
    };
    let mut progress = UiProgress { quiet: ctx.quiet };
    let summary = engine::execute(plan, &opts, &mut progress)?;

    if !ctx.quiet {
        report(&summary, what);
    }
    Ok(())
}

fn report(summary: &ExecuteSummary, what: &str) {
    if summary.total_changes() == 0 {
        ui::success(&format!("{what}: nothing to change"));
    } else {
        ui::success(&format!(
            "{what}: {} created, {} modified, {} removed",
            summary.created, summary.modified, summary.removed
        ));
    }
    if summary.skipped > 0 {
        ui::dim(&format!("{} step(s) skipped", summary.skipped));
    }
}
