//! Sequential plan execution.
//!
//! Steps run one at a time, in plan order, each blocking until its system
//! call finishes. A failing step aborts the remaining steps; there is no
//! rollback, because every step is idempotent and a rerun completes
//! whatever is still missing.

use super::planner::Plan;
use crate::resource::{ApplyContext, ApplyResult};
use anyhow::{Context, Result};

/// Options for execution
#[derive(Debug, Clone, Default)]
pub struct ExecuteOptions {
    /// Don't make changes, just show what would happen
    pub dry_run: bool,
    /// Verbose output
    pub verbose: bool,
}

/// Summary of execution results
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecuteSummary {
    pub created: usize,
    pub modified: usize,
    pub removed: usize,
    pub skipped: usize,
    pub no_change: usize,
}

impl ExecuteSummary {
    /// Total number of actual changes made
    pub fn total_changes(&self) -> usize {
        self.created + self.modified + self.removed
    }

    /// Total number of steps processed
    pub fn total(&self) -> usize {
        self.created + self.modified + self.removed + self.skipped + self.no_change
    }

    fn add_result(&mut self, result: &ApplyResult) {
        match result {
            ApplyResult::NoChange => self.no_change += 1,
            ApplyResult::Created => self.created += 1,
            ApplyResult::Modified => self.modified += 1,
            ApplyResult::Removed => self.removed += 1,
            ApplyResult::Skipped { .. } => self.skipped += 1,
        }
    }
}

/// Progress callback for execution
pub trait ProgressCallback {
    /// Called before a step's apply runs
    fn on_step_start(&mut self, index: usize, total: usize, description: &str);

    /// Called after a step's apply returns
    fn on_step_complete(&mut self, id: &str, result: &ApplyResult);
}

/// No-op progress callback
pub struct NoProgress;

impl ProgressCallback for NoProgress {
    fn on_step_start(&mut self, _index: usize, _total: usize, _description: &str) {}
    fn on_step_complete(&mut self, _id: &str, _result: &ApplyResult) {}
}

/// Execute a plan's steps in order, stopping at the first failure.
pub fn execute<P: ProgressCallback>(
    plan: &Plan,
    opts: &ExecuteOptions,
    progress: &mut P,
) -> Result<ExecuteSummary> {
    let mut summary = ExecuteSummary::default();
    let total = plan.len();

    for (index, step) in plan.steps.iter().enumerate() {
        progress.on_step_start(index + 1, total, &step.description());
        let ctx = ApplyContext::new(opts.dry_run, opts.verbose);
        let result = step
            .apply(&ctx)
            .with_context(|| format!("step failed: {}", step.description()))?;
        log::debug!("{} -> {:?}", step.id(), result);
        progress.on_step_complete(&step.id(), &result);
        summary.add_result(&result);
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::{Resource, ResourceState};
    use std::sync::{Arc, Mutex};

    #[derive(Debug)]
    struct TestStep {
        id: String,
        fail: bool,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl Resource for TestStep {
        fn id(&self) -> String {
            self.id.clone()
        }
        fn description(&self) -> String {
            format!("test step {}", self.id)
        }
        fn resource_type(&self) -> &'static str {
            "test"
        }
        fn current_state(&self) -> Result<ResourceState> {
            Ok(ResourceState::Absent)
        }
        fn desired_state(&self) -> ResourceState {
            ResourceState::Present { details: None }
        }
        fn apply(&self, ctx: &ApplyContext) -> Result<ApplyResult> {
            if ctx.dry_run {
                return Ok(ApplyResult::Skipped {
                    reason: "dry run".into(),
                });
            }
            self.log.lock().unwrap().push(self.id.clone());
            if self.fail {
                anyhow::bail!("boom");
            }
            Ok(ApplyResult::Created)
        }
    }

    fn plan_of(specs: &[(&str, bool)], log: &Arc<Mutex<Vec<String>>>) -> Plan {
        Plan {
            steps: specs
                .iter()
                .map(|(id, fail)| {
                    Box::new(TestStep {
                        id: (*id).to_string(),
                        fail: *fail,
                        log: log.clone(),
                    }) as crate::resource::BoxedResource
                })
                .collect(),
        }
    }

    #[test]
    fn steps_run_in_plan_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let plan = plan_of(&[("a", false), ("b", false), ("c", false)], &log);
        let summary = execute(&plan, &ExecuteOptions::default(), &mut NoProgress).unwrap();
        assert_eq!(log.lock().unwrap().as_slice(), ["a", "b", "c"]);
        assert_eq!(summary.created, 3);
    }

    #[test]
    fn failure_aborts_remaining_steps() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let plan = plan_of(&[("a", false), ("b", true), ("c", false)], &log);
        let err = execute(&plan, &ExecuteOptions::default(), &mut NoProgress).unwrap_err();
        assert!(err.to_string().contains("test step b"));
        assert_eq!(log.lock().unwrap().as_slice(), ["a", "b"]);
    }

    #[test]
    fn dry_run_touches_nothing() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let plan = plan_of(&[("a", false), ("b", false)], &log);
        let opts = ExecuteOptions {
            dry_run: true,
            verbose: false,
        };
        let summary = execute(&plan, &opts, &mut NoProgress).unwrap();
        assert!(log.lock().unwrap().is_empty());
        assert_eq!(summary.skipped, 2);
        assert_eq!(summary.total(), 2);
        assert_eq!(summary.total_changes(), 0);
    }
}
