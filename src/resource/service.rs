//! Service lifecycle resource.

use super::{ApplyContext, ApplyResult, Resource, ResourceState};
use crate::system::ServiceSupervisor;
use anyhow::Result;
use std::fmt;
use std::sync::Arc;

/// One of the four lifecycle actions delegated to the supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServiceAction {
    Enable,
    Disable,
    Start,
    Stop,
}

impl fmt::Display for ServiceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Enable => write!(f, "enable"),
            Self::Disable => write!(f, "disable"),
            Self::Start => write!(f, "start"),
            Self::Stop => write!(f, "stop"),
        }
    }
}

/// The supervised proxy service.
///
/// The mechanism is entirely the supervisor's; this resource maps the
/// action onto present/absent states so diffs and idempotence work, and
/// logs the observed post-action state.
#[derive(Debug, Clone)]
pub struct ProxyService {
    pub name: String,
    pub action: ServiceAction,
    services: Arc<dyn ServiceSupervisor>,
}

impl ProxyService {
    pub fn new(name: &str, action: ServiceAction, services: Arc<dyn ServiceSupervisor>) -> Self {
        Self {
            name: name.to_string(),
            action,
            services,
        }
    }

    fn observed(&self) -> Result<bool> {
        match self.action {
            ServiceAction::Enable | ServiceAction::Disable => {
                self.services.is_enabled(&self.name)
            }
            ServiceAction::Start | ServiceAction::Stop => self.services.is_running(&self.name),
        }
    }
}

impl Resource for ProxyService {
    fn id(&self) -> String {
        format!("service:{}:{}", self.name, self.action)
    }

    fn description(&self) -> String {
        let verb = match self.action {
            ServiceAction::Enable => "Enable",
            ServiceAction::Disable => "Disable",
            ServiceAction::Start => "Start",
            ServiceAction::Stop => "Stop",
        };
        format!("{verb} service {}", self.name)
    }

    fn resource_type(&self) -> &'static str {
        "service"
    }

    fn current_state(&self) -> Result<ResourceState> {
        if self.observed()? {
            Ok(ResourceState::Present { details: None })
        } else {
            Ok(ResourceState::Absent)
        }
    }

    fn desired_state(&self) -> ResourceState {
        match self.action {
            ServiceAction::Enable | ServiceAction::Start => {
                ResourceState::Present { details: None }
            }
            ServiceAction::Disable | ServiceAction::Stop => ResourceState::Absent,
        }
    }

    fn apply(&self, ctx: &ApplyContext) -> Result<ApplyResult> {
        if ctx.dry_run {
            return Ok(ApplyResult::Skipped {
                reason: "dry run".to_string(),
            });
        }

        if !self.needs_apply()? {
            return Ok(ApplyResult::NoChange);
        }

        match self.action {
            ServiceAction::Enable => self.services.enable(&self.name)?,
            ServiceAction::Disable => self.services.disable(&self.name)?,
            ServiceAction::Start => self.services.start(&self.name)?,
            ServiceAction::Stop => self.services.stop(&self.name)?,
        }

        // Record what the supervisor reports after acting
        let observed = self.observed()?;
        log::info!(
            "service {} after {}: enabled/running = {}",
            self.name,
            self.action,
            observed
        );

        Ok(ApplyResult::Modified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct FakeSupervisor {
        enabled: Mutex<bool>,
        running: Mutex<bool>,
        calls: Mutex<Vec<String>>,
    }

    impl ServiceSupervisor for FakeSupervisor {
        fn enable(&self, name: &str) -> Result<()> {
            self.calls.lock().unwrap().push(format!("enable {name}"));
            *self.enabled.lock().unwrap() = true;
            Ok(())
        }
        fn disable(&self, name: &str) -> Result<()> {
            self.calls.lock().unwrap().push(format!("disable {name}"));
            *self.enabled.lock().unwrap() = false;
            Ok(())
        }
        fn start(&self, name: &str) -> Result<()> {
            self.calls.lock().unwrap().push(format!("start {name}"));
            *self.running.lock().unwrap() = true;
            Ok(())
        }
        fn stop(&self, name: &str) -> Result<()> {
            self.calls.lock().unwrap().push(format!("stop {name}"));
            *self.running.lock().unwrap() = false;
            Ok(())
        }
        fn is_running(&self, _name: &str) -> Result<bool> {
            Ok(*self.running.lock().unwrap())
        }
        fn is_enabled(&self, _name: &str) -> Result<bool> {
            Ok(*self.enabled.lock().unwrap())
        }
    }

    #[test]
    fn start_delegates_to_the_supervisor() {
        let supervisor = Arc::new(FakeSupervisor::default());
        let service = ProxyService::new("hipache", ServiceAction::Start, supervisor.clone());
        assert_eq!(
            service.apply(&ApplyContext::new(false, false)).unwrap(),
            ApplyResult::Modified
        );
        assert_eq!(supervisor.calls.lock().unwrap().as_slice(), ["start hipache"]);
    }

    #[test]
    fn stopping_a_stopped_service_is_a_noop() {
        let supervisor = Arc::new(FakeSupervisor::default());
        let service = ProxyService::new("hipache", ServiceAction::Stop, supervisor.clone());
        assert_eq!(
            service.apply(&ApplyContext::new(false, false)).unwrap(),
            ApplyResult::NoChange
        );
        assert!(supervisor.calls.lock().unwrap().is_empty());
    }

    #[test]
    fn enable_then_disable_converges() {
        let supervisor = Arc::new(FakeSupervisor::default());
        let enable = ProxyService::new("hipache", ServiceAction::Enable, supervisor.clone());
        let disable = ProxyService::new("hipache", ServiceAction::Disable, supervisor.clone());

        enable.apply(&ApplyContext::new(false, false)).unwrap();
        assert!(supervisor.is_enabled("hipache").unwrap());
        disable.apply(&ApplyContext::new(false, false)).unwrap();
        assert!(!supervisor.is_enabled("hipache").unwrap());
    }
}
