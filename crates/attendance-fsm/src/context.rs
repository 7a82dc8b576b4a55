//! Per-run context shared by the state handlers.

use crate::handler::Dependency;
use attendance_core::{PatternCatalog, PatternRequest, QueueSender, TimingConfig};
use attendance_services::{AnyReachability, AnySystemControl, JobDispatcher, JobResources};
use tracing::warn;

/// What the handlers can reach during a run.
///
/// The optional capabilities are checked against each handler's declared
/// dependencies before the FSM starts.
#[derive(Debug)]
pub struct HandlerContext {
    indicator: QueueSender<PatternRequest>,
    patterns: PatternCatalog,
    timing: TimingConfig,
    reachability: Option<AnyReachability>,
    system: Option<AnySystemControl>,
    dispatcher: Option<JobDispatcher>,
    resources: Option<JobResources>,
    error_flag: bool,
    halted: bool,
}

impl HandlerContext {
    pub fn new(
        indicator: QueueSender<PatternRequest>,
        patterns: PatternCatalog,
        timing: TimingConfig,
    ) -> Self {
        Self {
            indicator,
            patterns,
            timing,
            reachability: None,
            system: None,
            dispatcher: None,
            resources: None,
            error_flag: false,
            halted: false,
        }
    }

    pub fn with_reachability(mut self, reachability: AnyReachability) -> Self {
        self.reachability = Some(reachability);
        self
    }

    pub fn with_system(mut self, system: AnySystemControl) -> Self {
        self.system = Some(system);
        self
    }

    pub fn with_dispatcher(mut self, dispatcher: JobDispatcher) -> Self {
        self.dispatcher = Some(dispatcher);
        self
    }

    /// Store and feedback queues handed to each persistence job.
    pub fn with_storage(mut self, resources: JobResources) -> Self {
        self.resources = Some(resources);
        self
    }

    /// Whether a declared dependency is present.
    pub fn provides(&self, dependency: Dependency) -> bool {
        match dependency {
            Dependency::NetworkReachability => self.reachability.is_some(),
            Dependency::LocalStorage => self.resources.is_some(),
            Dependency::JobDispatch => self.dispatcher.is_some(),
            Dependency::SystemControl => self.system.is_some(),
        }
    }

    /// Request an indicator pattern. A closed queue is logged and ignored.
    pub fn show(&self, pattern: PatternRequest) {
        if let Err(e) = self.indicator.put(pattern) {
            warn!(error = %e, %pattern, "Indicator queue closed");
        }
    }

    pub fn patterns(&self) -> &PatternCatalog {
        &self.patterns
    }

    pub fn timing(&self) -> &TimingConfig {
        &self.timing
    }

    pub fn reachability(&self) -> Option<&AnyReachability> {
        self.reachability.as_ref()
    }

    pub fn system(&self) -> Option<&AnySystemControl> {
        self.system.as_ref()
    }

    pub fn dispatcher(&self) -> Option<&JobDispatcher> {
        self.dispatcher.as_ref()
    }

    pub fn resources(&self) -> Option<&JobResources> {
        self.resources.as_ref()
    }

    pub fn error_flag(&self) -> bool {
        self.error_flag
    }

    pub fn set_error(&mut self) {
        self.error_flag = true;
    }

    pub fn clear_error(&mut self) {
        self.error_flag = false;
    }

    /// Mark the run finished. The FSM stops after the current event.
    pub fn halt(&mut self) {
        self.halted = true;
    }

    pub fn is_halted(&self) -> bool {
        self.halted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use attendance_core::queue;
    use attendance_services::reachability::MockReachability;

    #[test]
    fn test_provides_follows_builder() {
        let (tx, _rx) = queue::channel();
        let context = HandlerContext::new(tx, PatternCatalog::default(), TimingConfig::default());
        assert!(!context.provides(Dependency::NetworkReachability));

        let context = context.with_reachability(MockReachability::new(true).into());
        assert!(context.provides(Dependency::NetworkReachability));
        assert!(!context.provides(Dependency::SystemControl));
    }

    #[tokio::test]
    async fn test_show_posts_to_indicator() {
        let (tx, mut rx) = queue::channel();
        let context = HandlerContext::new(tx, PatternCatalog::default(), TimingConfig::default());

        context.show(context.patterns().ready);
        assert_eq!(rx.get().await, Some(PatternCatalog::default().ready));
    }

    #[test]
    fn test_error_flag_and_halt() {
        let (tx, _rx) = queue::channel();
        let mut context =
            HandlerContext::new(tx, PatternCatalog::default(), TimingConfig::default());

        context.set_error();
        assert!(context.error_flag());
        context.clear_error();
        assert!(!context.error_flag());

        assert!(!context.is_halted());
        context.halt();
        assert!(context.is_halted());
    }
}
