use crate::context::HandlerContext;
use crate::handler::{Dependency, StateHandler, StateHandlerResult};
use attendance_core::{Event, StateName};
use attendance_services::NetworkReachability;
use tracing::{debug, error, info, warn};

/// Startup state.
///
/// On `INIT` shows the startup pattern, checks the network (showing the
/// error pattern if it is down), waits for the pattern to settle, and moves
/// to `TEMP`.
#[derive(Debug, Clone, Copy, Default)]
pub struct InitHandler;

impl StateHandler for InitHandler {
    fn name(&self) -> StateName {
        StateName::Init
    }

    fn declared_dependencies(&self) -> &'static [Dependency] {
        &[Dependency::NetworkReachability]
    }

    async fn run(&self, event: &Event, context: &mut HandlerContext) -> StateHandlerResult {
        match event {
            Event::Entry => {
                context.clear_error();
                StateHandlerResult::stay()
            }
            Event::Init => {
                context.show(context.patterns().startup);

                let reachable = match context.reachability() {
                    Some(probe) => probe.check().await,
                    None => {
                        error!("No network reachability capability");
                        false
                    }
                };
                if reachable {
                    info!("Network reachable");
                } else {
                    warn!("Network unreachable");
                    context.show(context.patterns().error);
                }

                tokio::time::sleep(context.timing().startup_settle()).await;
                StateHandlerResult::to(StateName::Temp)
            }
            Event::Timer => StateHandlerResult::to(StateName::Init),
            Event::Exit => StateHandlerResult::stay(),
            other => {
                debug!(event = %other, "Ignored in INIT");
                StateHandlerResult::to(StateName::Init)
            }
        }
    }
}
