use crate::context::HandlerContext;
use crate::handler::{Dependency, StateHandler, StateHandlerResult};
use attendance_core::{CardId, Event, StateName};
use attendance_services::{PersistenceJob, SystemControl};
use tracing::{error, info, warn};

/// Ready state: accepts swipes and the shutdown button.
#[derive(Debug, Clone, Copy, Default)]
pub struct TempHandler;

impl TempHandler {
    async fn card_read(&self, id: CardId, context: &HandlerContext) -> StateHandlerResult {
        info!(card_id = %id, "Card read");

        match (context.dispatcher(), context.resources()) {
            (Some(dispatcher), Some(resources)) => {
                let job = PersistenceJob::new(id, resources.clone());
                if let Err(e) = dispatcher.submit(job) {
                    error!(card_id = %id, error = %e, "Could not dispatch persistence job");
                    context.show(context.patterns().write_failed);
                }
            }
            _ => {
                error!(card_id = %id, "No job dispatch or storage capability");
                context.show(context.patterns().write_failed);
            }
        }

        tokio::time::sleep(context.timing().card_read_settle()).await;
        StateHandlerResult::to(StateName::Temp)
    }

    async fn shutdown(&self, context: &mut HandlerContext) -> StateHandlerResult {
        warn!("Shutdown requested");
        context.show(context.patterns().error);
        tokio::time::sleep(context.timing().shutdown_settle()).await;

        match context.system() {
            Some(system) => {
                if let Err(e) = system.shutdown_now().await {
                    error!(error = %e, "Shutdown failed");
                }
            }
            None => error!("No system control capability"),
        }

        context.halt();
        StateHandlerResult::stay()
    }
}

impl StateHandler for TempHandler {
    fn name(&self) -> StateName {
        StateName::Temp
    }

    fn declared_dependencies(&self) -> &'static [Dependency] {
        &[
            Dependency::LocalStorage,
            Dependency::JobDispatch,
            Dependency::SystemControl,
        ]
    }

    async fn run(&self, event: &Event, context: &mut HandlerContext) -> StateHandlerResult {
        match event {
            Event::Entry => {
                context.show(context.patterns().ready);
                StateHandlerResult::stay()
            }
            Event::Timer => StateHandlerResult::to(StateName::Temp),
            Event::CardRead { id } => self.card_read(*id, context).await,
            Event::Shutdown => self.shutdown(context).await,
            Event::Exit => StateHandlerResult::stay(),
            other => StateHandlerResult::error(format!("Invalid event: {other}")),
        }
    }
}
