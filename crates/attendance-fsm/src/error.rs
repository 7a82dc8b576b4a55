use crate::handler::Dependency;
use attendance_core::StateName;
use thiserror::Error;

/// Startup-time errors of the attendance FSM.
///
/// Everything that can go wrong while handling an event is reported through
/// a `StateHandlerResult` instead.
#[derive(Debug, Error)]
pub enum FsmError {
    #[error("State {state} needs {dependency}, which the context does not provide")]
    MissingDependency {
        state: StateName,
        dependency: Dependency,
    },

    #[error("No handler registered for state {0}")]
    MissingHandler(StateName),

    #[error("More than one handler registered for state {0}")]
    DuplicateHandler(StateName),
}

pub type Result<T> = std::result::Result<T, FsmError>;
