//! State handler contract and the handler table.
//!
//! A handler is the behavior of one named state. It declares which external
//! resources it needs, and for each event returns a [`StateHandlerResult`]
//! saying whether to move to another state.
//!
//! The [`HandlerTable`] is built once at startup and never changes. Building
//! it rejects duplicate states; [`HandlerTable::validate`] rejects a context
//! that lacks a declared dependency, so a missing resource fails the start
//! rather than a later event.

#![allow(async_fn_in_trait)]

use crate::context::HandlerContext;
use crate::error::{FsmError, Result};
use crate::handlers::{InitHandler, TempHandler};
use attendance_core::{Event, StateName};
use std::collections::HashMap;
use std::fmt;

/// Outcome of one handler invocation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StateHandlerResult {
    /// State to move to. `None` keeps the current state.
    pub next_state: Option<StateName>,
    pub did_error: bool,
    pub error_message: Option<String>,
}

impl StateHandlerResult {
    /// Keep the current state.
    pub fn stay() -> Self {
        Self::default()
    }

    pub fn to(state: StateName) -> Self {
        Self {
            next_state: Some(state),
            ..Self::default()
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            next_state: None,
            did_error: true,
            error_message: Some(message.into()),
        }
    }
}

/// External resource a handler may need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dependency {
    NetworkReachability,
    LocalStorage,
    JobDispatch,
    SystemControl,
}

impl fmt::Display for Dependency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dependency::NetworkReachability => write!(f, "network reachability"),
            Dependency::LocalStorage => write!(f, "local storage"),
            Dependency::JobDispatch => write!(f, "job dispatch"),
            Dependency::SystemControl => write!(f, "system control"),
        }
    }
}

/// Behavior of one named state.
pub trait StateHandler: Send + Sync {
    fn name(&self) -> StateName;

    fn declared_dependencies(&self) -> &'static [Dependency];

    /// Handle one event.
    async fn run(&self, event: &Event, context: &mut HandlerContext) -> StateHandlerResult;
}

/// Enum wrapper for handler dispatch.
#[derive(Debug, Clone)]
pub enum AnyStateHandler {
    Init(InitHandler),
    Temp(TempHandler),
}

impl StateHandler for AnyStateHandler {
    fn name(&self) -> StateName {
        match self {
            Self::Init(handler) => handler.name(),
            Self::Temp(handler) => handler.name(),
        }
    }

    fn declared_dependencies(&self) -> &'static [Dependency] {
        match self {
            Self::Init(handler) => handler.declared_dependencies(),
            Self::Temp(handler) => handler.declared_dependencies(),
        }
    }

    async fn run(&self, event: &Event, context: &mut HandlerContext) -> StateHandlerResult {
        match self {
            Self::Init(handler) => handler.run(event, context).await,
            Self::Temp(handler) => handler.run(event, context).await,
        }
    }
}

impl From<InitHandler> for AnyStateHandler {
    fn from(handler: InitHandler) -> Self {
        Self::Init(handler)
    }
}

impl From<TempHandler> for AnyStateHandler {
    fn from(handler: TempHandler) -> Self {
        Self::Temp(handler)
    }
}

/// Immutable mapping from state name to handler.
#[derive(Debug, Clone)]
pub struct HandlerTable {
    handlers: HashMap<StateName, AnyStateHandler>,
}

impl HandlerTable {
    /// Build a table with one handler per state.
    ///
    /// # Errors
    ///
    /// Returns `FsmError::DuplicateHandler` if two handlers share a name.
    pub fn new(handlers: impl IntoIterator<Item = AnyStateHandler>) -> Result<Self> {
        let mut table = HashMap::new();
        for handler in handlers {
            let name = handler.name();
            if table.insert(name, handler).is_some() {
                return Err(FsmError::DuplicateHandler(name));
            }
        }
        Ok(Self { handlers: table })
    }

    /// The `INIT` and `TEMP` handlers.
    pub fn standard() -> Self {
        let handlers: HashMap<_, _> = [
            AnyStateHandler::from(InitHandler),
            AnyStateHandler::from(TempHandler),
        ]
        .into_iter()
        .map(|handler| (handler.name(), handler))
        .collect();
        Self { handlers }
    }

    pub fn get(&self, state: StateName) -> Option<&AnyStateHandler> {
        self.handlers.get(&state)
    }

    pub fn contains(&self, state: StateName) -> bool {
        self.handlers.contains_key(&state)
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Check every declared dependency against the context.
    ///
    /// # Errors
    ///
    /// Returns `FsmError::MissingDependency` for the first one missing.
    pub fn validate(&self, context: &HandlerContext) -> Result<()> {
        for handler in self.handlers.values() {
            for dependency in handler.declared_dependencies() {
                if !context.provides(*dependency) {
                    return Err(FsmError::MissingDependency {
                        state: handler.name(),
                        dependency: *dependency,
                    });
                }
            }
        }
        Ok(())
    }
}
