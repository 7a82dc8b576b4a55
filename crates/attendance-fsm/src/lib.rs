//! Top-level attendance state machine.
//!
//! The FSM consumes [`Event`](attendance_core::Event)s from one queue and
//! hands each to the handler of its current state. Handlers are looked up
//! in an immutable [`HandlerTable`] and reach the outside world only
//! through the [`HandlerContext`].

pub mod context;
pub mod error;
pub mod handler;
pub mod handlers;
pub mod state_machine;
pub mod timer;

pub use context::HandlerContext;
pub use error::{FsmError, Result};
pub use handler::{AnyStateHandler, Dependency, HandlerTable, StateHandler, StateHandlerResult};
pub use state_machine::{AttendanceFsm, FsmExit, StateTransition};
pub use timer::TimerSource;
