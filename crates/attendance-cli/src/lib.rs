//! Wiring for the `attendance` binary.

pub mod simulation;
pub mod terminal;

pub use simulation::DemoScript;
pub use terminal::Terminal;
