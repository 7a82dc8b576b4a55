//! The two states of the terminal.

mod init;
mod temp;

pub use init::InitHandler;
pub use temp::TempHandler;
