//! Command execution over a prompt-delimited shell.

mod executor;
mod response;

pub use executor::{CommandExecutor, execute_on};
pub use response::RawCapture;
