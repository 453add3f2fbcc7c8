//! Channel layer for prompt-delimited shell I/O.
//!
//! This module handles reading an interactive shell that gives no structured
//! output: responses are delimited only by the echoed command and the prompt.

mod matcher;
mod reader;

pub use matcher::TerminatorMatcher;
pub use reader::{DEFAULT_PROMPT, ReadConfig, ReadResult, ShellChannel};
