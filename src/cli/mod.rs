//! Interactive shell over the session core. The shell is a collaborator of
//! the computation engine, not part of it: it parses commands, mutates the
//! session, and renders evaluation results.

pub mod commands;
pub mod core;
pub mod io;
pub mod output;
pub mod shell;

pub use core::{CliError, CliMode};
pub use shell::run_cli;
