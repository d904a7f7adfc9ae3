pub mod commands;
mod completion;
pub mod core;
pub mod formatting;
mod help;
pub mod output;
mod shell;

pub use shell::{run_cli, SCRIPT_ENV};
