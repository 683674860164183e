//! CLI command implementations.

pub mod run;
pub mod script;
pub mod shell;
