//! CLI layer
//!
//! Command handlers, prompts and terminal output.

pub mod commands;
pub mod context;
pub mod output;
pub mod prompt;

pub use context::CommandContext;
pub use output::Output;
