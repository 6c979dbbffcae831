//! CLI command implementations
//!
//! Each command is implemented in its own module.

pub mod config;
pub mod current;
pub mod init;
pub mod list;
pub mod switch;
pub mod sync;
