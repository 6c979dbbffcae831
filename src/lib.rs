//! neonbx - Neon database branch navigator
//!
//! Keeps the connection strings in a local `.env` file pointed at the Neon
//! branch that matches the work in progress, either chosen explicitly or
//! derived from the current git branch.

pub mod cli;
pub mod core;
pub mod error;
pub mod git;
pub mod neon;
pub mod telemetry;
pub mod util;

pub use crate::core::config::{Config, StoredConfig};
pub use error::Error;
pub use neon::{Branch, BranchApi, NeonClient};
