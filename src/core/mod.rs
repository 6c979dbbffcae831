//! Core functionality
//!
//! Configuration, env-file editing, branch resolution and the switch/sync
//! workflow. Nothing here prints; user output lives in the CLI layer.

pub mod config;
pub mod credentials;
pub mod current;
pub mod env_file;
pub mod resolver;
pub mod switch;

pub use config::{Config, StoredConfig};
pub use switch::{BranchSession, CurrentBranch, SwitchOutcome};
