//! Command logging utilities for verbose output.

use std::process::Command;
use tracing::debug;

/// Log an external command just before execution.
///
/// Visible with `--verbose` (which sets `neonbx=debug`) or via
/// `RUST_LOG=neonbx::cmd=debug`.
pub fn log_cmd(cmd: &Command) {
    let program = cmd.get_program().to_string_lossy();
    let args: Vec<_> = cmd.get_args().map(|a| a.to_string_lossy()).collect();
    debug!(
        target: "neonbx::cmd",
        %program,
        ?args,
        "exec"
    );
}
