//! Sync command implementation
//!
//! Switches to the Neon branch named after the current git branch.

use crate::cli::commands::switch::report_outcome;
use crate::cli::context::CommandContext;
use crate::cli::output::Output;
use crate::cli::prompt;
use crate::core::BranchSession;
use crate::error::Error;
use crate::git;

/// Run the sync command from the current directory
pub async fn run_sync(ctx: &CommandContext) -> anyhow::Result<()> {
    let config = ctx.require_config()?;

    let cwd = std::env::current_dir()?;
    let git_branch = git::current_branch_at(&cwd).map_err(|e| Error::GitUnavailable(e.to_string()))?;
    Output::info(&format!("Current git branch: {}", Output::branch_name(&git_branch)));

    let token = ctx.access_token(&config)?;
    let client = ctx.client();
    let session = BranchSession::new(&client, &token, &config);

    let pb = Output::spinner("Syncing with Neon...");
    let result = session
        .sync(&git_branch, |b| pb.suspend(|| prompt::confirm_protected_branch(b)))
        .await;
    pb.finish_and_clear();

    report_outcome(&result?, &config, "Sync");
    Ok(())
}
