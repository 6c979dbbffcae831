//! Switch command implementation
//!
//! Points the env file at a branch picked by name or interactively.

use crate::cli::context::CommandContext;
use crate::cli::output::Output;
use crate::cli::prompt;
use crate::core::config::Config;
use crate::core::resolver::resolve;
use crate::core::{BranchSession, SwitchOutcome};
use crate::neon::Branch;

/// Run the switch command
pub async fn run_switch(ctx: &CommandContext, branch_name: Option<&str>) -> anyhow::Result<()> {
    let config = ctx.require_config()?;
    let token = ctx.access_token(&config)?;
    let client = ctx.client();
    let session = BranchSession::new(&client, &token, &config);

    let pb = Output::spinner("Fetching branches from Neon...");
    let result = session.list_branches().await;
    pb.finish_and_clear();
    let branches = result?;

    let branch: Branch = match branch_name {
        Some(name) => resolve(&branches, name)?.clone(),
        None => {
            if branches.is_empty() {
                Output::warning("No branches found.");
                return Ok(());
            }
            match prompt::select_branch(&branches)? {
                Some(idx) => branches[idx].clone(),
                None => {
                    Output::info("Switch cancelled.");
                    return Ok(());
                }
            }
        }
    };

    let pb = Output::spinner(&format!("Switching to {}...", Output::branch_name(&branch.name)));
    // The spinner is hidden while the confirmation prompt is up
    let result = session
        .confirm_and_switch(&branch, |b| {
            pb.suspend(|| prompt::confirm_protected_branch(b))
        })
        .await;
    pb.finish_and_clear();

    report_outcome(&result?, &config, "Switch");
    Ok(())
}

/// Print the result of a switch or sync
pub fn report_outcome(outcome: &SwitchOutcome, config: &Config, verb: &str) {
    match outcome {
        SwitchOutcome::Switched { branch, .. } => {
            Output::success(&format!("Switched to {}.", Output::branch_name(&branch.name)));
            Output::note(&format!(
                "Updated {} and {} in {}",
                Output::key(&config.pooled_key),
                Output::key(&config.unpooled_key),
                config.env_file_path.display()
            ));
        }
        SwitchOutcome::Cancelled { .. } => {
            Output::info(&format!("{} cancelled.", verb));
        }
    }
}
