//! Current command implementation
//!
//! Works out which branch the configured connection string points at.

use crate::cli::context::CommandContext;
use crate::cli::output::Output;
use crate::core::env_file;
use crate::core::{BranchSession, CurrentBranch};

/// Run the current command
pub async fn run_current(ctx: &CommandContext) -> anyhow::Result<()> {
    let config = ctx.require_config()?;

    let Some(uri) = env_file::current_connection_uri(&config.env_file_path, &config.pooled_key)?
    else {
        Output::warning(&format!(
            "No {} found in {}.",
            Output::key(&config.pooled_key),
            config.env_file_path.display()
        ));
        return Ok(());
    };

    let token = ctx.access_token(&config)?;
    let client = ctx.client();
    let session = BranchSession::new(&client, &token, &config);

    let pb = Output::spinner("Resolving current branch...");
    let result = session.branch_for_uri(&uri).await;
    pb.finish_and_clear();

    match result? {
        CurrentBranch::Found(branch) => {
            Output::success(&format!("Current branch: {}", Output::branch_name(&branch.name)));
        }
        CurrentBranch::Unmatched => {
            Output::warning("Could not match the current connection string to any Neon endpoint.");
        }
        CurrentBranch::UnknownBranch(branch_id) => {
            Output::warning(&format!(
                "Endpoint found but branch ID {} is not in the branch list.",
                branch_id
            ));
        }
    }

    Ok(())
}
