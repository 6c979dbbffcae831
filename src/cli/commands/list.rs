//! List command implementation
//!
//! Shows every branch of the configured Neon project.

use crate::cli::context::CommandContext;
use crate::cli::output::{Output, Table};
use crate::core::BranchSession;

/// Run the list command
pub async fn run_list(ctx: &CommandContext, json: bool) -> anyhow::Result<()> {
    let config = ctx.require_config()?;
    let token = ctx.access_token(&config)?;
    let client = ctx.client();
    let session = BranchSession::new(&client, &token, &config);

    let spinner = (!json).then(|| Output::spinner("Fetching branches from Neon..."));
    let result = session.list_branches().await;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }
    let branches = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&branches)?);
        return Ok(());
    }

    if branches.is_empty() {
        Output::warning("No branches found.");
        return Ok(());
    }

    Output::header(&format!("Branches ({})", branches.len()));
    println!();

    let mut table = Table::new(vec!["", "Branch", "State", "Created"]);
    for branch in &branches {
        let name = if branch.primary {
            format!("{} (primary)", branch.name)
        } else {
            branch.name.clone()
        };
        table.add_row(vec![
            Output::state_marker(branch),
            name,
            branch.state.as_str().to_string(),
            branch.created_at.format("%Y-%m-%d").to_string(),
        ]);
    }
    table.print();

    Ok(())
}
