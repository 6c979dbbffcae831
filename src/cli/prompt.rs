//! Interactive prompts

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input, Select};

use crate::cli::output::Output;
use crate::core::resolver::confirmation_matches;
use crate::error::Error;
use crate::neon::Branch;

/// Ask the user to type the branch name before touching a protected branch
pub fn confirm_protected_branch(branch: &Branch) -> Result<bool, Error> {
    Output::warning(&format!(
        "{} is the primary/default branch. Its connection string usually points at real data.",
        Output::branch_name(&branch.name)
    ));
    let typed: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(format!("Type '{}' to continue", branch.name))
        .allow_empty(true)
        .interact_text()?;
    Ok(confirmation_matches(branch, &typed))
}

/// Pick a branch from the list; `None` when the user escapes
pub fn select_branch(branches: &[Branch]) -> Result<Option<usize>, Error> {
    let labels: Vec<String> = branches
        .iter()
        .map(|b| {
            if b.primary {
                format!("{} (primary)", b.name)
            } else {
                b.name.clone()
            }
        })
        .collect();

    Ok(Select::with_theme(&ColorfulTheme::default())
        .with_prompt("Select a branch to switch to")
        .items(&labels)
        .default(0)
        .interact_opt()?)
}

/// Plain yes/no question, defaulting to no
pub fn confirm(prompt: &str) -> Result<bool, Error> {
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt)
        .default(false)
        .interact()?)
}
