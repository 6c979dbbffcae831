//! Branch resolution
//!
//! Maps a target name onto one remote branch and decides whether switching
//! to it needs an explicit typed confirmation.

use tracing::warn;

use crate::core::config::Config;
use crate::error::Error;
use crate::neon::Branch;

/// Git branch names that stand for the primary line of development
const PRIMARY_GIT_BRANCHES: &[&str] = &["main", "master"];

/// Find the branch whose name equals `target` exactly.
///
/// Duplicate names resolve to the first branch in API order.
pub fn resolve<'a>(branches: &'a [Branch], target: &str) -> Result<&'a Branch, Error> {
    let mut matches = branches.iter().filter(|b| b.name == target);
    let Some(found) = matches.next() else {
        return Err(Error::NotFound {
            target: target.to_string(),
            available: branch_names(branches),
        });
    };

    let extra = matches.count();
    if extra > 0 {
        warn!(
            branch = %target,
            duplicates = extra + 1,
            "multiple Neon branches share this name, using the first"
        );
    }
    Ok(found)
}

/// Switching to the primary branch, or to the configured default branch,
/// needs the user to type the branch name.
pub fn requires_confirmation(branch: &Branch, config: &Config) -> bool {
    branch.primary || branch.name == config.default_branch
}

/// Neon branch name to look up for a git branch
pub fn sync_target<'a>(git_branch: &'a str, default_branch: &'a str) -> &'a str {
    if PRIMARY_GIT_BRANCHES.contains(&git_branch) {
        default_branch
    } else {
        git_branch
    }
}

/// Names of all branches, in API order
pub fn branch_names(branches: &[Branch]) -> Vec<String> {
    branches.iter().map(|b| b.name.clone()).collect()
}

/// Typed confirmation only accepts the exact branch name
pub fn confirmation_matches(branch: &Branch, typed: &str) -> bool {
    typed.trim() == branch.name
}
