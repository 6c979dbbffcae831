//! Git operations
//!
//! Only the current branch name is needed, read through git2 (libgit2
//! bindings) without spawning the git CLI.

use git2::{ErrorCode, Repository};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during git operations
#[derive(Error, Debug)]
pub enum GitError {
    #[error("Git error: {0}")]
    Git(#[from] git2::Error),

    #[error("Not a git repository: {0}")]
    NotARepo(String),

    #[error("HEAD is detached at {0}; check out a branch to sync")]
    DetachedHead(String),

    #[error("Reference error: {0}")]
    Reference(String),
}

/// Open the repository containing `path`, searching parent directories
pub fn discover_repo<P: AsRef<Path>>(path: P) -> Result<Repository, GitError> {
    Repository::discover(path.as_ref())
        .map_err(|e| GitError::NotARepo(format!("{}: {}", path.as_ref().display(), e.message())))
}

/// Get the current branch name.
///
/// A freshly initialised repository without commits reports the branch HEAD
/// points at.
pub fn get_current_branch(repo: &Repository) -> Result<String, GitError> {
    let head = match repo.head() {
        Ok(head) => head,
        Err(e) if e.code() == ErrorCode::UnbornBranch => return unborn_branch_name(repo),
        Err(e) => return Err(GitError::Reference(e.message().to_string())),
    };

    if head.is_branch() {
        return head
            .shorthand()
            .map(str::to_string)
            .ok_or_else(|| GitError::Reference("branch name is not valid UTF-8".to_string()));
    }

    let oid = head
        .target()
        .ok_or_else(|| GitError::Reference("HEAD has no target".to_string()))?;
    let short = oid.to_string();
    Err(GitError::DetachedHead(short[..7.min(short.len())].to_string()))
}

/// Current branch of the repository containing `path`
pub fn current_branch_at<P: AsRef<Path>>(path: P) -> Result<String, GitError> {
    let repo = discover_repo(path)?;
    get_current_branch(&repo)
}

fn unborn_branch_name(repo: &Repository) -> Result<String, GitError> {
    let head_ref = repo.find_reference("HEAD")?;
    let target = head_ref
        .symbolic_target()
        .ok_or_else(|| GitError::Reference("HEAD is not a symbolic reference".to_string()))?;
    Ok(target.trim_start_matches("refs/heads/").to_string())
}
