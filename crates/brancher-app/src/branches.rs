use std::path::Path;

use thiserror::Error;

use crate::App;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BranchEntry {
    pub name: String,
}

impl BranchEntry {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BranchListing {
    pub current: Option<String>,
    pub branches: Vec<BranchEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to list branches: {message}")]
pub struct FetchError {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("failed to create branch '{name}': {message}")]
pub struct CreationError {
    pub name: String,
    pub message: String,
}

impl<'a> App<'a> {
    /// Current branch (best effort) plus local branches, newest commit first.
    pub fn fetch_branches(&self, cwd: &Path) -> Result<BranchListing, FetchError> {
        let current = brancher_core::git::current_branch_name(cwd, self.runner);

        let names = brancher_core::git::list_branches_by_recency(cwd, self.runner).map_err(
            |error| FetchError {
                message: error.collaborator_message(),
            },
        )?;

        tracing::info!(
            count = names.len(),
            current = current.as_deref().unwrap_or("<unknown>"),
            "fetched local branches"
        );

        Ok(BranchListing {
            current,
            branches: names.into_iter().map(BranchEntry::new).collect(),
        })
    }

    /// Creates `name` at the current checkout and switches the worktree to it.
    pub fn create_branch(&self, cwd: &Path, name: &str) -> Result<(), CreationError> {
        brancher_core::git::create_branch_and_switch(cwd, name, self.runner).map_err(|error| {
            CreationError {
                name: name.to_string(),
                message: error.collaborator_message(),
            }
        })?;

        tracing::info!(branch = name, "created and switched to branch");
        Ok(())
    }
}
