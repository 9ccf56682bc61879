use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::command_runner::{self, CommandOutput, CommandRunner};

const LIST_BRANCHES_BY_RECENCY: [&str; 4] = [
    "for-each-ref",
    "--sort=-committerdate",
    "refs/heads/",
    "--format=%(refname:short)",
];

#[derive(Debug, Error)]
pub enum GitError {
    #[error("git {command} failed (exit {status}): {stderr}")]
    CommandFailed {
        command: String,
        status: i32,
        stderr: String,
    },
    #[error("failed to execute git: {0}")]
    Execute(String),
    #[error("failed to parse git output: {0}")]
    Parse(String),
}

impl GitError {
    /// The message git itself printed, falling back to the full error text.
    pub fn collaborator_message(&self) -> String {
        match self {
            Self::CommandFailed { stderr, .. } if !stderr.is_empty() => stderr.clone(),
            other => other.to_string(),
        }
    }
}

pub fn repo_root(cwd: &Path, runner: &dyn CommandRunner) -> Result<PathBuf, GitError> {
    let output = run_git_checked(runner, &["rev-parse", "--show-toplevel"], Some(cwd))?;
    output
        .first_line()
        .map(PathBuf::from)
        .ok_or_else(|| GitError::Parse("git rev-parse returned empty repo root".to_string()))
}

pub fn version(runner: &dyn CommandRunner) -> Result<String, GitError> {
    let output = run_git_checked(runner, &["--version"], None)?;
    output
        .first_line()
        .map(str::to_string)
        .ok_or_else(|| GitError::Parse("git --version printed nothing".to_string()))
}

/// Best effort: any failure means "no current branch known".
pub fn current_branch_name(cwd: &Path, runner: &dyn CommandRunner) -> Option<String> {
    let output = match run_git(runner, &["rev-parse", "--abbrev-ref", "HEAD"], Some(cwd)) {
        Ok(output) if output.succeeded() => output,
        Ok(output) => {
            tracing::debug!(status = output.status_code, "current branch lookup failed");
            return None;
        }
        Err(error) => {
            tracing::debug!(%error, "current branch lookup could not run");
            return None;
        }
    };

    output.first_line().map(str::to_string)
}

/// Local branch names, most recently committed first.
pub fn list_branches_by_recency(
    cwd: &Path,
    runner: &dyn CommandRunner,
) -> Result<Vec<String>, GitError> {
    let output = run_git_checked(runner, &LIST_BRANCHES_BY_RECENCY, Some(cwd))?;
    Ok(parse_branch_lines(&output.stdout))
}

pub fn create_branch_and_switch(
    cwd: &Path,
    branch_name: &str,
    runner: &dyn CommandRunner,
) -> Result<(), GitError> {
    let branch = branch_name.trim();
    if branch.is_empty() {
        return Err(GitError::Parse("branch name cannot be empty".to_string()));
    }

    run_git_checked(runner, &["checkout", "-b", branch], Some(cwd))?;
    Ok(())
}

fn parse_branch_lines(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn run_git_checked(
    runner: &dyn CommandRunner,
    args: &[&str],
    cwd: Option<&Path>,
) -> Result<CommandOutput, GitError> {
    let output = run_git(runner, args, cwd)?;
    command_runner::ensure_success(args, output).map_err(|failure| GitError::CommandFailed {
        command: failure.command,
        status: failure.status,
        stderr: failure.stderr,
    })
}

fn run_git(
    runner: &dyn CommandRunner,
    args: &[&str],
    cwd: Option<&Path>,
) -> Result<CommandOutput, GitError> {
    runner
        .run("git", args, cwd)
        .map_err(|error| GitError::Execute(error.to_string()))
}
