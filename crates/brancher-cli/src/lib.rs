pub mod cli;
pub mod diagnostics;
pub mod dispatch;

use std::sync::Arc;

use anyhow::{Context, Result};
use brancher_app::App;
use brancher_core::command_runner::SystemCommandRunner;
use brancher_tui::RunnerBranchLoader;
use clap::Parser;

use crate::cli::Cli;
use crate::diagnostics::DiagnosticsSession;

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let diagnostics = DiagnosticsSession::initialize(cli.diagnostics)?;
    if let Some(path) = diagnostics.path() {
        eprintln!("Diagnostics enabled: {}", path.display());
    }

    let command_runner = Arc::new(SystemCommandRunner::new());
    let app = App::new(command_runner.as_ref());
    let cwd = std::env::current_dir().context("failed to determine current directory")?;

    let loader = RunnerBranchLoader::new(Arc::clone(&command_runner));

    let result = dispatch::run_with_deps(cli, &app, &loader, &cwd);
    if let Err(error) = &result {
        tracing::error!(error = %format!("{error:#}"), "command failed");
    }
    result
}
