mod branches;

use std::path::Path;

use anyhow::{Context, Result, anyhow};
use brancher_core::category::CategoryRegistry;
use brancher_core::command_runner::CommandRunner;
use brancher_core::config::{load_category_registry, resolve_config_path};
use brancher_core::doctor::{DoctorReport, run_doctor_with_runner};

pub use branches::{BranchEntry, BranchListing, CreationError, FetchError};

pub struct App<'a> {
    pub runner: &'a dyn CommandRunner,
}

impl<'a> App<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    pub fn doctor(&self, cwd: &Path) -> DoctorReport {
        run_doctor_with_runner(self.runner, cwd)
    }

    /// Resolves the category registry for this run from the user config.
    pub fn load_categories(&self) -> Result<CategoryRegistry> {
        let config_path = resolve_config_path().context("failed to resolve config path")?;

        load_category_registry(&config_path).map_err(|error| {
            anyhow!(
                "invalid config at {}: {error}\nFix the config or remove it to use the built-in categories.",
                config_path.display()
            )
        })
    }
}
