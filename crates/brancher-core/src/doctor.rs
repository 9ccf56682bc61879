use std::env;
use std::fmt;
use std::path::Path;

use crate::command_runner::CommandRunner;
use crate::config::{load_config, resolve_config_path};
use crate::git;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckState {
    Pass,
    Fail,
}

impl fmt::Display for CheckState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "PASS"),
            Self::Fail => write!(f, "FAIL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorCheck {
    pub name: String,
    pub state: CheckState,
    pub details: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DoctorReport {
    pub checks: Vec<DoctorCheck>,
}

impl DoctorReport {
    pub fn summary(&self) -> String {
        let passed = self
            .checks
            .iter()
            .filter(|check| check.state == CheckState::Pass)
            .count();
        let failed = self.checks.len().saturating_sub(passed);
        format!("{passed} passed, {failed} failed")
    }
}

pub fn run_doctor_with_runner(runner: &dyn CommandRunner, cwd: &Path) -> DoctorReport {
    let mut checks = Vec::new();

    let git_installed = is_executable_in_path("git");
    checks.push(if git_installed {
        pass_check("git is installed", "git executable found in PATH")
    } else {
        fail_check("git is installed", "git executable not found in PATH")
    });

    checks.push(match git::version(runner) {
        Ok(version) => pass_check("git responds", version),
        Err(error) => fail_check("git responds", error.to_string()),
    });

    checks.push(match git::repo_root(cwd, runner) {
        Ok(root) => pass_check(
            "inside a git repository",
            format!("repository root {}", root.display()),
        ),
        Err(error) => fail_check("inside a git repository", error.collaborator_message()),
    });

    checks.push(check_config());

    DoctorReport { checks }
}

fn check_config() -> DoctorCheck {
    let config_path = match resolve_config_path() {
        Ok(path) => path,
        Err(error) => return fail_check("config", error.to_string()),
    };

    if !config_path.exists() {
        return pass_check(
            "config",
            format!(
                "no file at {}; built-in categories in use",
                config_path.display()
            ),
        );
    }

    match load_config(&config_path).and_then(|config| config.category_registry()) {
        Ok(registry) => pass_check(
            "config",
            format!(
                "{} valid, {} categories",
                config_path.display(),
                registry.len()
            ),
        ),
        Err(error) => fail_check("config", error.to_string()),
    }
}

fn pass_check(name: &str, details: impl Into<String>) -> DoctorCheck {
    DoctorCheck {
        name: name.to_string(),
        state: CheckState::Pass,
        details: details.into(),
    }
}

fn fail_check(name: &str, details: impl Into<String>) -> DoctorCheck {
    DoctorCheck {
        name: name.to_string(),
        state: CheckState::Fail,
        details: details.into(),
    }
}

fn is_executable_in_path(program: &str) -> bool {
    let Some(path_value) = env::var_os("PATH") else {
        return false;
    };

    env::split_paths(&path_value)
        .map(|directory| directory.join(program))
        .any(|candidate| is_executable_file(&candidate))
}

fn is_executable_file(path: &Path) -> bool {
    if !path.is_file() {
        return false;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        path.metadata()
            .map(|metadata| metadata.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }

    #[cfg(not(unix))]
    {
        true
    }
}
