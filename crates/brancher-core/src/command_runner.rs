use std::path::Path;
use std::process::Command;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandOutput {
    pub status_code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn succeeded(&self) -> bool {
        self.status_code == 0
    }

    /// First non-blank stdout line, trimmed.
    pub fn first_line(&self) -> Option<&str> {
        self.stdout
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
    }
}

/// Seam between the tool and external executables (git).
pub trait CommandRunner {
    fn run(
        &self,
        program: &str,
        args: &[&str],
        cwd: Option<&Path>,
    ) -> anyhow::Result<CommandOutput>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    pub fn new() -> Self {
        Self
    }
}

impl CommandRunner for SystemCommandRunner {
    fn run(
        &self,
        program: &str,
        args: &[&str],
        cwd: Option<&Path>,
    ) -> anyhow::Result<CommandOutput> {
        let mut command = Command::new(program);
        command.args(args);

        if let Some(working_directory) = cwd {
            command.current_dir(working_directory);
        }

        tracing::debug!(program, ?args, "running external command");
        let output = command.output()?;

        Ok(CommandOutput {
            status_code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CommandFailure {
    pub(crate) command: String,
    pub(crate) status: i32,
    pub(crate) stderr: String,
}

pub(crate) fn ensure_success(
    args: &[&str],
    output: CommandOutput,
) -> Result<CommandOutput, CommandFailure> {
    if output.succeeded() {
        return Ok(output);
    }

    Err(CommandFailure {
        command: args.join(" "),
        status: output.status_code,
        stderr: output.stderr.trim().to_string(),
    })
}
