use std::collections::VecDeque;
use std::fs;
use std::path::Path;
use std::process::Command;
use std::sync::Mutex;

use anyhow::anyhow;
use brancher_core::command_runner::{CommandOutput, CommandRunner};

#[allow(dead_code)]
pub static ENV_LOCK: Mutex<()> = Mutex::new(());

#[derive(Debug, Clone)]
pub struct Call {
    #[allow(dead_code)]
    pub program: String,
    pub args: Vec<String>,
}

#[derive(Default)]
pub struct QueueRunner {
    outputs: Mutex<VecDeque<anyhow::Result<CommandOutput>>>,
    calls: Mutex<Vec<Call>>,
}

#[allow(dead_code)]
impl QueueRunner {
    pub fn new(outputs: Vec<anyhow::Result<CommandOutput>>) -> Self {
        Self {
            outputs: Mutex::new(outputs.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().expect("calls lock").clone()
    }
}

impl CommandRunner for QueueRunner {
    fn run(
        &self,
        program: &str,
        args: &[&str],
        _cwd: Option<&Path>,
    ) -> anyhow::Result<CommandOutput> {
        self.calls.lock().expect("calls lock").push(Call {
            program: program.to_string(),
            args: args.iter().map(|value| (*value).to_string()).collect(),
        });

        self.outputs
            .lock()
            .expect("outputs lock")
            .pop_front()
            .unwrap_or_else(|| Err(anyhow!("missing scripted output")))
    }
}

#[allow(dead_code)]
pub fn output(stdout: &str, stderr: &str, status: i32) -> anyhow::Result<CommandOutput> {
    Ok(CommandOutput {
        status_code: status,
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
    })
}

#[allow(dead_code)]
pub fn write_config(home: &Path, raw: &str) {
    let config_dir = home.join(".config").join("brancher");
    fs::create_dir_all(&config_dir).expect("create config dir");
    fs::write(config_dir.join("config.toml"), raw).expect("write config");
}

#[allow(dead_code)]
pub fn run_git(repo: &Path, args: &[&str]) -> String {
    run_git_at(repo, args, "2026-01-01T00:00:00Z")
}

#[allow(dead_code)]
pub fn run_git_at(repo: &Path, args: &[&str], date: &str) -> String {
    let output = Command::new("git")
        .args([
            "-c",
            "user.name=brancher-test",
            "-c",
            "user.email=brancher-test@example.com",
            "-c",
            "commit.gpgsign=false",
        ])
        .args(args)
        .current_dir(repo)
        .env("GIT_COMMITTER_DATE", date)
        .env("GIT_AUTHOR_DATE", date)
        .output()
        .expect("git command should execute");

    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );

    String::from_utf8_lossy(&output.stdout).to_string()
}

#[allow(dead_code)]
pub fn init_repo(repo: &Path) {
    fs::create_dir_all(repo).expect("repo dir");
    run_git(repo, &["init", "--initial-branch=main"]);
    fs::write(repo.join("README.md"), "hello\n").expect("write readme");
    run_git(repo, &["add", "."]);
    run_git_at(repo, &["commit", "-m", "initial"], "2026-01-01T00:00:00Z");
}
