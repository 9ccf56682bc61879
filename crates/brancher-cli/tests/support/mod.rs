use assert_cmd::Command;
use std::fs;
use std::path::Path;
use std::process::Command as StdCommand;

pub fn new_command_with_temp_home() -> (Command, tempfile::TempDir) {
    let temp_home = tempfile::tempdir().expect("temp home");
    let binary = assert_cmd::cargo::cargo_bin!("brancher");
    let mut command = Command::new(binary);
    command.env("HOME", temp_home.path());
    command.env("XDG_CONFIG_HOME", temp_home.path().join(".config"));
    command.env_remove("BRANCHER_LOG");
    command.current_dir(temp_home.path());
    (command, temp_home)
}

pub fn write_config(home: &Path, raw: &str) {
    let config_dir = home.join(".config").join("brancher");
    fs::create_dir_all(&config_dir).expect("create config dir");
    fs::write(config_dir.join("config.toml"), raw).expect("write config");
}

pub fn init_git_repo(path: &Path) {
    fs::create_dir_all(path).expect("create repo dir");
    let output = StdCommand::new("git")
        .arg("init")
        .current_dir(path)
        .output()
        .expect("git init");
    assert!(
        output.status.success(),
        "git init failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
}

pub fn assert_timestamp_log_names(entries: &[std::fs::DirEntry]) {
    assert!(!entries.is_empty(), "expected at least one diagnostics log");

    for entry in entries {
        let name = entry
            .file_name()
            .into_string()
            .expect("diagnostics filename utf8");
        let stem = name
            .strip_suffix(".log")
            .unwrap_or_else(|| panic!("diagnostics file should end with .log: {name}"));
        assert!(
            !stem.is_empty() && stem.chars().all(|character| character.is_ascii_digit()),
            "diagnostics filename must be <timestamp>.log, got: {name}"
        );
    }
}
