use assert_cmd::Command;
use predicates::prelude::*;
use predicates::str::contains;

const INPUTS: &[&str] = &[
    "workdir",
    "expo_cli_version",
    "expo_cli_verson",
    "user_name",
    "password",
    "run_publish",
    "force_react_native_version",
    "verbose_log",
    "RUST_LOG",
];

fn cmd() -> Command {
    let mut cmd = Command::cargo_bin("expo-eject").unwrap();
    for name in INPUTS {
        cmd.env_remove(name);
    }
    cmd
}

#[test]
fn help_lists_inputs() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("--expo-cli-version"))
        .stdout(contains("--force-react-native-version"));
}

#[test]
fn help_hides_password_value() {
    cmd()
        .env("password", "hunter2-topsecret")
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("hunter2-topsecret").not());
}

#[test]
fn missing_version_fails() {
    cmd()
        .assert()
        .failure()
        .code(1)
        .stderr(contains("expo_cli_version is required"))
        .stderr(contains("verbose step input"));
}

#[test]
fn unknown_flag_is_input_issue() {
    cmd()
        .arg("--no-such-input")
        .assert()
        .failure()
        .code(1)
        .stderr(contains("Issue with input"));
}

#[test]
fn legacy_version_name_is_accepted() {
    cmd()
        .env("expo_cli_verson", "latest")
        .env("user_name", "alice")
        .assert()
        .failure()
        .code(1)
        .stderr(contains("expo_cli_verson is deprecated"))
        .stderr(contains("password is not provided"))
        .stderr(contains("expo_cli_version is required").not());
}

#[test]
fn legacy_version_name_is_hidden_from_help() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(contains("verson").not());
}

#[test]
fn user_without_password_fails() {
    cmd()
        .env("expo_cli_version", "latest")
        .env("user_name", "alice")
        .assert()
        .failure()
        .code(1)
        .stderr(contains("user name is specified but password is not provided"))
        .stderr(contains("verbose step input"));
}

#[test]
fn password_without_user_fails_without_leaking() {
    cmd()
        .env("expo_cli_version", "latest")
        .env("password", "hunter2-topsecret")
        .assert()
        .failure()
        .code(1)
        .stderr(contains("password is specified but user name is not provided"))
        .stderr(contains("hunter2-topsecret").not())
        .stdout(contains("hunter2-topsecret").not());
}

#[test]
fn missing_workdir_fails() {
    let dir = tempfile::TempDir::new().unwrap();
    let missing = dir.path().join("no-such-project");

    cmd()
        .env("expo_cli_version", "latest")
        .env("workdir", &missing)
        .assert()
        .failure()
        .code(1)
        .stderr(contains("workdir does not exist"));
}

#[test]
fn flags_work_like_environment() {
    cmd()
        .args(["--expo-cli-version", "latest", "--user-name", "alice"])
        .assert()
        .failure()
        .stderr(contains("password is not provided"));
}
