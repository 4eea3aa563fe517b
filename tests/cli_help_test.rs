use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

// Every test points GWADM_CONFIG_DIR at a scratch directory so runs never
// touch (or depend on) the developer's real configuration.
fn gwadm() -> (TempDir, Command) {
    let dir = tempfile::tempdir().unwrap();
    let mut cmd = Command::cargo_bin("gwadm").unwrap();
    cmd.env("GWADM_CONFIG_DIR", dir.path());
    (dir, cmd)
}

#[test]
fn top_level_help_lists_command_groups() {
    let (_dir, mut cmd) = gwadm();
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("user"))
        .stdout(predicate::str::contains("group"))
        .stdout(predicate::str::contains("member"))
        .stdout(predicate::str::contains("batch"))
        .stdout(predicate::str::contains("config"));
}

#[test]
fn user_help_lists_subcommands() {
    let (_dir, mut cmd) = gwadm();
    cmd.args(["user", "--help"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("info"));
}

#[test]
fn user_list_help_shows_scope_flags() {
    let (_dir, mut cmd) = gwadm();
    cmd.args(["user", "list", "--help"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--domain"))
        .stdout(predicate::str::contains("--query"))
        .stdout(predicate::str::contains("--format"));
}

#[test]
fn member_list_requires_a_group_argument() {
    let (_dir, mut cmd) = gwadm();
    cmd.args(["member", "list"]);
    cmd.assert().failure();
}

#[test]
fn config_path_prints_the_scratch_location() {
    let (dir, mut cmd) = gwadm();
    cmd.args(["config", "path"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(dir.path().to_str().unwrap()));
}

#[test]
fn config_get_shows_the_default_customer() {
    let (_dir, mut cmd) = gwadm();
    cmd.args(["config", "get"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("my_customer"));
}

#[test]
fn config_set_round_trips_through_get() {
    let (dir, mut cmd) = gwadm();
    cmd.args(["config", "set", "domain", "example.com"]);
    cmd.assert().success();

    let mut cmd = Command::cargo_bin("gwadm").unwrap();
    cmd.env("GWADM_CONFIG_DIR", dir.path());
    cmd.args(["config", "get"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("example.com"));
}

#[test]
fn api_commands_fail_without_credentials() {
    let (_dir, mut cmd) = gwadm();
    cmd.args(["user", "list"]);
    cmd.assert()
        .failure()
        .code(78)
        .stderr(predicate::str::contains("client_id"));
}
