use assert_cmd::Command;
use predicates::prelude::*;

#[test]
fn verbose_logs_go_to_stderr_only() {
    Command::cargo_bin("bf")
        .unwrap()
        .env_remove("RUST_LOG")
        .args(["--verbose", "--eval=+++."])
        .assert()
        .success()
        .stdout("\u{3}")
        .stderr(predicate::str::contains("evaluation finished"));
}

#[test]
fn quiet_by_default() {
    Command::cargo_bin("bf")
        .unwrap()
        .env_remove("RUST_LOG")
        .arg("--eval=+++.")
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn verbose_keeps_finer_rust_log_levels() {
    Command::cargo_bin("bf")
        .unwrap()
        .env("RUST_LOG", "bf_engine=trace")
        .args(["--verbose", "--eval=+."])
        .assert()
        .success()
        .stdout("\u{1}")
        .stderr(predicate::str::contains("TRACE").and(predicate::str::contains("evaluation finished")));
}

#[test]
fn verbose_alone_stops_at_debug() {
    Command::cargo_bin("bf")
        .unwrap()
        .env_remove("RUST_LOG")
        .args(["--verbose", "--eval=+."])
        .assert()
        .success()
        .stderr(predicate::str::contains("DEBUG").and(predicate::str::contains("TRACE").not()));
}
