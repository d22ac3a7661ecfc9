use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::PathBuf;
use assert_cmd::Command;
use tempfile::tempdir;

// Short pairing delay keeps the scripted sessions quick.
fn write_valid_config(dir: &tempfile::TempDir) -> PathBuf {
    let toml = r#"
[pairing]
device_name = "Android_ECleanApp"
delay_ms = 20
bonded = ["Android_ECleanApp", "Washer_2"]

[panel]
clock_tick_ms = 1000
log_capacity = 50

[machine]
policy = "strict"

[produce_times]
Tomato = 1
"#;
    let path = dir.path().join("cfg.toml");
    fs::write(&path, toml).unwrap();
    path
}

fn eclean(cfg: &PathBuf) -> Command {
    let mut cmd = Command::cargo_bin("eclean").unwrap();
    cmd.arg("--log-level").arg("error").arg("--config").arg(cfg);
    cmd
}

#[rstest]
#[case(&["--help"], 0, "Usage:", "stdout")]
#[case(&["self-check"], 0, "ok", "stdout")]
#[case(&["produce"], 0, "Potato   01:30  (4 rpm)", "stdout")]
#[case(&["produce"], 0, "Tomato   00:01", "stdout")]
#[case(&["launch"], 2, "unrecognized subcommand", "stderr")]
fn cli_table_cases(
    #[case] args: &[&str],
    #[case] exit_code: i32,
    #[case] needle: &str,
    #[case] stream: &str,
) {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    let mut cmd = eclean(&cfg);
    for a in args {
        cmd.arg(a);
    }
    let assert = cmd.assert().code(exit_code);

    match stream {
        "stdout" => {
            assert.stdout(predicate::str::contains(needle));
        }
        "stderr" => {
            assert.stderr(predicate::str::contains(needle));
        }
        other => panic!("unknown stream: {other}"),
    }
}

#[rstest]
fn pairing_opens_the_panel_and_buttons_acknowledge() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    eclean(&cfg)
        .arg("run")
        .write_stdin("pair\nwait 200\nconveyor on\nuv on\nestop\nconveyor on\nreset\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Ready to pair..."))
        .stdout(predicate::str::contains("✅ Android_ECleanApp Paired!"))
        .stdout(predicate::str::contains("Status: READY"))
        .stdout(predicate::str::contains("System Start"))
        .stdout(predicate::str::contains("Status: RUNNING"))
        .stdout(predicate::str::contains(
            "Emergency stop activated! Device halted.",
        ))
        .stdout(predicate::str::contains("Action Refused"))
        .stdout(predicate::str::contains("Emergency stop cleared. Device ready."));
}

#[rstest]
fn panel_commands_before_pairing_report_not_paired() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);

    eclean(&cfg)
        .arg("run")
        .write_stdin("conveyor on\nfly away\nquit\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("error: not paired"))
        .stdout(predicate::str::contains("unknown command 'fly'"));
}

#[rstest]
fn script_file_runs_the_auto_cycle_to_completion() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);
    let script = dir.path().join("session.txt");
    fs::write(
        &script,
        "# tomato run\npair Washer_2\nwait 200\nselect tomato\nauto\nwait 1600\nlogs\n",
    )
    .unwrap();

    eclean(&cfg)
        .arg("run")
        .arg("--script")
        .arg(&script)
        .assert()
        .success()
        .stdout(predicate::str::contains("✅ Washer_2 Paired!"))
        .stdout(predicate::str::contains("Fruit/Vegetable Type: [ Tomato v ]"))
        .stdout(predicate::str::contains("Cycle Complete"))
        .stdout(predicate::str::contains("Tomato cleaning finished."))
        .stdout(predicate::str::contains("auto cycle Tomato finished"));
}

#[rstest]
fn bad_config_exits_with_config_code() {
    let dir = tempdir().unwrap();
    let cfg = dir.path().join("bad.toml");
    fs::write(&cfg, "[panel]\nlog_capacity = 0\n").unwrap();

    eclean(&cfg)
        .arg("self-check")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("panel.log_capacity must be >= 1"));
}

#[rstest]
fn missing_config_file_is_a_config_error() {
    let dir = tempdir().unwrap();
    let cfg = dir.path().join("nope.toml");

    eclean(&cfg)
        .arg("self-check")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid configuration"));
}

#[rstest]
fn cli_reports_bad_produce_csv_header() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);
    let bad_csv = dir.path().join("times.csv");
    fs::write(&bad_csv, "name,secs\nTomato,30\n").unwrap();

    eclean(&cfg)
        .arg("--produce-csv")
        .arg(&bad_csv)
        .arg("self-check")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Invalid headers"));
}

#[rstest]
fn produce_csv_overrides_clean_times() {
    let dir = tempdir().unwrap();
    let cfg = write_valid_config(&dir);
    let csv = dir.path().join("times.csv");
    fs::write(&csv, "produce,seconds\nCarrot,60\n").unwrap();

    eclean(&cfg)
        .arg("--produce-csv")
        .arg(&csv)
        .arg("produce")
        .assert()
        .success()
        .stdout(predicate::str::contains("Carrot   01:00  (6 rpm)"));
}
