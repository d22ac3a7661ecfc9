use std::fs;
use assert_cmd::Command;
use tempfile::tempdir;

fn json_lines(stdout: &[u8]) -> Vec<serde_json::Value> {
    String::from_utf8_lossy(stdout)
        .lines()
        .map(|l| {
            serde_json::from_str(l).unwrap_or_else(|e| panic!("not JSON ({e}): {l}"))
        })
        .collect()
}

/// Every stdout line is a JSON object with a `type`; acknowledgments carry
/// severity, title and message.
#[test]
fn json_session_schema() {
    let dir = tempdir().unwrap();
    let cfg = dir.path().join("cfg.toml");
    fs::write(&cfg, "[pairing]\ndelay_ms = 10\n").unwrap();

    let mut cmd = Command::cargo_bin("eclean").unwrap();
    cmd.arg("--json")
        .arg("--log-level")
        .arg("error")
        .arg("--config")
        .arg(&cfg)
        .arg("run")
        .write_stdin("pair\nwait 150\nselect Banana\nconveyor on\nconveyor off\nquit\n");

    let out = cmd.assert().success().get_output().stdout.clone();
    let lines = json_lines(&out);
    assert!(lines.iter().all(|v| v["type"].is_string()));

    let first = &lines[0];
    assert_eq!(first["type"], "pairing");
    assert_eq!(first["tone"], "blue");

    assert!(lines.iter().any(|v| v["type"] == "pairing"
        && v["text"] == "✅ Android_ECleanApp Paired!"
        && v["tone"] == "green"));

    let acks: Vec<&serde_json::Value> = lines.iter().filter(|v| v["type"] == "ack").collect();
    assert_eq!(acks.len(), 2, "one acknowledgment per button press");
    assert_eq!(acks[0]["severity"], "info");
    assert_eq!(acks[0]["title"], "System Start");
    assert_eq!(acks[1]["severity"], "warning");
    assert_eq!(acks[1]["message"], "Cleaning cycle stopped.");

    let last_panel = lines
        .iter()
        .rev()
        .find(|v| v["type"] == "panel")
        .expect("panel line");
    assert_eq!(last_panel["status"], "STOPPED");
    assert_eq!(last_panel["selection"], "Banana");
    assert_eq!(last_panel["motor_speed"], "### rpm");
}

#[test]
fn json_produce_listing() {
    let mut cmd = Command::cargo_bin("eclean").unwrap();
    cmd.arg("--json").arg("produce");
    let out = cmd.assert().success().get_output().stdout.clone();
    let lines = json_lines(&out);
    assert_eq!(lines.len(), 5);
    assert_eq!(lines[3]["produce"], "Tomato");
    assert_eq!(lines[3]["seconds"], 30);
    assert_eq!(lines[3]["rpm"], 12);
}
