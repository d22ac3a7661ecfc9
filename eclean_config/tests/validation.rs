use eclean_config::{Policy, load_toml};
use rstest::rstest;

#[rstest]
#[case("[panel]\nclock_tick_ms = 0\n", "clock_tick_ms must be >= 1")]
#[case("[panel]\nlog_capacity = 0\n", "log_capacity must be >= 1")]
#[case("[pairing]\ndevice_name = \"  \"\n", "device_name must not be empty")]
#[case("[pairing]\ndelay_ms = 120000\n", "delay_ms is unreasonably large")]
#[case("[pairing]\nbonded = [\"\"]\n", "bonded entries must not be empty")]
#[case("[conveyor]\nlength_m = 0.0\n", "length_m must be > 0")]
#[case("[conveyor]\npulley_radius_m = -0.05\n", "pulley_radius_m must be > 0")]
#[case("[produce_times]\nSpinach = 75\n", "unknown produce 'spinach'")]
#[case("[produce_times]\nTomato = 0\n", "produce_times.tomato must be >= 1")]
#[case("[logging]\nrotation = \"weekly\"\n", "rotation must be one of")]
fn rejects_invalid_values(#[case] toml: &str, #[case] needle: &str) {
    let cfg = load_toml(toml).expect("parse TOML");
    let err = cfg.validate().expect_err("should reject");
    assert!(
        format!("{err}").to_lowercase().contains(needle),
        "error {err} does not mention {needle}"
    );
}

#[test]
fn accepts_full_document() {
    let toml = r#"
[pairing]
device_name = "Washer_42"
delay_ms = 500
bonded = ["Washer_42", "Washer_43"]

[panel]
clock_tick_ms = 250
log_capacity = 16

[machine]
policy = "strict"
uv_requires_conveyor = true

[conveyor]
length_m = 2.0
pulley_radius_m = 0.04

[produce_times]
Tomato = 25
Potato = 100

[logging]
file = "eclean.log"
level = "debug"
rotation = "daily"
"#;
    let cfg = load_toml(toml).expect("parse TOML");
    cfg.validate().expect("valid config");
    assert_eq!(cfg.pairing.device_name, "Washer_42");
    assert_eq!(cfg.pairing.bonded.len(), 2);
    assert_eq!(cfg.machine.policy, Policy::Strict);
    assert!(cfg.machine.uv_requires_conveyor);
    assert_eq!(cfg.produce_times.get("Potato"), Some(&100));
}

#[test]
fn unknown_keys_in_sections_are_tolerated() {
    // Forward-compatible: extra keys are ignored by serde by default.
    let cfg = load_toml("[panel]\ntheme = \"dark\"\n").expect("parse TOML");
    cfg.validate().expect("valid config");
}
