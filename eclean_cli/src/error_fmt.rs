//! Human-readable error descriptions and structured JSON error formatting.

use eclean_core::EcleanError;

/// Stable name for the error kind, used as `reason` in JSON output.
pub fn error_kind(err: &EcleanError) -> &'static str {
    match err {
        EcleanError::InvalidTransition { .. } => "InvalidTransition",
        EcleanError::DeviceNotResponding(_) => "DeviceNotResponding",
        EcleanError::NoProduceSelected => "NoProduceSelected",
        EcleanError::UnknownProduce(_) => "UnknownProduce",
        EcleanError::PairingRefused(_) => "PairingRefused",
        EcleanError::NotPaired => "NotPaired",
        EcleanError::Config(_) => "Config",
    }
}

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    if let Some(e) = err.downcast_ref::<EcleanError>() {
        return match e {
            EcleanError::Config(msg) if msg.contains("must have headers") => {
                "Invalid headers in produce CSV. Expected 'produce,seconds'.".to_string()
            }
            EcleanError::Config(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing file, a TOML typo, or an out-of-range value.\nHow to fix: Edit the config file, then rerun `eclean self-check`."
            ),
            EcleanError::DeviceNotResponding(what) => format!(
                "What happened: Device not responding ({what}).\nLikely causes: The cleaning device is powered off, out of range, or the link dropped.\nHow to fix: Power-cycle the device, pair again, then retry."
            ),
            EcleanError::PairingRefused(device) => format!(
                "What happened: {device} refused to pair.\nLikely causes: The device is not in the bonded list.\nHow to fix: Add it to [pairing] bonded in the config, or pick one from `devices`."
            ),
            EcleanError::NotPaired => {
                "What happened: No device panel is open.\nHow to fix: Run `pair` and wait for the panel to open.".to_string()
            }
            other => format!(
                "What happened: {other}.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
            ),
        };
    }

    let msg = err.to_string();
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: config error 2, device not responding 3, anything else 1.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    match err.downcast_ref::<EcleanError>() {
        Some(EcleanError::Config(_)) => 2,
        Some(EcleanError::DeviceNotResponding(_)) => 3,
        _ => 1,
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;

    let reason = err.downcast_ref::<EcleanError>().map_or("Error", error_kind);
    json!({ "type": "error", "reason": reason, "message": humanize(err) }).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(EcleanError::Config("panel.log_capacity must be >= 1".into()), 2)]
    #[case(EcleanError::DeviceNotResponding("conveyor not responding".into()), 3)]
    #[case(EcleanError::NotPaired, 1)]
    fn exit_codes(#[case] err: EcleanError, #[case] code: i32) {
        assert_eq!(exit_code_for_error(&eyre::Report::new(err)), code);
    }

    #[test]
    fn untyped_errors_exit_one() {
        assert_eq!(exit_code_for_error(&eyre::eyre!("boom")), 1);
    }

    #[test]
    fn json_carries_reason() {
        let err = eyre::Report::new(EcleanError::DeviceNotResponding("uv light".into()));
        let v: serde_json::Value = serde_json::from_str(&format_error_json(&err)).expect("json");
        assert_eq!(v["reason"], "DeviceNotResponding");
        assert!(v["message"].as_str().unwrap_or("").contains("uv light"));
    }

    #[test]
    fn csv_header_error_is_short() {
        let err = eyre::Report::new(EcleanError::Config(
            "produce CSV must have headers 'produce,seconds', got: name,secs".into(),
        ));
        assert_eq!(
            humanize(&err),
            "Invalid headers in produce CSV. Expected 'produce,seconds'."
        );
    }
}
