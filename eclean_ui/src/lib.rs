#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Plain-text rendering of the pairing screen, device panel and dialogs.
//!
//! Renderers only read the model; they never change it.

use eclean_core::cycle::{format_hhmmss, format_mmss};
use eclean_core::pairing::{PAIR_BUTTON, WINDOW_TITLE};
use eclean_core::{
    Acknowledgment, DevicePanel, LogEntry, PairingScreen, PanelSettings, Produce, Severity,
    Subsystem,
};
use eclean_traits::{Lamp, Motor};
use std::fmt::Write as _;
use std::time::Instant;

const WIDTH: usize = 52;

fn rule(out: &mut String, ch: char) {
    out.extend(std::iter::repeat_n(ch, WIDTH));
    out.push('\n');
}

fn boxed(title: &str, body: &[String]) -> String {
    let mut out = String::new();
    rule(&mut out, '=');
    let _ = writeln!(out, " {title}");
    rule(&mut out, '-');
    for line in body {
        let _ = writeln!(out, " {line}");
    }
    rule(&mut out, '=');
    out
}

pub fn render_pairing(screen: &PairingScreen, now: Instant) -> String {
    let mut body: Vec<String> = screen.status_text().lines().map(str::to_string).collect();
    body.push(format!("({})", screen.tone().name()));
    body.push(String::new());
    match screen.remaining(now) {
        Some(left) => body.push(format!("Opening device panel in {} ms...", left.as_millis())),
        None => body.push(format!("[ {PAIR_BUTTON} ]")),
    }
    boxed(WINDOW_TITLE, &body)
}

fn subsystem_row<M: Motor, L: Lamp>(panel: &DevicePanel<M, L>, sub: Subsystem, label: &str) -> String {
    let state = if panel.is_on(sub) { "ON " } else { "OFF" };
    let ran = format_hhmmss(panel.run_time(sub).as_secs());
    format!("{label:<10}{state}  {ran}  [ Start ] [ Stop ]")
}

pub fn render_panel<M: Motor, L: Lamp>(panel: &DevicePanel<M, L>) -> String {
    let mut body = vec![
        format!("{}  ({})", panel.status_line(), panel.status_tone().name()),
        "-".repeat(WIDTH - 2),
        format!("Fruit/Vegetable Type: [ {} v ]", panel.selection()),
        format!("Motor Speed:   [ {} ]", panel.motor_speed_text()),
        format!("Time Now:      {}", panel.clock_text()),
        format!("Time Required: [ {} ]", panel.time_required_text()),
    ];
    if let Some(cycle) = panel.cycle() {
        body.push(format!(
            "Auto cycle:    {} {} left at {} rpm",
            cycle.produce(),
            format_mmss(u64::from(cycle.remaining_secs())),
            cycle.rpm()
        ));
    }
    body.push(subsystem_row(panel, Subsystem::Conveyor, "Conveyer:"));
    body.push(subsystem_row(panel, Subsystem::UvLight, "UV Light:"));
    body.push("[ Emergency Stop ]  [ Reset ]".to_string());
    body.push(String::new());
    body.push("[ View Logs ]                    [ Settings ⚙️ ]".to_string());
    boxed(panel.title(), &body)
}

pub fn render_ack(ack: &Acknowledgment) -> String {
    let marker = match ack.severity {
        Severity::Info => "i",
        Severity::Warning => "!",
        Severity::Error => "x",
    };
    boxed(
        &format!("({marker}) {}", ack.title),
        &[ack.message.clone(), String::new(), "[ OK ]".to_string()],
    )
}

pub fn render_logs<'a>(entries: impl IntoIterator<Item = &'a LogEntry>) -> String {
    let body: Vec<String> = entries.into_iter().map(ToString::to_string).collect();
    if body.is_empty() {
        return boxed("Logs", &["(no entries)".to_string()]);
    }
    boxed("Logs", &body)
}

/// Read-only view of the settings the panel was opened with.
pub fn render_settings(settings: &PanelSettings) -> String {
    let mut body = vec![
        format!("Policy:            {:?}", settings.policy),
        format!("UV needs conveyor: {}", settings.uv_requires_conveyor),
        format!(
            "Belt:              {:.2} m, pulley radius {:.3} m",
            settings.geometry.length_m, settings.geometry.pulley_radius_m
        ),
        "Clean times:".to_string(),
    ];
    for p in Produce::ALL {
        let secs = settings.catalogue.seconds(p);
        body.push(format!(
            "  {:<8} {}  ({} rpm)",
            p.name(),
            format_mmss(u64::from(secs)),
            settings.geometry.rpm_for(secs)
        ));
    }
    boxed("Settings ⚙️", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use eclean_core::{PairingSettings, PanelBuilder};
    use eclean_hardware::{SimulatedConveyor, SimulatedUvLamp};

    fn panel() -> DevicePanel<SimulatedConveyor, SimulatedUvLamp> {
        PanelBuilder::new()
            .with_motor(SimulatedConveyor::new())
            .with_lamp(SimulatedUvLamp::new())
            .with_wall_clock(Box::new(|| {
                chrono::NaiveTime::from_hms_opt(10, 15, 30).unwrap_or_default()
            }))
            .build()
    }

    #[test]
    fn pairing_screen_shows_banner_and_button() {
        let s = PairingScreen::new(&PairingSettings::default());
        let text = render_pairing(&s, Instant::now());
        assert!(text.contains(" Bluetooth Status\n"));
        assert!(text.contains("🔵 Bluetooth Enabled\n Ready to pair..."));
        assert!(text.contains("[ Simulate Pairing ]"));
    }

    #[test]
    fn pending_pairing_shows_countdown() {
        let mut s = PairingScreen::new(&PairingSettings::default());
        let t0 = Instant::now();
        s.simulate_pairing(t0);
        let text = render_pairing(&s, t0);
        assert!(text.contains("✅ Android_ECleanApp Paired!"));
        assert!(text.contains("Opening device panel in 2000 ms"));
    }

    #[test]
    fn panel_layout_has_every_control() {
        let text = render_panel(&panel());
        for needle in [
            "E-Cleaning Device Panel",
            "Status: READY  (green)",
            "Fruit/Vegetable Type: [ Select v ]",
            "Motor Speed:   [ ### rpm ]",
            "Time Now:      10:15:30",
            "Time Required: [ mm:ss ]",
            "Conveyer:",
            "UV Light:",
            "[ Emergency Stop ]",
            "[ View Logs ]",
            "[ Settings ⚙️ ]",
        ] {
            assert!(text.contains(needle), "missing {needle:?} in\n{text}");
        }
    }

    #[test]
    fn subsystem_rows_follow_state() {
        let mut p = panel();
        p.activate_conveyor();
        let text = render_panel(&p);
        assert!(text.contains("Conveyer: ON "));
        assert!(text.contains("UV Light: OFF"));
    }

    #[test]
    fn ack_dialog_carries_title_and_message() {
        let text = render_ack(&Acknowledgment::emergency_stopped());
        assert!(text.contains("(x) EMERGENCY STOP"));
        assert!(text.contains("Emergency stop activated! Device halted."));
        assert!(text.contains("[ OK ]"));
    }

    #[test]
    fn settings_lists_every_produce() {
        let text = render_settings(&PanelSettings::default());
        assert!(text.contains("Tomato   00:30  (12 rpm)"));
        assert!(text.contains("Potato   01:30  (4 rpm)"));
    }

    #[test]
    fn empty_log_says_so() {
        assert!(render_logs(std::iter::empty()).contains("(no entries)"));
        let p = panel();
        assert!(render_logs(p.view_logs()).contains("panel opened"));
    }
}
