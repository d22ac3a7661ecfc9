//! Interactive session: owns the app, reads commands from a reader thread and
//! polls every timer between lines.

use crate::command::{Command, HELP};
use crate::error_fmt::error_kind;
use crossbeam_channel as xch;
use eclean_core::panel::SharedClock;
use eclean_core::{Acknowledgment, App, AppTick, EcleanError, LogEntry, PanelSettings, Screen};
use eclean_traits::{Lamp, Link, Motor};
use serde_json::json;
use std::io::{BufRead, Write};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// Longest the loop waits for input before polling timers.
const POLL: Duration = Duration::from_millis(50);

/// Writes screens, dialogs and errors either as text frames or JSON lines.
pub struct Printer<W: Write> {
    out: W,
    json: bool,
}

impl<W: Write> Printer<W> {
    pub fn new(out: W, json: bool) -> Self {
        Self { out, json }
    }

    fn emit(&mut self, text: &str, value: serde_json::Value) -> eyre::Result<()> {
        if self.json {
            writeln!(self.out, "{value}")?;
        } else {
            writeln!(self.out, "{text}")?;
        }
        self.out.flush()?;
        Ok(())
    }

    pub fn screen<M: Motor, L: Lamp, K: Link>(&mut self, app: &App<M, L, K>) -> eyre::Result<()> {
        let now = app.now();
        match app.screen() {
            Screen::Pairing(p) => self.emit(
                &eclean_ui::render_pairing(p, now),
                json!({
                    "type": "pairing",
                    "text": p.status_text(),
                    "tone": p.tone().name(),
                    "pending": p.is_pending(),
                }),
            ),
            Screen::Panel(panel) => {
                let state = panel.state();
                self.emit(
                    &eclean_ui::render_panel(&**panel),
                    json!({
                        "type": "panel",
                        "status": panel.status().label(),
                        "tone": panel.status_tone().name(),
                        "selection": panel.selection().to_string(),
                        "motor_speed": panel.motor_speed_text(),
                        "time_required": panel.time_required_text(),
                        "clock": panel.clock_text(),
                        "conveyor": state.conveyor,
                        "uv": state.uv,
                        "auto_remaining_secs": panel.cycle().map(|c| c.remaining_secs()),
                    }),
                )
            }
        }
    }

    pub fn ack(&mut self, ack: &Acknowledgment) -> eyre::Result<()> {
        self.emit(
            &eclean_ui::render_ack(ack),
            json!({
                "type": "ack",
                "severity": ack.severity.name(),
                "title": ack.title,
                "message": ack.message,
            }),
        )
    }

    pub fn error(&mut self, err: &EcleanError) -> eyre::Result<()> {
        self.emit(
            &format!("error: {err}"),
            json!({ "type": "error", "reason": error_kind(err), "message": err.to_string() }),
        )
    }

    pub fn line(&mut self, kind: &str, text: &str) -> eyre::Result<()> {
        self.emit(text, json!({ "type": kind, "text": text }))
    }

    pub fn devices(&mut self, devices: &[String]) -> eyre::Result<()> {
        let mut text = String::from("=== Bonded Devices ===");
        for (i, d) in devices.iter().enumerate() {
            text.push_str(&format!("\n{}. {d}", i + 1));
        }
        self.emit(&text, json!({ "type": "devices", "devices": devices }))
    }

    pub fn logs(&mut self, entries: &[&LogEntry]) -> eyre::Result<()> {
        let items: Vec<serde_json::Value> = entries
            .iter()
            .map(|e| {
                json!({
                    "timestamp": e.timestamp.to_rfc3339(),
                    "event": e.event,
                    "details": e.details,
                })
            })
            .collect();
        self.emit(
            &eclean_ui::render_logs(entries.iter().copied()),
            json!({ "type": "logs", "entries": items }),
        )
    }
}

enum Flow {
    Continue,
    Quit,
}

pub struct Session<M: Motor, L: Lamp, K: Link, W: Write> {
    app: App<M, L, K>,
    settings: PanelSettings,
    clock: SharedClock,
    printer: Printer<W>,
    shutdown: Arc<AtomicBool>,
}

impl<M: Motor, L: Lamp, K: Link, W: Write> Session<M, L, K, W> {
    pub fn new(
        app: App<M, L, K>,
        settings: PanelSettings,
        clock: SharedClock,
        printer: Printer<W>,
        shutdown: Arc<AtomicBool>,
    ) -> Self {
        Self {
            app,
            settings,
            clock,
            printer,
            shutdown,
        }
    }

    /// Run until `quit`, end of input, or Ctrl-C. The panel is always
    /// switched off on the way out.
    pub fn run(mut self, input: Box<dyn BufRead + Send>) -> eyre::Result<()> {
        let (tx, rx) = xch::bounded::<String>(16);
        let reader = std::thread::Builder::new()
            .name("eclean-input".into())
            .spawn(move || {
                for line in input.lines() {
                    match line {
                        Ok(l) => {
                            if tx.send(l).is_err() {
                                break;
                            }
                        }
                        Err(e) => {
                            tracing::warn!(error = %e, "input read failed");
                            break;
                        }
                    }
                }
            })?;

        self.printer.screen(&self.app)?;
        let result = self.event_loop(&rx);
        if self.app.panel().is_some()
            && let Err(e) = self.app.disconnect()
        {
            tracing::warn!(error = %e, "panel shutdown failed");
        }
        drop(rx);
        // The reader may be parked on a blocking read; it exits with the process.
        if reader.is_finished() {
            let _ = reader.join();
        }
        result
    }

    fn event_loop(&mut self, rx: &xch::Receiver<String>) -> eyre::Result<()> {
        loop {
            if self.shutdown.load(Ordering::Relaxed) {
                tracing::info!("interrupted, leaving session");
                return Ok(());
            }
            match rx.recv_timeout(self.poll_timeout()) {
                Ok(line) => {
                    if let Flow::Quit = self.handle_line(&line)? {
                        return Ok(());
                    }
                }
                Err(xch::RecvTimeoutError::Timeout) => {}
                Err(xch::RecvTimeoutError::Disconnected) => {
                    tracing::debug!("input closed");
                    return Ok(());
                }
            }
            self.tick()?;
        }
    }

    /// Wake for the next due timer, but never sleep past `POLL`.
    fn poll_timeout(&self) -> Duration {
        self.app
            .until_next_tick()
            .map_or(POLL, |d| d.clamp(Duration::from_millis(1), POLL))
    }

    fn tick(&mut self) -> eyre::Result<()> {
        let t: AppTick = self.app.tick();
        if t.panel_opened {
            self.printer.screen(&self.app)?;
        }
        if let Some(ack) = &t.panel.ack {
            self.printer.ack(ack)?;
            self.printer.screen(&self.app)?;
        }
        Ok(())
    }

    fn handle_line(&mut self, line: &str) -> eyre::Result<Flow> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(Flow::Continue);
        }
        let cmd = match line.parse::<Command>() {
            Ok(c) => c,
            Err(e) => {
                self.printer.line("error", &format!("error: {e}"))?;
                return Ok(Flow::Continue);
            }
        };
        tracing::debug!(?cmd, "command");
        match self.dispatch(cmd) {
            Ok(flow) => Ok(flow),
            Err(e) => match e.downcast::<EcleanError>() {
                Ok(domain) => {
                    self.printer.error(&domain)?;
                    Ok(Flow::Continue)
                }
                Err(other) => Err(other),
            },
        }
    }

    fn panel_ack(
        &mut self,
        press: impl FnOnce(&mut eclean_core::DevicePanel<M, L>) -> Acknowledgment,
    ) -> eyre::Result<()> {
        let ack = self.app.with_panel(press)?;
        self.printer.ack(&ack)?;
        self.printer.screen(&self.app)
    }

    fn dispatch(&mut self, cmd: Command) -> eyre::Result<Flow> {
        match cmd {
            Command::Pair(None) => {
                self.app.simulate_pairing()?;
                self.printer.screen(&self.app)?;
            }
            Command::Pair(Some(device)) => {
                let res = self.app.pair_with(&device);
                self.printer.screen(&self.app)?;
                res?;
            }
            Command::Devices => {
                let devices = self.app.bonded_devices();
                self.printer.devices(&devices)?;
            }
            Command::Conveyor(true) => self.panel_ack(|p| p.activate_conveyor())?,
            Command::Conveyor(false) => self.panel_ack(|p| p.deactivate_conveyor())?,
            Command::Uv(true) => self.panel_ack(|p| p.activate_uv_light())?,
            Command::Uv(false) => self.panel_ack(|p| p.deactivate_uv_light())?,
            Command::EStop => self.panel_ack(|p| p.emergency_stop())?,
            Command::Reset => self.panel_ack(|p| p.reset())?,
            Command::Auto => self.panel_ack(|p| p.start_auto_cycle())?,
            Command::Select(name) => {
                self.app.with_panel(|p| p.select_produce_by_name(&name))??;
                self.printer.screen(&self.app)?;
            }
            Command::Speed(text) => {
                self.app.with_panel(|p| p.set_motor_speed_text(text))?;
                self.printer.screen(&self.app)?;
            }
            Command::Time(text) => {
                self.app.with_panel(|p| p.set_time_required_text(text))?;
                self.printer.screen(&self.app)?;
            }
            Command::Logs => {
                let panel = self.app.panel().ok_or(EcleanError::NotPaired)?;
                let entries: Vec<&LogEntry> = panel.view_logs().collect();
                self.printer.logs(&entries)?;
            }
            Command::Settings => {
                let text = eclean_ui::render_settings(&self.settings);
                self.printer.line("settings", &text)?;
            }
            Command::Status => self.printer.screen(&self.app)?,
            Command::Disconnect => {
                self.app.disconnect()?;
                self.printer.screen(&self.app)?;
            }
            Command::Wait(d) => self.wait(d)?,
            Command::Help => self.printer.line("help", HELP)?,
            Command::Quit => return Ok(Flow::Quit),
        }
        Ok(Flow::Continue)
    }

    /// Keep polling timers for `d` without reading input.
    fn wait(&mut self, d: Duration) -> eyre::Result<()> {
        let until = self.clock.now() + d;
        loop {
            let now = self.clock.now();
            if now >= until || self.shutdown.load(Ordering::Relaxed) {
                break;
            }
            self.clock.sleep(self.poll_timeout().min(until - now));
            self.tick()?;
        }
        Ok(())
    }
}
