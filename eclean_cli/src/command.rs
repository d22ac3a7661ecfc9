//! Line commands accepted by the interactive session.

use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `pair` presses "Simulate Pairing"; `pair <device>` goes through the link.
    Pair(Option<String>),
    Devices,
    Conveyor(bool),
    Uv(bool),
    EStop,
    Reset,
    Select(String),
    Speed(String),
    Time(String),
    Auto,
    Logs,
    Settings,
    Status,
    Disconnect,
    /// Let timers run for a while without input.
    Wait(Duration),
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),
    #[error("'{cmd}' expects {expected}")]
    BadArgument {
        cmd: &'static str,
        expected: &'static str,
    },
}

pub const HELP: &str = "\
pair [device]        simulate pairing, or pair with a bonded device
devices              list bonded devices
conveyor on|off      start or stop the conveyor
uv on|off            start or stop the UV light
estop                emergency stop
reset                clear the emergency stop
select <produce>     set the fruit/vegetable type
speed <text>         type into the motor speed field
time <text>          type into the time required field
auto                 run the automatic cycle for the selected produce
logs                 view logs
settings             show settings
status               redraw the current screen
disconnect           close the panel and return to pairing
wait <ms>            let timers run
help                 this text
quit                 leave";

fn on_off(cmd: &'static str, arg: &str) -> Result<bool, CommandError> {
    match arg.to_ascii_lowercase().as_str() {
        "on" | "start" => Ok(true),
        "off" | "stop" => Ok(false),
        _ => Err(CommandError::BadArgument {
            cmd,
            expected: "on or off",
        }),
    }
}

fn text_arg(cmd: &'static str, rest: &str, expected: &'static str) -> Result<String, CommandError> {
    if rest.is_empty() {
        return Err(CommandError::BadArgument { cmd, expected });
    }
    Ok(rest.to_string())
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((h, r)) => (h, r.trim()),
            None => (line, ""),
        };
        match head.to_ascii_lowercase().as_str() {
            "pair" => Ok(Command::Pair((!rest.is_empty()).then(|| rest.to_string()))),
            "devices" => Ok(Command::Devices),
            "conveyor" => on_off("conveyor", rest).map(Command::Conveyor),
            "uv" => on_off("uv", rest).map(Command::Uv),
            "estop" | "e-stop" => Ok(Command::EStop),
            "reset" => Ok(Command::Reset),
            "select" => text_arg("select", rest, "a produce name").map(Command::Select),
            // Free text: an empty entry is allowed and clears the field.
            "speed" => Ok(Command::Speed(rest.to_string())),
            "time" => Ok(Command::Time(rest.to_string())),
            "auto" => Ok(Command::Auto),
            "logs" => Ok(Command::Logs),
            "settings" => Ok(Command::Settings),
            "status" => Ok(Command::Status),
            "disconnect" => Ok(Command::Disconnect),
            "wait" => rest
                .parse::<u64>()
                .map(|ms| Command::Wait(Duration::from_millis(ms)))
                .map_err(|_| CommandError::BadArgument {
                    cmd: "wait",
                    expected: "milliseconds",
                }),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            _ => Err(CommandError::Unknown(head.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("pair", Command::Pair(None))]
    #[case("pair Washer_2", Command::Pair(Some("Washer_2".into())))]
    #[case("conveyor on", Command::Conveyor(true))]
    #[case("UV OFF", Command::Uv(false))]
    #[case("  estop ", Command::EStop)]
    #[case("select Tomato", Command::Select("Tomato".into()))]
    #[case("speed 120 rpm", Command::Speed("120 rpm".into()))]
    #[case("time", Command::Time(String::new()))]
    #[case("wait 250", Command::Wait(Duration::from_millis(250)))]
    #[case("exit", Command::Quit)]
    fn parses(#[case] line: &str, #[case] expected: Command) {
        assert_eq!(line.parse::<Command>(), Ok(expected));
    }

    #[rstest]
    #[case("conveyor sideways")]
    #[case("select")]
    #[case("wait soon")]
    #[case("dance")]
    fn rejects(#[case] line: &str) {
        assert!(line.parse::<Command>().is_err());
    }

    #[test]
    fn unknown_command_names_itself() {
        let err = "launch".parse::<Command>().expect_err("unknown");
        assert_eq!(err.to_string(), "unknown command 'launch' (try 'help')");
    }
}
