#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! E-Cleaning device model (hardware-agnostic).
//!
//! Everything the front end shows is owned here; actuators are reached only
//! through `eclean_traits::Motor`, `eclean_traits::Lamp` and
//! `eclean_traits::Link`.
//!
//! ## Architecture
//!
//! - **Pairing**: banner plus one-shot delay before the panel opens (`pairing`)
//! - **Panel**: buttons, selector, text fields and clock label (`panel`)
//! - **State machine**: `Machine` plans transitions under a `Policy` (`machine`)
//! - **Controller**: drives the actuators to match the plan (`controller`)
//! - **Auto cycle**: per-produce cleaning time and conveyor rpm (`cycle`)
//! - **Screens**: pairing to panel and back (`app`)
//!
//! Time is always read through a `Clock`, so tests drive every timer with
//! `TestClock` instead of sleeping.

pub mod ack;
pub mod app;
pub mod clock_label;
pub mod config;
pub mod controller;
pub mod conversions;
pub mod cycle;
pub mod error;
pub mod logger;
pub mod machine;
pub mod pairing;
pub mod panel;
pub mod status;
pub mod timer;
pub mod types;

pub use ack::{Acknowledgment, Severity};
pub use app::{App, AppTick, Screen};
pub use config::{PairingSettings, PanelSettings};
pub use controller::DeviceController;
pub use cycle::{AutoCycle, ConveyorGeometry, ProduceCatalogue};
pub use error::{EcleanError, Refusal};
pub use logger::{EventLog, LogEntry};
pub use machine::{Machine, MachineState, Policy};
pub use pairing::PairingScreen;
pub use panel::{DevicePanel, PanelBuilder, PanelTick, SharedClock};
pub use status::{DeviceStatus, Tone};
pub use types::{Action, Produce, Selection, Subsystem};
