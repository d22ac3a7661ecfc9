#![no_main]
use eclean_core::{Action, DeviceStatus, Machine, Policy};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: (bool, bool, Vec<u8>)| {
    let (permissive, interlock, presses) = data;
    let policy = if permissive {
        Policy::Permissive
    } else {
        Policy::Strict
    };
    let mut m = Machine::new(policy, interlock);
    for b in presses {
        let action = Action::ALL[usize::from(b) % Action::ALL.len()];
        if let Ok(next) = m.plan(action) {
            m.commit(next);
        }
        if action == Action::EmergencyStop {
            assert_eq!(m.status(), DeviceStatus::EmergencyStopped);
        }
    }
});
