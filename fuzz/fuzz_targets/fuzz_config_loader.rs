#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    // Parse and validation errors are fine; panics are not.
    if let Ok(cfg) = eclean_config::load_toml(data)
        && cfg.validate().is_ok()
    {
        // A valid config must always map onto panel settings.
        let settings = eclean_core::PanelSettings::from(&cfg);
        for p in eclean_core::Produce::ALL {
            let _ = settings.geometry.rpm_for(settings.catalogue.seconds(p));
        }
    }
});
