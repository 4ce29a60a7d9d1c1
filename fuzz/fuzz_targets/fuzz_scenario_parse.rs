#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = flow_sim::Scenario::from_toml_str(text);
        let _ = flow_sim::SimConfig::from_toml_str(text);
    }
});
