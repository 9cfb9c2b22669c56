//! Fuzz target for count config parsing.
//!
//! JSON and TOML parsing plus validation must return errors, never panic.

#![no_main]

use libfuzzer_sys::fuzz_target;
use wc_config::CountConfig;

fuzz_target!(|data: &[u8]| {
    if let Ok(config) = serde_json::from_slice::<CountConfig>(data) {
        let _ = config.validate();
    }
    if let Ok(text) = std::str::from_utf8(data) {
        if let Ok(config) = CountConfig::from_toml_str(text) {
            let _ = config.validate();
        }
    }
});
