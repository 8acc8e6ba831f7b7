#![no_main]

use image_inspector_core::InspectorConfig;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // TOML 파서는 &str을 받으므로 UTF-8 변환 필요
    if let Ok(toml_str) = std::str::from_utf8(data) {
        if let Ok(config) = InspectorConfig::parse(toml_str) {
            let _ = config.validate();
            let _ = config.target();
        }
    }
});
