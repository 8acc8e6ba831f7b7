#![no_main]

use image_inspector_core::InspectorConfig;
use libfuzzer_sys::fuzz_target;

// 필드 값을 임의 문자열로 채워 검증 규칙이 panic 없이 끝나는지 확인
fuzz_target!(|data: &[u8]| {
    let text = String::from_utf8_lossy(data);
    let mut parts = text.split('\u{0}').map(str::to_owned);
    let mut next = || parts.next().unwrap_or_default();

    let config = InspectorConfig {
        connection_uri: next(),
        image_ref: next(),
        container_ref: next(),
        username: next(),
        password_file: next(),
        scan_results_dir: next(),
        clamav_socket_path: next(),
        result_post_url: next(),
        result_post_token_file: next(),
        pull_policy: next(),
        scan_types: next().split(',').map(str::to_owned).collect(),
        registry_config_files: next().split(',').map(str::to_owned).collect(),
        scan_container_changes: data.first().is_some_and(|b| b & 1 == 1),
        generate_html_report: data.first().is_some_and(|b| b & 2 == 2),
        ..InspectorConfig::default()
    };

    let _ = config.validate();
});
