//! 설정 검증 벤치마크
//!
//! 규칙 평가(파일시스템 조회 포함)와 반복 플래그 중복 제거 비용을 측정합니다.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use image_inspector_core::config::InspectorConfig;
use image_inspector_core::util::deduplicate;

fn create_scan_config() -> InspectorConfig {
    InspectorConfig {
        image_ref: "registry.example.com/team/app:1.4.2".to_owned(),
        scan_types: vec!["openscap".to_owned(), "clamav".to_owned()],
        generate_html_report: true,
        clamav_socket_path: "/run/clamd.scan/clamd.sock".to_owned(),
        ..InspectorConfig::default()
    }
}

fn bench_validate(c: &mut Criterion) {
    let valid = create_scan_config();

    let mut early_failure = create_scan_config();
    early_failure.connection_uri.clear();

    let mut late_failure = create_scan_config();
    late_failure.pull_policy = "sometimes".to_owned();

    let mut group = c.benchmark_group("validate");
    group.throughput(Throughput::Elements(1));

    group.bench_function("valid_scan_config", |b| {
        b.iter(|| black_box(&valid).validate())
    });

    group.bench_function("first_rule_failure", |b| {
        b.iter(|| black_box(&early_failure).validate())
    });

    group.bench_function("last_rule_failure", |b| {
        b.iter(|| black_box(&late_failure).validate())
    });

    group.finish();
}

fn bench_deduplicate(c: &mut Criterion) {
    let mut group = c.benchmark_group("deduplicate");

    for size in [4usize, 16, 64] {
        let items: Vec<String> = (0..size).map(|i| format!("flag-{}", i % 3)).collect();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &items, |b, items| {
            b.iter(|| deduplicate(black_box(items)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_validate, bench_deduplicate);
criterion_main!(benches);
