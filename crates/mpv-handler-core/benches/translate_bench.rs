//! Criterion benchmarks for the link translation steps.
//!
//! Run with:
//! ```bash
//! cargo bench --package mpv-handler-core --bench translate_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use mpv_handler_core::{build_arguments, query_unescape, strip_scheme, url_path, OverrideMap};

const RAW: &str = "mpv://https%3A%2F%2Fcdn.example.com%2Fhls%2Fseries%2Fepisode-01%2Findex.m3u8%3Ftoken%3Dabc%2Bdef";

fn make_overrides(count: usize) -> OverrideMap {
    (0..count)
        .map(|i| (format!("/site-{i}/"), format!("Agent/{i}")))
        .chain(std::iter::once(("/hls/".to_string(), "HlsAgent".to_string())))
        .collect()
}

fn bench_decode(c: &mut Criterion) {
    let payload = strip_scheme(RAW).unwrap_or_default();
    c.bench_function("query_unescape", |b| {
        b.iter(|| query_unescape(black_box(payload)))
    });
}

fn bench_full_translation(c: &mut Criterion) {
    let overrides = make_overrides(50);
    c.bench_function("translate_with_50_patterns", |b| {
        b.iter(|| {
            let payload = strip_scheme(black_box(RAW)).unwrap_or_default();
            let decoded = query_unescape(payload).unwrap_or_default();
            let selected = url_path(&decoded)
                .and_then(|path| overrides.first_match(&path).map(|(_, ua)| ua.to_string()));
            build_arguments(&decoded, selected.as_deref())
        })
    });
}

criterion_group!(benches, bench_decode, bench_full_translation);
criterion_main!(benches);
