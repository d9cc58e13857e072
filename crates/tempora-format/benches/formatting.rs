use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use tempora_format::{iso, Formatter, PatternCache};

const INSTANT: i64 = 1_710_073_845_123;

fn bench_print(c: &mut Criterion) {
    let formatter = Formatter::for_pattern("EEE, d MMM yyyy HH:mm:ss.SSS ZZ").unwrap();
    c.bench_function("print_pattern", |b| {
        b.iter(|| formatter.print_millis(black_box(INSTANT)).unwrap())
    });

    let date_time = iso::date_time().unwrap();
    c.bench_function("print_iso_date_time", |b| {
        b.iter(|| date_time.print_millis(black_box(INSTANT)).unwrap())
    });
}

fn bench_parse(c: &mut Criterion) {
    let formatter = Formatter::for_pattern("yyyy-MM-dd HH:mm:ss.SSSZZ").unwrap();
    c.bench_function("parse_pattern", |b| {
        b.iter(|| formatter.parse_millis(black_box("2024-03-10 12:30:45.123+05:30")).unwrap())
    });

    let parser = iso::date_optional_time_parser().unwrap();
    c.bench_function("parse_iso_optional_time", |b| {
        b.iter(|| parser.parse_millis(black_box("2024-070T12:30:45,5+01:00")).unwrap())
    });
}

fn bench_compile(c: &mut Criterion) {
    c.bench_function("compile_pattern", |b| {
        b.iter(|| Formatter::for_pattern(black_box("yyyy-MM-dd'T'HH:mm:ss.SSSZZ")).unwrap())
    });

    let cache = PatternCache::new();
    c.bench_function("compile_pattern_cached", |b| {
        b.iter(|| cache.for_pattern(black_box("yyyy-MM-dd'T'HH:mm:ss.SSSZZ")).unwrap())
    });
}

criterion_group!(benches, bench_print, bench_parse, bench_compile);
criterion_main!(benches);
