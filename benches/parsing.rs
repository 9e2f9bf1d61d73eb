//! Benchmarks for scenario markup parsing.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use scenarist::document::Document;

fn bench_parse_simple(c: &mut Criterion) {
    let source = "# 導入\n> 読み上げ\n\n{{HO1}}";
    c.bench_function("parse_simple", |b| {
        b.iter(|| Document::parse(black_box(source)))
    });
}

fn bench_parse_medium(c: &mut Criterion) {
    let source = include_str!("../tests/fixtures/sample.scn");
    c.bench_function("parse_medium", |b| {
        b.iter(|| Document::parse(black_box(source)))
    });
}

criterion_group!(benches, bench_parse_simple, bench_parse_medium);
criterion_main!(benches);
