use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use markdown_blocktree_engine::parsing::{Parser, annotate};
use std::hint::black_box;
mod common;

fn bench_annotate(c: &mut Criterion) {
    let mut group = c.benchmark_group("annotate");
    group.sample_size(10);

    let content = common::generate_markdown_content(100);
    group.bench_function("pulldown_cmark_to_runs", |b| {
        b.iter(|| annotate(black_box(&content), &Default::default()));
    });

    group.finish();
}

fn bench_full_vs_incremental(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");
    group.sample_size(10);

    let original = common::generate_complex_markdown(50, 4);
    let edited = common::edit_first_heading(&original);

    group.bench_function("cold", |b| {
        b.iter(|| Parser::default().parse(black_box(&original)));
    });

    group.bench_function("incremental_after_edit", |b| {
        b.iter_batched(
            || {
                let mut parser = Parser::default();
                let _ = parser.parse(&original);
                parser
            },
            |mut parser| parser.parse(black_box(&edited)),
            BatchSize::SmallInput,
        );
    });

    group.bench_function("unchanged", |b| {
        let mut parser = Parser::default();
        let _ = parser.parse(&original);
        b.iter(|| parser.parse(black_box(&original)));
    });

    group.finish();
}

criterion_group!(benches, bench_annotate, bench_full_vs_incremental);
criterion_main!(benches);
