//! Benchmark: capability decoding and input decoding throughput.
//!
//! Run with: `cargo bench -p weft-core --bench terminfo_bench`
//!
//! Decoding happens once per resolution, so the interesting numbers are the
//! bundled xterm image and termcap entry end to end. Key decoding runs on
//! every read, measured over a typical burst of mixed input.

use std::hint::black_box;

use criterion::{Criterion, criterion_group, criterion_main};
use weft_core::capability_resolver::{EMBEDDED_TERMCAP, EMBEDDED_TERMINFO};
use weft_core::input_pipeline::InputPipeline;
use weft_core::key_decoder::{decode, split_sequences};
use weft_core::{termcap, terminfo};

const BURST: &str = "hello\x1b[A\x1b[B\x1b[3;5~\x1bOP\x1bx\r한국어 입력\r\x03";

fn bench_capability_decoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("capability_decoding");

    group.bench_function("terminfo_xterm", |b| {
        b.iter(|| terminfo::parse(black_box(EMBEDDED_TERMINFO), "<bench>"));
    });

    group.bench_function("termcap_xterm", |b| {
        b.iter(|| termcap::parse(black_box(EMBEDDED_TERMCAP), "xterm", "<bench>"));
    });

    let store = terminfo::parse(EMBEDDED_TERMINFO, "<bench>").ok();
    group.bench_function("lookup_by_capname", |b| {
        b.iter(|| {
            store
                .as_ref()
                .map(|s| (s.string(black_box("cup")), s.number(black_box("cols"))))
        });
    });

    group.finish();
}

fn bench_input_decoding(c: &mut Criterion) {
    let mut group = c.benchmark_group("input_decoding");

    group.bench_function("split_and_decode", |b| {
        b.iter(|| {
            split_sequences(black_box(BURST))
                .filter_map(decode)
                .count()
        });
    });

    group.bench_function("pipeline_feed_bytes", |b| {
        b.iter(|| {
            let mut input = InputPipeline::default();
            input.feed_bytes(black_box(BURST.as_bytes())).len()
        });
    });

    group.finish();
}

criterion_group!(benches, bench_capability_decoding, bench_input_decoding);
criterion_main!(benches);
