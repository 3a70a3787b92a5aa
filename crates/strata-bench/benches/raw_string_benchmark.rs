//! Long bracket matching benchmarks
//!
//! Run with: `cargo bench --package strata-bench raw_string_benchmark`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use std::hint::black_box;
use strata_core::{
    ActionTable, Actions, ApplyMode, HookDecl, MemoryInput, RawString, Scanner, Session,
    StrataConfig,
};

const SMALL_SCRIPT: &str = r#"
local help = [[
Usage: tool [options]
]]
local pattern = [=[%[%[(.-)%]%]]=]
print(help, pattern)
"#;

/// Benchmark one literal with and without hooks
fn bench_single_literal(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_literal");
    let literal = format!("[==[{}]==]", "x]=]".repeat(256));
    let rule = RawString::lua();

    let nothing = ActionTable::<usize>::nothing();
    group.bench_function("control_only", |b| {
        b.iter(|| {
            let mut input = MemoryInput::new(black_box(&literal));
            let mut count = 0usize;
            let mut session = Session::new(&mut input, &nothing, &mut count);
            black_box(session.parse(&rule).unwrap())
        });
    });

    let counting = Actions::new()
        .on(
            "raw_string.content",
            HookDecl::new().with_state(|m, count: &mut usize| *count += m.text.len()),
        )
        .compile(ApplyMode::Action)
        .unwrap();
    group.bench_function("content_hook", |b| {
        b.iter(|| {
            let mut input = MemoryInput::new(black_box(&literal));
            let mut count = 0usize;
            let mut session = Session::new(&mut input, &counting, &mut count);
            black_box(session.parse(&rule).unwrap())
        });
    });

    group.finish();
}

/// Benchmark whole-file scans of generated sources
fn bench_scanner(c: &mut Criterion) {
    let mut group = c.benchmark_group("scanner");
    let scanner = Scanner::new(StrataConfig::default()).unwrap();

    group.bench_function("small_script", |b| {
        b.iter(|| black_box(scanner.scan(SMALL_SCRIPT).unwrap()));
    });

    for &copies in &[10, 100, 1000] {
        let source = SMALL_SCRIPT.repeat(copies);
        group.throughput(Throughput::Bytes(source.len() as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}_copies_{}KB", copies, source.len() / 1024)),
            &source,
            |b, source| b.iter(|| black_box(scanner.scan(source).unwrap())),
        );
    }

    group.finish();
}

criterion_group!(benches, bench_single_literal, bench_scanner);
criterion_main!(benches);
