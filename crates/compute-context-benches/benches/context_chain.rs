// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
// criterion_group!/criterion_main! expand to undocumented functions that cannot
// carry #[allow] (attributes on macro invocations are ignored). Crate-level
// suppress is required for benchmark binaries using Criterion.
#![allow(missing_docs)]
//! Benchmark: building nested context chains and reading shared parents.
//!
//! - `build_depth_N`: stack-built chain of N repeat-zone frames.
//! - `arena_depth_N`: same chain stored in a `ContextArena`.
//! - `shared_parent_fanout_N`: N sibling contexts built in parallel (rayon)
//!   under one shared group context, as sibling subtrees are during evaluation.
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use compute_context::{
    ComputeContext, ComputeContextHash, ContextArena, GroupNodeContext, NamedContext,
    RepeatZoneContext,
};
use rayon::prelude::*;

fn build_chain(parent: &ComputeContext<'_>, remaining: u32) -> ComputeContextHash {
    let ctx = ComputeContext::child(parent, RepeatZoneContext::new(1, remaining));
    if remaining == 0 {
        ctx.hash()
    } else {
        build_chain(ctx.as_dyn(), remaining - 1)
    }
}

fn bench_stack_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("context_chain/build_depth");
    for &depth in &[4u32, 16, 64] {
        group.throughput(Throughput::Elements(u64::from(depth)));
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            let root = ComputeContext::root(NamedContext::new("scene"));
            b.iter(|| black_box(build_chain(root.as_dyn(), black_box(depth))));
        });
    }
    group.finish();
}

fn bench_arena_chain(c: &mut Criterion) {
    let mut group = c.benchmark_group("context_chain/arena_depth");
    for &depth in &[4u32, 16, 64] {
        group.throughput(Throughput::Elements(u64::from(depth)));
        group.bench_with_input(BenchmarkId::from_parameter(depth), &depth, |b, &depth| {
            b.iter(|| {
                let mut arena = ContextArena::new();
                let mut tail = arena.add_root(NamedContext::new("scene"));
                for i in 0..depth {
                    if let Ok(id) = arena.add_child(tail, RepeatZoneContext::new(1, i)) {
                        tail = id;
                    }
                }
                black_box(arena.hash(tail))
            });
        });
    }
    group.finish();
}

fn bench_shared_parent(c: &mut Criterion) {
    let mut group = c.benchmark_group("context_chain/shared_parent_fanout");
    let root = ComputeContext::root(NamedContext::new("scene"));
    let shared = ComputeContext::child(&root, GroupNodeContext::named(3, 0, "Foo"));
    for &n in &[64u32, 1_024, 16_384] {
        group.throughput(Throughput::Elements(u64::from(n)));
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            let parent = shared.as_dyn();
            b.iter(|| {
                let v1_xor = (0..n)
                    .into_par_iter()
                    .map(|i| ComputeContext::child(parent, RepeatZoneContext::new(9, i)).hash().v1)
                    .reduce(|| 0, |a, b| a ^ b);
                black_box(v1_xor)
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_stack_chain, bench_arena_chain, bench_shared_parent);
criterion_main!(benches);
