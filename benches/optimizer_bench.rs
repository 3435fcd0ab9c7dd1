//! Optimizer and codegen throughput on synthetic handlers.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use hyperfixi_aot::ast::{EventModifiers, Node, NodeRef, analyze};
use hyperfixi_aot::optimizer::{OptimizationLevel, Optimizer};
use hyperfixi_aot::{Compiler, CompilerOptions, HandlerInput, ModuleInput};

/// `n` statement groups, each exercising every pass once.
fn build_handler(n: usize) -> NodeRef {
    let mut body = Vec::with_capacity(n * 3);
    for i in 0..n {
        body.push(Node::command(
            "log",
            vec![Node::binary("+", Node::literal(i as f64), Node::literal(1))],
        ));
        body.push(Node::command_on(
            "add",
            vec![Node::selector(".active")],
            Node::selector(".item"),
        ));
        body.push(Node::repeat(
            Some(Node::literal(3)),
            vec![Node::command("toggle", vec![Node::selector(".on")])],
        ));
    }
    body.push(Node::command("halt", vec![]));
    body.push(Node::command("log", vec![Node::literal("unreachable")]));
    Node::event("click", EventModifiers::default(), body)
}

fn bench_optimize(c: &mut Criterion) {
    let optimizer = Optimizer::new();
    let mut group = c.benchmark_group("optimize");
    for size in [1, 10, 100] {
        let tree = build_handler(size);
        let analysis = analyze(&tree);
        group.bench_with_input(BenchmarkId::from_parameter(size), &tree, |b, tree| {
            b.iter(|| optimizer.optimize(black_box(tree), &analysis, OptimizationLevel::Full));
        });
    }
    group.finish();
}

fn bench_compile_module(c: &mut Criterion) {
    let module = ModuleInput {
        handlers: (0..20)
            .map(|i| HandlerInput {
                node: build_handler(5),
                analysis: None,
                selector: Some(format!(".btn-{i}")),
            })
            .collect(),
    };
    c.bench_function("compile_module_20x5", |b| {
        b.iter(|| {
            Compiler::new(CompilerOptions::default())
                .compile_module(black_box(&module))
                .map(|compiled| compiled.handlers.len())
        });
    });
}

criterion_group!(benches, bench_optimize, bench_compile_module);
criterion_main!(benches);
