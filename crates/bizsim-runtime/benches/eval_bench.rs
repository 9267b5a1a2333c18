use criterion::{black_box, criterion_group, criterion_main, Criterion};

fn bench_evaluate(c: &mut Criterion) {
    let snapshot = bizsim_core::DecisionSnapshot::baseline();
    let params = bizsim_core::ReferenceParams::baseline();
    c.bench_function("evaluate_round", |b| {
        b.iter(|| bizsim_runtime::evaluate(black_box(&snapshot), black_box(&params)))
    });
}

criterion_group!(benches, bench_evaluate);
criterion_main!(benches);
