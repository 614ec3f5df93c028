use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sqlbind::{Fragment, Numbered, QMark, Template, and, col, in_list, where_};

/// Build a statement with `n` equality filters:
/// SELECT col0, col1, ... FROM t WHERE col0 = $1 AND col1 = $2 ...
fn build_select(n: usize) -> Fragment {
    let mut q = Template::new("SELECT ");
    for i in 0..n {
        if i > 0 {
            q.push(", ");
        }
        q.push(&format!("col{i}"));
    }
    q.push(" FROM t ");
    q.push_fragment(where_(
        [],
        (0..n).map(|i| (format!("col{i}"), i as i64)),
    ));
    q.build()
}

fn bench_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render/select");

    for n in [1, 5, 10, 50, 100] {
        let f = build_select(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &f, |b, f| {
            b.iter(|| black_box(f.render(&Numbered)));
        });
    }

    group.finish();
}

fn bench_build_and_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render/build_and_render");

    for n in [1, 5, 10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| black_box(build_select(n).render(&QMark)));
        });
    }

    group.finish();
}

fn bench_in_list(c: &mut Criterion) {
    let mut group = c.benchmark_group("render/in_list");

    // Sizes on both sides of the literal fallback threshold.
    for n in [5, 20, 50, 100, 500] {
        let values: Vec<i64> = (0..n).collect();
        group.bench_with_input(BenchmarkId::from_parameter(n), &values, |b, values| {
            b.iter(|| {
                let f = in_list("id", values.iter().copied(), false).unwrap_or_default();
                black_box(f.render(&QMark));
            });
        });
    }

    group.finish();
}

fn bench_nested_conditions(c: &mut Criterion) {
    let mut group = c.benchmark_group("render/nested_and");

    for n in [1, 5, 10, 50] {
        let conds: Vec<Fragment> = (0..n).map(|i| col(format!("col{i}")).eq(i as i64)).collect();

        group.bench_with_input(BenchmarkId::from_parameter(n), &conds, |b, conds| {
            b.iter(|| {
                let f = where_([and(conds.iter().cloned())], Vec::<(&str, i64)>::new());
                black_box(f.render(&Numbered));
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_render,
    bench_build_and_render,
    bench_in_list,
    bench_nested_conditions
);
criterion_main!(benches);
