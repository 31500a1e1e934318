use criterion::{BatchSize, BenchmarkId, Criterion, criterion_group, criterion_main};
use sirenia::graph::Model;
use sirenia::{CompactTreeLayout, CompactTreeOptions, HierarchyModel, Orientation, cycle_remover};
use std::hint::black_box;
use std::time::Duration;

#[derive(Debug, Clone)]
struct TreeSpec {
    name: String,
    node_count: usize,
    fanout: usize,
}

impl TreeSpec {
    /// A complete `fanout`-ary tree in breadth-first order, with sizes varying per node so the
    /// contours are not all rectangles of one shape.
    fn build(&self) -> Model {
        let mut m = Model::new();
        let layer = m.default_parent();
        let mut cells = Vec::with_capacity(self.node_count);
        for i in 0..self.node_count {
            let w = 30.0 + (i % 5) as f64 * 10.0;
            let h = 20.0 + (i % 3) as f64 * 10.0;
            let id = format!("{}_n{i}", self.name);
            let cell = m
                .insert_vertex(layer, id, 0.0, 0.0, w, h)
                .expect("generated ids are unique");
            cells.push(cell);
        }
        for i in 1..self.node_count {
            let parent = (i - 1) / self.fanout;
            let id = format!("{}_e{i}", self.name);
            let _ = m.insert_edge(layer, id, cells[parent], cells[i]);
        }
        m
    }
}

fn bench_compact_tree(c: &mut Criterion) {
    let mut group = c.benchmark_group("compact_tree");
    group.measurement_time(Duration::from_secs(10));

    let cases = [
        ("tree_100_f3", 100usize, 3usize),
        ("tree_1000_f4", 1000usize, 4usize),
        ("tree_4000_f2", 4000usize, 2usize),
    ];

    for (name, node_count, fanout) in cases {
        let spec = TreeSpec {
            name: name.to_string(),
            node_count,
            fanout,
        };
        for orientation in [Orientation::Horizontal, Orientation::Vertical] {
            let layout = CompactTreeLayout::new(CompactTreeOptions {
                orientation,
                ..Default::default()
            });
            group.bench_with_input(
                BenchmarkId::new(format!("execute_{orientation:?}"), name),
                &spec,
                |b, spec| {
                    b.iter_batched(
                        || spec.build(),
                        |mut m| {
                            let parent = m.default_parent();
                            let tree = layout.execute(black_box(&mut m), parent, None);
                            black_box(tree.ok().flatten().map(|t| t.len()));
                        },
                        BatchSize::LargeInput,
                    )
                },
            );
        }
    }

    group.finish();
}

fn bench_cycle_remover(c: &mut Criterion) {
    let mut group = c.benchmark_group("cycle_remover");

    for (name, n) in [("ring_ladder_500", 500usize), ("ring_ladder_2000", 2000usize)] {
        group.bench_with_input(BenchmarkId::new("run", name), &n, |b, &n| {
            b.iter_batched(
                || {
                    let mut h = HierarchyModel::new();
                    let vs: Vec<_> = (0..n).map(|_| h.add_vertex(Vec::new())).collect();
                    for i in 0..n {
                        h.add_edge(vs[i], vs[(i + 1) % n], Vec::new());
                        h.add_edge(vs[i], vs[(i + 7) % n], Vec::new());
                    }
                    h
                },
                |mut h| {
                    let out = cycle_remover::run(black_box(&mut h), &[]);
                    black_box(out.reversed.len());
                },
                BatchSize::LargeInput,
            )
        });
    }

    group.finish();
}

criterion_group!(benches, bench_compact_tree, bench_cycle_remover);
criterion_main!(benches);
