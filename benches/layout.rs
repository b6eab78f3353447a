use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use paddock::core::area::{Dimensions, GridCells, MULTIPLIER, PerimeterLayout};

criterion_group!(benches, generate_layout, apply_area);
criterion_main!(benches);

fn generate_layout(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate_layout");

    for bench in bench::basic_benches() {
        let dimensions =
            Dimensions::from_cells(GridCells { width: bench.width, depth: bench.depth }, MULTIPLIER);

        group
            .bench_function(bench.name, |b| {
                b.iter(|| PerimeterLayout::generate(black_box(dimensions)));
            })
            .sample_size(bench.measurement.sample_size)
            .measurement_time(bench.measurement.measurement_time);
    }
}

fn apply_area(c: &mut Criterion) {
    let mut group = c.benchmark_group("apply_area");

    for bench in bench::basic_benches() {
        group
            .bench_function(bench.name, |b| {
                b.iter_batched(
                    || bench::plugin_setup(bench.input()),
                    |mut app| {
                        for _ in 0..bench.regenerations {
                            bench::regenerate(&mut app);
                        }
                        bench::segment_count(&mut app)
                    },
                    BatchSize::LargeInput,
                );
            })
            .sample_size(bench.measurement.sample_size)
            .measurement_time(bench.measurement.measurement_time);
    }
}
