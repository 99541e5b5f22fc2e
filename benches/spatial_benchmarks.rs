use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use placemap::{Backend, BoundingBox, NearestQuery, PlaceMap, Service, ServiceMask, ServiceMatch};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

const WORLD: BoundingBox = BoundingBox::new(0, 0, 1_000_000, 1_000_000);

fn populated_map(backend: Backend, count: usize) -> PlaceMap {
    let mut rng = SmallRng::seed_from_u64(1);
    let mut map = PlaceMap::builder()
        .world(WORLD)
        .backend(backend)
        .build()
        .unwrap();
    for _ in 0..count {
        let x = rng.gen_range(0..1_000_000);
        let y = rng.gen_range(0..1_000_000);
        let services = ServiceMask::from_bits(rng.gen_range(1..=ServiceMask::ALL.bits()));
        map.insert(x, y, services).unwrap();
    }
    map
}

fn benchmark_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("insert");

    for backend in [Backend::QuadTree, Backend::KdTree] {
        group.bench_function(BenchmarkId::new("random_10k", backend), |b| {
            b.iter(|| black_box(populated_map(backend, 10_000)))
        });
    }

    group.finish();
}

fn benchmark_range_query(c: &mut Criterion) {
    let mut group = c.benchmark_group("range_query");

    for backend in [Backend::QuadTree, Backend::KdTree] {
        let map = populated_map(backend, 100_000);
        for side in [1_000u32, 10_000, 100_000] {
            let rect = BoundingBox::new(450_000, 450_000, side, side);
            group.bench_with_input(
                BenchmarkId::new(backend.to_string(), side),
                &rect,
                |b, rect| b.iter(|| map.range_query(black_box(rect))),
            );
        }
    }

    group.finish();
}

fn benchmark_nearest(c: &mut Criterion) {
    let mut group = c.benchmark_group("k_nearest");

    for backend in [Backend::QuadTree, Backend::KdTree] {
        let map = populated_map(backend, 100_000);
        for k in [1usize, 10, 100] {
            group.bench_with_input(BenchmarkId::new(backend.to_string(), k), &k, |b, &k| {
                b.iter(|| {
                    map.k_nearest_by_service(
                        black_box(500_000),
                        black_box(500_000),
                        k,
                        Service::Hospital | Service::Pharmacy,
                    )
                })
            });
        }

        let walking = NearestQuery::new(500_000, 500_000, 10, Service::Atm | Service::Restaurant)
            .matching(ServiceMatch::All)
            .within(5_000.0);
        group.bench_function(BenchmarkId::new(backend.to_string(), "walking"), |b| {
            b.iter(|| map.k_nearest(black_box(&walking)))
        });
    }

    group.finish();
}

fn benchmark_mutations(c: &mut Criterion) {
    let mut group = c.benchmark_group("mutations");

    for backend in [Backend::QuadTree, Backend::KdTree] {
        let mut map = populated_map(backend, 50_000);
        let mut rng = SmallRng::seed_from_u64(2);
        group.bench_function(BenchmarkId::new("insert_delete", backend), |b| {
            b.iter(|| {
                let x = rng.gen_range(0..1_000_000);
                let y = rng.gen_range(0..1_000_000);
                map.insert(x, y, Service::Park).unwrap();
                black_box(map.delete(x, y))
            })
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_insert,
    benchmark_range_query,
    benchmark_nearest,
    benchmark_mutations
);
criterion_main!(benches);
