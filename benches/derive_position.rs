use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion};
use hifitime::Epoch;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use obscoords::conversion::AngleFormat;
use obscoords::coordinates::{CoordinateVariant, Equatorial};
use obscoords::factory::CoordArgs;
use obscoords::observers::{LimitWindow, Observatory};
use obscoords::planets::Planet;
use obscoords::target::{context::ObservingContext, CoordinateTarget};

fn context() -> ObservingContext {
    let site = Observatory::from_degrees("Cerro Pachon", -70.7366, -30.2407, 2715.0)
        .unwrap()
        .with_limits(LimitWindow::AzEl {
            el_min: 0.35,
            el_max: 1.5,
        });
    ObservingContext::new(Epoch::from_gregorian_utc_hms(2025, 9, 1, 3, 0, 0))
        .with_telescope(Arc::new(site))
}

/// Az/El and observability of random catalogue positions.
fn bench_fixed_equatorial(c: &mut Criterion) {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    let ctx = context();
    let samples = 1_000usize;

    c.bench_function("derive_position/fixed_equatorial", |b| {
        b.iter_batched(
            || {
                (0..samples)
                    .map(|_| {
                        let ra = rng.random::<f64>() * std::f64::consts::TAU;
                        let dec = rng.random_range(-1.5..1.5);
                        CoordinateTarget::new(
                            CoordinateVariant::FixedEquatorial(Equatorial::j2000(ra, dec).unwrap()),
                            ctx.clone(),
                        )
                    })
                    .collect::<Vec<_>>()
            },
            |targets| {
                for target in targets {
                    black_box(target.azimuth(AngleFormat::Radians).unwrap());
                    black_box(target.elevation(AngleFormat::Radians).unwrap());
                    black_box(target.is_observable());
                }
            },
            BatchSize::LargeInput,
        )
    });
}

fn bench_planets(c: &mut Criterion) {
    let ctx = context();
    let targets: Vec<_> = Planet::ALL
        .iter()
        .map(|p| CoordinateTarget::new(CoordinateVariant::NamedPlanet(*p), ctx.clone()))
        .collect();

    c.bench_function("derive_position/planets", |b| {
        b.iter(|| {
            for target in &targets {
                black_box(target.apparent_ra(AngleFormat::Radians).unwrap());
            }
        })
    });
}

fn bench_orbital_elements(c: &mut Criterion) {
    let elements = CoordArgs::new()
        .with("epoch", 60800.0)
        .with("orbinc", 10.59)
        .with("anode", 80.25)
        .with("perih", 73.30)
        .with("aorq", 2.7675)
        .with("e", 0.0796)
        .with("aorl", 188.7);
    let target =
        CoordinateTarget::from_args(&CoordArgs::new().with("elements", elements), context())
            .unwrap();

    c.bench_function("derive_position/orbital_elements", |b| {
        b.iter(|| black_box(target.elevation(AngleFormat::Degrees).unwrap()))
    });
}

fn bench_status_summary(c: &mut Criterion) {
    let target = CoordinateTarget::from_args(
        &CoordArgs::new()
            .with("type", "J2000")
            .with("ra", "18 36 56.336")
            .with("dec", "+38 47 01.28")
            .with("name", "Vega"),
        context(),
    )
    .unwrap();

    c.bench_function("derive_position/status_summary", |b| {
        b.iter(|| black_box(target.status_summary()))
    });
}

criterion_group!(
    name = benches;
    config = Criterion::default();
    targets = bench_fixed_equatorial, bench_planets, bench_orbital_elements, bench_status_summary
);
criterion_main!(benches);
