use std::f64::consts::PI as PI_F64;

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use magcal::{calibrate, fit_conic, FitConfig, PointSet};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn make_ellipse_points(n: usize) -> Vec<[f64; 2]> {
    let cx = 1250.0f64;
    let cy = -830.0f64;
    let a = 410.0f64;
    let b = 355.0f64;
    let angle = 0.31f64;
    let cos_a = angle.cos();
    let sin_a = angle.sin();
    let mut rng = StdRng::seed_from_u64(12345);

    let mut pts = Vec::with_capacity(n);
    for i in 0..n {
        let t = 2.0 * PI_F64 * (i as f64) / (n as f64);
        let ex = a * t.cos();
        let ey = b * t.sin();
        let x = cx + cos_a * ex - sin_a * ey + rng.gen_range(-2.0f64..2.0f64);
        let y = cy + sin_a * ex + cos_a * ey + rng.gen_range(-2.0f64..2.0f64);
        pts.push([x, y]);
    }
    pts
}

fn bench_conic_fit(c: &mut Criterion) {
    let points = make_ellipse_points(500);
    let cfg = FitConfig::default();
    c.bench_function("conic_fit_500pts", |b| {
        b.iter(|| {
            let fit = fit_conic(black_box(&points), black_box(&cfg))
                .expect("deterministic fixture should always fit");
            black_box(fit)
        })
    });
}

fn bench_calibrate(c: &mut Criterion) {
    let points = PointSet::new(make_ellipse_points(2000)).expect("finite fixture");
    let cfg = FitConfig::default();
    c.bench_function("calibrate_2000pts", |b| {
        b.iter(|| {
            let cal = calibrate(black_box(&points), black_box(&cfg))
                .expect("deterministic fixture should always calibrate");
            black_box(cal.transform)
        })
    });
}

criterion_group!(hotpaths, bench_conic_fit, bench_calibrate);
criterion_main!(hotpaths);
