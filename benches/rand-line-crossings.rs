use criterion::*;
use geo::{Coordinate, Rect};

const BBOX: [f64; 2] = [1024., 1024.];

#[path = "utils/random.rs"]
mod random;
#[path = "utils/crossings.rs"]
mod crossings;

use crossings::*;
use rand::thread_rng;
use random::*;

fn bench_counts(c: &mut Criterion, name: &str, lines: &[geo::Line<f64>]) {
    c.bench_function(&format!("Bentley-Ottman - {}", name), |b| {
        b.iter(|| black_box(count_bo(lines)))
    });
    c.bench_function(&format!("R-Tree - {}", name), |b| {
        b.iter(|| black_box(count_rtree(lines)))
    });
    c.bench_function(&format!("Brute-Force - {}", name), |b| {
        b.iter(|| black_box(count_brute(lines)))
    });
}

fn length_lc(c: &mut Criterion) {
    const NUM_LINES: usize = 1024;

    let bbox: Rect<f64> = Rect::new([0., 0.], BBOX);
    let line_len = BBOX[0] / 5.;

    let lines: Vec<_> = (0..NUM_LINES)
        .map(|_| uniform_line_with_length(&mut thread_rng(), bbox, line_len))
        .collect();
    bench_counts(c, "short random lines", &lines);
}

fn uniform_lc(c: &mut Criterion) {
    const NUM_LINES: usize = 256;
    let bbox: Rect<f64> = Rect::new([0., 0.], BBOX);

    let lines: Vec<_> = (0..NUM_LINES)
        .map(|_| uniform_line(&mut thread_rng(), bbox))
        .collect();
    bench_counts(c, "uniform random lines", &lines);
}

fn scaled_lc(c: &mut Criterion) {
    const NUM_LINES: usize = 2048;
    let line_gen = scaled_generator(Coordinate { x: BBOX[0], y: BBOX[1] }, 32);

    let lines: Vec<_> = (0..NUM_LINES).map(|_| line_gen()).collect();
    bench_counts(c, "sparse random lines", &lines);
}

fn grid_lc(c: &mut Criterion) {
    let lines = grid_lines(32);
    bench_counts(c, "grid", &lines);
}

criterion_group!(random, uniform_lc, length_lc, scaled_lc, grid_lc);
criterion_main!(random);
