#![allow(dead_code)]

use std::f64::consts::PI;

use geo::{rotate::RotatePoint, Coordinate, Line, Rect};

use rand::{thread_rng, Rng};
use rand_distr::{Distribution, Normal, Standard};

#[inline]
pub fn uniform_point<R: Rng>(rng: &mut R, bounds: Rect<f64>) -> Coordinate<f64> {
    let coords: [f64; 2] = rng.sample(Standard);
    let dims = bounds.max() - bounds.min();
    Coordinate {
        x: bounds.min().x + dims.x * coords[0],
        y: bounds.min().y + dims.y * coords[1],
    }
}

/// A segment between two uniformly distributed points of `bounds`.
#[inline]
pub fn uniform_line<R: Rng>(rng: &mut R, bounds: Rect<f64>) -> Line<f64> {
    Line::new(uniform_point(rng, bounds), uniform_point(rng, bounds))
}

/// A segment of given `length`, uniform start point and direction.
#[inline]
pub fn uniform_line_with_length<R: Rng>(rng: &mut R, bounds: Rect<f64>, length: f64) -> Line<f64> {
    let start = uniform_point(rng, bounds);
    let line = Line::new(start, start + (length, 0.).into());
    let angle = rng.sample::<f64, _>(Standard) * 360.;
    line.rotate_around_point(angle, start.into())
}

/// Segments with uniform start points in `[0, bbox]`, and lengths
/// normally distributed around `bbox / scale`. Larger `scale` means
/// fewer intersections per segment.
pub fn scaled_generator(bbox: Coordinate<f64>, scale: usize) -> impl Fn() -> Line<f64> {
    let bounds = Rect::new(Coordinate::zero(), bbox);
    let mean = bbox.x.min(bbox.y) / scale as f64;
    let lengths = Normal::new(mean, mean / 4.).expect("length distribution");
    move || {
        let mut rng = thread_rng();
        let length = lengths.sample(&mut rng).abs().max(f64::EPSILON);
        uniform_line_with_length(&mut rng, bounds, length)
    }
}

/// `m` horizontal and `m` vertical segments forming a grid with `m * m`
/// crossings and no other common points.
pub fn grid_lines(m: usize) -> Vec<Line<f64>> {
    let size = (m + 1) as f64;
    (1..=m)
        .flat_map(|i| {
            let at = i as f64;
            [
                Line::from([(0., at), (size, at)]),
                Line::from([(at, 0.), (at, size)]),
            ]
        })
        .collect()
}

/// `n` segments through the center of `bounds`, at evenly spaced angles.
pub fn star_lines(n: usize, bounds: Rect<f64>) -> Vec<Line<f64>> {
    let center = bounds.center();
    let radius = (bounds.width().min(bounds.height())) / 2.;
    (0..n)
        .map(|i| {
            let angle = PI * i as f64 / n as f64;
            let offset = Coordinate {
                x: radius * angle.cos(),
                y: radius * angle.sin(),
            };
            Line::new(center - offset, center + offset)
        })
        .collect()
}
