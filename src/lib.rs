//! Finds every intersection point of a set of line segments.
//!
//! This is an implementation of the [Bentley-Ottman] algorithm to
//! efficiently compute all points where two or more segments of a
//! collection meet: proper crossings, shared end points, T-junctions and
//! the end points of collinear overlaps. It is essentially a drop-in
//! replacement to using [`line_intersection`] over all pairs, but is
//! typically more efficient: it runs in O((n + k) log n) time for n
//! segments meeting in k points.
//!
//! ## Usage
//!
//! Call [`intersect`] with an iterator of any type implementing the
//! [`Crossable`] trait, a [`NumberComparison`] policy, and a visitor. The
//! geo-type [`Line`] implements [`Crossable`]. See the trait
//! documentation for more information on usage with custom types.
//!
//! Each point is reported as an [`Intersection`] listing the input
//! segments that start, end and pass through it.
//!
//! ```rust
//! use geo::Line;
//! use geo_sweep::{collect_intersections, Tolerance};
//! let input = vec![
//!     Line::from([(1., 0.), (0., 1.)]),
//!     Line::from([(0., 0.5), (1., 0.5)]),
//!     Line::from([(0., 0.), (1., 1.)]),
//! ];
//! let found = collect_intersections(&input, Tolerance::default()).unwrap();
//! // All three lines meet at a single point.
//! assert_eq!(found.len(), 1);
//! assert_eq!(found[0].len(), 3);
//! assert_eq!(found[0].point.x_y(), (0.5, 0.5));
//! ```
//!
//! ## Numeric comparisons
//!
//! Segments are ordered along the sweep line with exact orientation
//! tests, so the order stays consistent whatever the input. The supplied
//! policy decides when two event points are the same, and whether a
//! segment passes through an event point. [`Exact`] uses plain float
//! comparisons. [`Tolerance`] treats numbers that are close as equal,
//! which absorbs the rounding of computed intersection points.
//!
//! Under either policy, every pair of meeting segments is reported. Where
//! a crossing point is not representable, segments meeting there may be
//! reported at a few points that are apart by rounding only. Degenerate
//! input (zero length or repeated segments) is handled as set in
//! [`SweepConfig`].
//!
//! [Bentley-Ottman]: //en.wikipedia.org/wiki/Bentley%E2%80%93Ottmann_algorithm
//! [`Line`]: geo::Line
//! [`line_intersection`]: geo::algorithm::line_intersection::line_intersection
mod events;
pub use events::SweepPoint;

mod line_or_point;
pub use line_or_point::LineOrPoint;

mod crossable;
pub use crossable::Crossable;

mod compare;
pub use compare::{Exact, NumberComparison, Tolerance};

mod config;
pub use config::{Degenerate, Duplicates, SweepConfig};

mod error;
pub use error::{InvalidReason, SweepError};

mod segments;

mod context;

mod active;

pub mod crossings;
pub use crossings::{
    collect_intersections, intersect, intersect_with_config, Handles, Intersection,
    IntersectionKind, SweepStats,
};

#[cfg(test)]
#[path = "../benches/utils/random.rs"]
pub mod random;
