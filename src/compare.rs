use std::cmp::Ordering;

use approx::RelativeEq;
use geo::{CoordNum, Coordinate, GeoFloat};

/// Numeric comparison policy used by the sweep.
///
/// The policy decides which event points are the same, and which
/// segments pass through an event point. The order of segments along the
/// sweep line uses exact orientation tests instead. Implementors only need [`equals`](Self::equals) and
/// [`less_than`](Self::less_than); `less_than` must be `false` whenever
/// `equals` is `true`.
pub trait NumberComparison<T: CoordNum> {
    fn equals(&self, a: T, b: T) -> bool;
    fn less_than(&self, a: T, b: T) -> bool;

    #[inline]
    fn greater_than(&self, a: T, b: T) -> bool {
        self.less_than(b, a)
    }

    #[inline]
    fn less_than_or_equal(&self, a: T, b: T) -> bool {
        self.less_than(a, b) || self.equals(a, b)
    }

    #[inline]
    fn greater_than_or_equal(&self, a: T, b: T) -> bool {
        self.greater_than(a, b) || self.equals(a, b)
    }

    /// Three-way comparison consistent with the predicates above.
    #[inline]
    fn compare(&self, a: T, b: T) -> Ordering {
        if self.equals(a, b) {
            Ordering::Equal
        } else if self.less_than(a, b) {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }

    /// Lexicographic comparison of two points: by `x` and then by `y`.
    #[inline]
    fn compare_points(&self, a: Coordinate<T>, b: Coordinate<T>) -> Ordering {
        self.compare(a.x, b.x).then_with(|| self.compare(a.y, b.y))
    }

    #[inline]
    fn points_equal(&self, a: Coordinate<T>, b: Coordinate<T>) -> bool {
        self.equals(a.x, b.x) && self.equals(a.y, b.y)
    }
}

impl<T: CoordNum, P: NumberComparison<T>> NumberComparison<T> for &P {
    #[inline]
    fn equals(&self, a: T, b: T) -> bool {
        (*self).equals(a, b)
    }

    #[inline]
    fn less_than(&self, a: T, b: T) -> bool {
        (*self).less_than(a, b)
    }
}

/// Plain floating point comparisons.
///
/// Suitable when every intersection point is exactly representable, for
/// instance axis-aligned input or coordinates on a dyadic grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Exact;

impl<T: GeoFloat> NumberComparison<T> for Exact {
    #[inline]
    fn equals(&self, a: T, b: T) -> bool {
        a == b
    }

    #[inline]
    fn less_than(&self, a: T, b: T) -> bool {
        a < b
    }
}

/// Tolerance based comparisons built on [`approx::relative_eq!`].
///
/// Two numbers are equal if they are within `epsilon` of each other, or
/// within `max_relative` times the larger magnitude. This absorbs the
/// rounding of computed intersection points so that every segment through
/// an event is recognised as such.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance<T> {
    pub epsilon: T,
    pub max_relative: T,
}

impl<T: GeoFloat> Tolerance<T> {
    pub fn new(epsilon: T, max_relative: T) -> Self {
        Tolerance {
            epsilon,
            max_relative,
        }
    }
}

/// Square root of the machine epsilon for both tolerances.
impl<T: GeoFloat> Default for Tolerance<T> {
    fn default() -> Self {
        let tol = T::epsilon().sqrt();
        Tolerance::new(tol, tol)
    }
}

impl<T: GeoFloat + RelativeEq<Epsilon = T>> NumberComparison<T> for Tolerance<T> {
    #[inline]
    fn equals(&self, a: T, b: T) -> bool {
        approx::relative_eq!(
            a,
            b,
            epsilon = self.epsilon,
            max_relative = self.max_relative
        )
    }

    #[inline]
    fn less_than(&self, a: T, b: T) -> bool {
        a < b && !self.equals(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_comparisons() {
        let p = Exact;
        assert!(p.equals(1., 1.));
        assert!(!p.equals(1., 1. + f64::EPSILON));
        assert!(p.less_than(1., 1. + f64::EPSILON));
        assert!(p.greater_than_or_equal(2., 2.));
        assert!(p.less_than_or_equal(1., 2.));
        assert_eq!(p.compare(3., 2.), Ordering::Greater);
    }

    #[test]
    fn tolerance_absorbs_rounding() {
        let p = Tolerance::<f64>::default();
        assert!(p.equals(0.1 + 0.2, 0.3));
        assert!(!p.less_than(0.3, 0.1 + 0.2));
        assert!(!p.greater_than(0.1 + 0.2, 0.3));
        assert_eq!(p.compare(1e6, 1e6 + 1e-4), Ordering::Equal);
        assert_eq!(p.compare(1., 1.001), Ordering::Less);

        let coarse = Tolerance::new(0.5, 0.);
        assert!(coarse.equals(1., 1.4));
        assert!(coarse.less_than_or_equal(1.4, 1.));
        assert!(coarse.greater_than(2., 1.));
    }

    #[test]
    fn points_compare_lexicographically() {
        let p = Exact;
        let a = Coordinate { x: 0., y: 5. };
        let b = Coordinate { x: 1., y: 0. };
        let c = Coordinate { x: 1., y: 1. };
        assert_eq!(p.compare_points(a, b), Ordering::Less);
        assert_eq!(p.compare_points(c, b), Ordering::Greater);
        assert_eq!(p.compare_points(c, c), Ordering::Equal);

        let t = Tolerance::new(1e-3, 0.);
        assert!(t.points_equal(c, Coordinate { x: 1.0005, y: 0.9995 }));
        assert_eq!(
            t.compare_points(Coordinate { x: 1.0005, y: 0. }, Coordinate { x: 1., y: 1. }),
            Ordering::Less
        );
    }
}
