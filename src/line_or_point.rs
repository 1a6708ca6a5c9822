use geo::{
    algorithm::line_intersection::{line_intersection, LineIntersection},
    Coordinate, GeoFloat, Line,
};

use crate::events::SweepPoint;

/// Either a line segment or a point.
///
/// The coordinates are ordered (see [`SweepPoint`]) and a line
/// segment must have distinct points (use the `Point` variant if the
/// coordinates are the equal). This is also the result type of the
/// segment intersection primitive: a single point, or the overlapping
/// part of two collinear segments.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LineOrPoint<T: GeoFloat> {
    Point(SweepPoint<T>),
    Line(SweepPoint<T>, SweepPoint<T>),
}

/// Convert from a [`Line`] ensuring end point ordering.
impl<T: GeoFloat> From<Line<T>> for LineOrPoint<T> {
    fn from(l: Line<T>) -> Self {
        let start = l.start.into();
        let end = l.end.into();
        if start < end {
            LineOrPoint::Line(start, end)
        } else if start > end {
            LineOrPoint::Line(end, start)
        } else {
            LineOrPoint::Point(start)
        }
    }
}

/// Convert from a [`Coordinate`]
impl<T: GeoFloat> From<Coordinate<T>> for LineOrPoint<T> {
    fn from(c: Coordinate<T>) -> Self {
        LineOrPoint::Point(c.into())
    }
}

impl<T: GeoFloat> LineOrPoint<T> {
    /// Checks if the variant is a line.
    #[inline]
    pub fn is_line(&self) -> bool {
        matches!(self, LineOrPoint::Line(_, _))
    }

    /// Return the geometry as a [`Line`]; a point becomes a zero-length
    /// line.
    #[inline]
    pub fn line(&self) -> Line<T> {
        match self {
            LineOrPoint::Line(p, q) => Line::new(p.coord(), q.coord()),
            LineOrPoint::Point(p) => Line::new(p.coord(), p.coord()),
        }
    }

    /// Intersect two geometries and return a point, an overlapping segment
    /// or `None`.
    pub fn intersect_line(&self, other: &Self) -> Option<Self> {
        line_intersection(self.line(), other.line()).map(|l| match l {
            LineIntersection::SinglePoint { intersection, .. } => intersection.into(),
            LineIntersection::Collinear { intersection } => intersection.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_from_line() {
        let l = LineOrPoint::from(Line::from([(2., 2.), (0., 0.)]));
        assert_eq!(l, LineOrPoint::Line((0., 0.).into(), (2., 2.).into()));
        assert!(l.is_line());
        assert_eq!(l.line(), Line::from([(0., 0.), (2., 2.)]));

        let p = LineOrPoint::from(Line::from([(1., 1.), (1., 1.)]));
        assert_eq!(p, LineOrPoint::Point((1., 1.).into()));
        assert!(!p.is_line());
        assert_eq!(p.line(), Line::from([(1., 1.), (1., 1.)]));
    }

    #[test]
    fn test_intersections() {
        struct TestCase {
            a: Line<f64>,
            b: Line<f64>,
            isec: Option<LineOrPoint<f64>>,
        }

        let test_cases = vec![
            // Proper crossing.
            TestCase {
                a: [(0., 0.), (2., 2.)].into(),
                b: [(0., 2.), (2., 0.)].into(),
                isec: Some(LineOrPoint::Point((1., 1.).into())),
            },
            // Shared end point.
            TestCase {
                a: [(0., 0.), (1., 1.)].into(),
                b: [(1., 1.), (2., 0.)].into(),
                isec: Some(LineOrPoint::Point((1., 1.).into())),
            },
            // Vertical against horizontal.
            TestCase {
                a: [(1., 0.), (1., 3.)].into(),
                b: [(0., 1.), (2., 1.)].into(),
                isec: Some(LineOrPoint::Point((1., 1.).into())),
            },
            // Collinear overlap.
            TestCase {
                a: [(0., 0.), (3., 0.)].into(),
                b: [(4., 0.), (1., 0.)].into(),
                isec: Some(LineOrPoint::Line((1., 0.).into(), (3., 0.).into())),
            },
            // Parallel.
            TestCase {
                a: [(0., 0.), (3., 0.)].into(),
                b: [(0., 1.), (3., 1.)].into(),
                isec: None,
            },
            // Disjoint, lines would cross outside the segments.
            TestCase {
                a: [(0., 0.), (1., 1.)].into(),
                b: [(3., 0.), (2., 1.)].into(),
                isec: None,
            },
        ];

        for case in test_cases {
            let a = LineOrPoint::from(case.a);
            let b = LineOrPoint::from(case.b);
            assert_eq!(a.intersect_line(&b), case.isec, "{:?} x {:?}", case.a, case.b);
            assert_eq!(b.intersect_line(&a), case.isec, "{:?} x {:?}", case.b, case.a);
        }
    }

    #[test]
    fn point_on_line() {
        let line = LineOrPoint::from(Line::from([(0., 0.), (2., 2.)]));
        let on = LineOrPoint::from(Coordinate { x: 1., y: 1. });
        let off = LineOrPoint::from(Coordinate { x: 1., y: 0. });
        let beyond = LineOrPoint::from(Coordinate { x: 3., y: 3. });
        assert_eq!(on.intersect_line(&line), Some(on));
        assert_eq!(off.intersect_line(&line), None);
        assert_eq!(beyond.intersect_line(&line), None);
    }
}
