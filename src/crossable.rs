use geo::{Coordinate, GeoFloat, Line};

use crate::LineOrPoint;

/// Interface for types that can be processed to detect crossings.
///
/// The sweep only reads the two end points of each input, in any order;
/// it normalizes its own copy and never mutates the input. Implement
/// this for custom segment types to sweep them directly.
///
/// ```rust
/// use geo::{Coordinate, Line};
/// use geo_sweep::Crossable;
///
/// struct Wall {
///     from: (f64, f64),
///     to: (f64, f64),
/// }
///
/// impl Crossable for Wall {
///     type Scalar = f64;
///     fn line(&self) -> Line<f64> {
///         Line::new(Coordinate::from(self.from), Coordinate::from(self.to))
///     }
/// }
/// ```
pub trait Crossable {
    type Scalar: GeoFloat;

    /// The segment, from its start to its end point.
    fn line(&self) -> Line<Self::Scalar>;
}

impl<T: GeoFloat> Crossable for Line<T> {
    type Scalar = T;

    #[inline]
    fn line(&self) -> Line<T> {
        *self
    }
}

impl<T: GeoFloat> Crossable for (Coordinate<T>, Coordinate<T>) {
    type Scalar = T;

    #[inline]
    fn line(&self) -> Line<T> {
        Line::new(self.0, self.1)
    }
}

impl<T: GeoFloat> Crossable for LineOrPoint<T> {
    type Scalar = T;

    #[inline]
    fn line(&self) -> Line<T> {
        LineOrPoint::line(self)
    }
}

impl<C: Crossable> Crossable for &C {
    type Scalar = C::Scalar;

    #[inline]
    fn line(&self) -> Line<Self::Scalar> {
        C::line(*self)
    }
}
