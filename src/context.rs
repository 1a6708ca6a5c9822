use std::{cell::Cell, cmp::Ordering};

use geo::{
    kernels::{Kernel, Orientation},
    GeoFloat,
};
use slab::Slab;

use crate::{events::SweepPoint, segments::Segment};

/// What an entry of the sweep status refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SweepKey {
    /// A stored segment.
    Segment(usize),
    /// A synthetic entry at the cursor. It sorts right below every
    /// segment passing through the cursor point, so it is the lower bound
    /// of the segments through an event.
    Probe,
}

/// State shared by the event queue, the status structure and the event
/// handler for the duration of one sweep.
///
/// Holds the segments, the comparison policy and the single current-event
/// cursor. Status entries borrow the context; only comparisons against
/// the probe read the cursor.
pub(crate) struct SweepContext<T: GeoFloat, P> {
    segments: Slab<Segment<T>>,
    policy: P,
    cursor: Cell<SweepPoint<T>>,
}

impl<T: GeoFloat, P> SweepContext<T, P> {
    pub fn new(segments: Slab<Segment<T>>, policy: P) -> Self {
        let origin = SweepPoint::from((T::zero(), T::zero()));
        SweepContext {
            segments,
            policy,
            cursor: Cell::new(origin),
        }
    }

    #[inline]
    pub fn segments(&self) -> &Slab<Segment<T>> {
        &self.segments
    }

    #[inline]
    pub fn segment(&self, key: usize) -> &Segment<T> {
        &self.segments[key]
    }

    #[inline]
    pub fn policy(&self) -> &P {
        &self.policy
    }

    #[inline]
    pub fn cursor(&self) -> SweepPoint<T> {
        self.cursor.get()
    }

    /// Move the cursor to a new event point.
    #[inline]
    pub fn set_cursor(&self, point: SweepPoint<T>) {
        self.cursor.set(point);
    }

    /// Order of two status entries along the sweep line.
    pub fn compare(&self, a: SweepKey, b: SweepKey) -> Ordering {
        use SweepKey::*;
        match (a, b) {
            (Probe, Probe) => Ordering::Equal,
            (Segment(a), Probe) => match self.side(a, self.cursor.get()) {
                Ordering::Equal => Ordering::Greater,
                o => o,
            },
            (Probe, Segment(b)) => match self.side(b, self.cursor.get()) {
                Ordering::Equal => Ordering::Less,
                o => o.reverse(),
            },
            (Segment(a), Segment(b)) => self.compare_segments(a, b),
        }
    }

    /// Position of the piece of segment `key` relative to `point`:
    /// `Less` if it passes below the point, `Greater` if above, and
    /// `Equal` if the point lies on its supporting line.
    #[inline]
    pub fn side(&self, key: usize, point: SweepPoint<T>) -> Ordering {
        let piece = self.segments[key].piece();
        orientation_as_ordering(T::Ker::orient2d(piece.start, piece.end, point.coord()))
    }

    /// Order of the pieces of two segments.
    ///
    /// Requires both pivots to be strictly smaller than both ends, which
    /// holds for any two segments in the status. The piece with the
    /// smaller pivot is the reference: the other one is below it if its
    /// pivot is, or if its pivot lies on the reference line and its end
    /// is below. Collinear pieces are ordered by key. This does not
    /// depend on the cursor.
    pub fn compare_segments(&self, a: usize, b: usize) -> Ordering {
        if a == b {
            return Ordering::Equal;
        }
        let (pa, pb) = (self.segments[a].pivot(), self.segments[b].pivot());
        if pa > pb {
            return self.compare_segments(b, a).reverse();
        }

        let reference = self.segments[a].piece();
        let other = self.segments[b].piece();
        orientation_as_ordering(T::Ker::orient2d(reference.start, reference.end, other.start))
            .then_with(|| {
                orientation_as_ordering(T::Ker::orient2d(
                    reference.start,
                    reference.end,
                    other.end,
                ))
            })
            .then_with(|| a.cmp(&b))
    }
}

/// Helper to convert orientation-2d into an ordering
#[inline]
fn orientation_as_ordering(orientation: Orientation) -> Ordering {
    match orientation {
        Orientation::CounterClockwise => Ordering::Less,
        Orientation::Clockwise => Ordering::Greater,
        Orientation::Collinear => Ordering::Equal,
    }
}
