use std::{cell::Cell, cmp::Ordering};

use geo::{
    kernels::{Kernel, Orientation},
    Coordinate, GeoFloat, Line,
};
use log::{debug, warn};
use slab::Slab;
use smallvec::SmallVec;

use crate::{
    events::SweepPoint, line_or_point::LineOrPoint, Crossable, Degenerate, Duplicates,
    InvalidReason, NumberComparison, SweepConfig, SweepError,
};

/// Indices of the input segments an internal segment stands for.
pub(crate) type Inputs = SmallVec<[usize; 1]>;

/// A normalized segment stored for the duration of a sweep.
///
/// `start` lexicographically precedes `end`. The end points never change
/// once the sweep begins. The status orders the segment by its current
/// *piece*: the part from its `pivot` (the last event point it took part
/// in) to its end. The pivot only moves forward.
#[derive(Debug, Clone)]
pub(crate) struct Segment<T: GeoFloat> {
    key: usize,
    start: SweepPoint<T>,
    end: SweepPoint<T>,
    pivot: Cell<SweepPoint<T>>,
    active: Cell<bool>,
    inputs: Inputs,
}

impl<T: GeoFloat> Segment<T> {
    /// Create and store a `Segment`.
    pub(crate) fn new<'s, P: NumberComparison<T>>(
        storage: &'s mut Slab<Self>,
        start: SweepPoint<T>,
        end: SweepPoint<T>,
        inputs: Inputs,
        policy: &P,
    ) -> &'s mut Self {
        debug_assert!(policy.compare_points(start.coord(), end.coord()) == Ordering::Less);
        let entry = storage.vacant_entry();
        let segment = Segment {
            key: entry.key(),
            start,
            end,
            pivot: Cell::new(start),
            active: Cell::new(false),
            inputs,
        };
        entry.insert(segment)
    }

    #[inline]
    pub(crate) fn key(&self) -> usize {
        self.key
    }

    #[inline]
    pub(crate) fn start(&self) -> SweepPoint<T> {
        self.start
    }

    #[inline]
    pub(crate) fn end(&self) -> SweepPoint<T> {
        self.end
    }

    /// Input indices represented by this segment.
    #[inline]
    pub(crate) fn inputs(&self) -> &[usize] {
        &self.inputs
    }

    #[inline]
    pub(crate) fn geom(&self) -> LineOrPoint<T> {
        LineOrPoint::Line(self.start, self.end)
    }

    #[inline]
    pub(crate) fn line(&self) -> Line<T> {
        Line::new(self.start.coord(), self.end.coord())
    }

    #[inline]
    pub(crate) fn pivot(&self) -> SweepPoint<T> {
        self.pivot.get()
    }

    /// Move the pivot to the event point being handled. Must not be
    /// called while the segment is in the status.
    #[inline]
    pub(crate) fn set_pivot(&self, point: SweepPoint<T>) {
        debug_assert!(!self.is_active(), "pivot moved while in the status");
        debug_assert!(self.pivot.get() <= point && point < self.end);
        self.pivot.set(point);
    }

    /// The part of the segment still ahead of the sweep.
    #[inline]
    pub(crate) fn piece(&self) -> Line<T> {
        Line::new(self.pivot.get().coord(), self.end.coord())
    }

    /// Whether the piece no longer starts at the segment's own start.
    #[inline]
    pub(crate) fn is_bent(&self) -> bool {
        self.pivot.get() != self.start
    }

    #[inline]
    pub(crate) fn is_active(&self) -> bool {
        self.active.get()
    }

    #[inline]
    pub(crate) fn set_active(&self, active: bool) {
        self.active.set(active);
    }

    /// Height of the segment on the vertical line through `x`.
    ///
    /// Exact at the end points; linear interpolation in between. Must
    /// not be called on vertical segments.
    pub(crate) fn y_at_x<P: NumberComparison<T>>(&self, x: T, policy: &P) -> T {
        let (p, q) = (self.start.coord(), self.end.coord());
        debug_assert!(p.x != q.x, "y_at_x called on a vertical segment");
        if policy.equals(x, p.x) {
            p.y
        } else if policy.equals(x, q.x) {
            q.y
        } else {
            p.y + (x - p.x) * (q.y - p.y) / (q.x - p.x)
        }
    }

    /// Abscissa of the segment on the horizontal line through `y`. Same
    /// contract as [`y_at_x`](Self::y_at_x) with the axes swapped.
    pub(crate) fn x_at_y<P: NumberComparison<T>>(&self, y: T, policy: &P) -> T {
        let (p, q) = (self.start.coord(), self.end.coord());
        debug_assert!(p.y != q.y, "x_at_y called on a horizontal segment");
        if policy.equals(y, p.y) {
            p.x
        } else if policy.equals(y, q.y) {
            q.x
        } else {
            p.x + (y - p.y) * (q.x - p.x) / (q.y - p.y)
        }
    }

    /// Whether the segment, as given in the input, passes through `point`.
    ///
    /// True if `point` lies exactly on it, or if the policy cannot tell
    /// `point` apart from the segment along its steeper axis.
    pub(crate) fn passes_through<P: NumberComparison<T>>(
        &self,
        point: SweepPoint<T>,
        policy: &P,
    ) -> bool {
        let (p, q, r) = (self.start.coord(), self.end.coord(), point.coord());
        if self.start <= point
            && point <= self.end
            && T::Ker::orient2d(p, q, r) == Orientation::Collinear
        {
            return true;
        }

        let within = |a: T, lo: T, hi: T| {
            let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
            policy.less_than_or_equal(lo, a) && policy.less_than_or_equal(a, hi)
        };
        if !within(r.x, p.x, q.x) || !within(r.y, p.y, q.y) {
            return false;
        }
        if (q.x - p.x).abs() >= (q.y - p.y).abs() {
            policy.equals(self.y_at_x(r.x, policy), r.y)
        } else {
            policy.equals(self.x_at_y(r.y, policy), r.x)
        }
    }

    /// Whether the segment ends at `point`, or has already been passed
    /// by it.
    #[inline]
    pub(crate) fn ends_at<P: NumberComparison<T>>(&self, point: SweepPoint<T>, policy: &P) -> bool {
        self.end <= point || policy.points_equal(self.end.coord(), point.coord())
    }

    /// Whether both segments lie on a common line.
    pub(crate) fn is_collinear(&self, other: &Self) -> bool {
        let (p, q) = (self.start.coord(), self.end.coord());
        T::Ker::orient2d(p, q, other.start.coord()) == Orientation::Collinear
            && T::Ker::orient2d(p, q, other.end.coord()) == Orientation::Collinear
    }
}

#[inline]
fn is_finite<T: GeoFloat>(c: Coordinate<T>) -> bool {
    c.x.is_finite() && c.y.is_finite()
}

/// Validate, normalize and store the input segments.
///
/// End points are swapped where needed so that each segment starts at its
/// lexicographically smaller point. Zero-length and duplicate segments are
/// resolved according to `config`. The returned slab is keyed in sweep
/// order (by start point, then end point, then input index).
pub(crate) fn prepare_segments<C, I, P>(
    input: I,
    policy: &P,
    config: &SweepConfig,
) -> Result<Slab<Segment<C::Scalar>>, SweepError>
where
    C: Crossable,
    I: IntoIterator<Item = C>,
    P: NumberComparison<C::Scalar>,
{
    let input = input.into_iter();
    let mut normalized = Vec::with_capacity(input.size_hint().0);

    for (index, crossable) in input.enumerate() {
        let line = crossable.line();
        if !is_finite(line.start) || !is_finite(line.end) {
            return Err(SweepError::InvalidSegment {
                index,
                reason: InvalidReason::NonFinite,
            });
        }

        let (start, end) = match policy.compare_points(line.start, line.end) {
            Ordering::Less => (line.start, line.end),
            Ordering::Greater => (line.end, line.start),
            Ordering::Equal => match config.zero_length {
                Degenerate::Reject => {
                    return Err(SweepError::InvalidSegment {
                        index,
                        reason: InvalidReason::ZeroLength,
                    })
                }
                Degenerate::Skip => {
                    warn!("skipping zero-length segment {}: {:?}", index, line);
                    continue;
                }
            },
        };
        normalized.push((SweepPoint::from(start), SweepPoint::from(end), index));
    }
    normalized.sort_unstable();

    let mut storage = Slab::with_capacity(normalized.len());
    let mut last: Option<usize> = None;
    for (start, end, index) in normalized {
        if let Some(key) = last {
            let prev: &mut Segment<_> = &mut storage[key];
            if policy.points_equal(prev.start.coord(), start.coord())
                && policy.points_equal(prev.end.coord(), end.coord())
            {
                match config.duplicates {
                    Duplicates::Reject => {
                        return Err(SweepError::InvalidSegment {
                            index,
                            reason: InvalidReason::Duplicate { of: prev.inputs[0] },
                        })
                    }
                    Duplicates::Merge => {
                        debug!("merging segment {} into {:?}", index, prev.inputs);
                        prev.inputs.push(index);
                        continue;
                    }
                }
            }
        }
        let mut inputs = Inputs::new();
        inputs.push(index);
        last = Some(Segment::new(&mut storage, start, end, inputs, policy).key());
    }

    Ok(storage)
}
