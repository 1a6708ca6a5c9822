use std::{
    cmp::Ordering,
    collections::BTreeMap,
    ops::Bound::{Excluded, Unbounded},
};

use geo::{Coordinate, GeoFloat};
use smallvec::SmallVec;

use crate::NumberComparison;

/// Keys of the segments starting or ending at an event.
pub(crate) type Starts = SmallVec<[usize; 2]>;

/// Two status neighbours whose pieces are expected to meet at an event.
///
/// The pivots are those of the two segments when the meeting was
/// scheduled. A meeting is stale once either pivot has moved: the pair
/// then already took part in an event since.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Meeting<T: GeoFloat> {
    pub keys: [usize; 2],
    pub pivots: [SweepPoint<T>; 2],
}

/// Everything scheduled at one event point.
#[derive(Debug, Clone)]
pub(crate) struct Pending<T: GeoFloat> {
    pub starts: Starts,
    pub ends: Starts,
    pub meetings: SmallVec<[Meeting<T>; 1]>,
}

impl<T: GeoFloat> Default for Pending<T> {
    fn default() -> Self {
        Pending {
            starts: Starts::new(),
            ends: Starts::new(),
            meetings: SmallVec::new(),
        }
    }
}

/// A sweep event: a point, the segments that start and end there, and
/// the neighbours expected to meet there.
///
/// All sets are empty for points that were only discovered as
/// intersections of segments that have since met elsewhere.
#[derive(Debug, Clone)]
pub(crate) struct Event<T: GeoFloat> {
    pub point: SweepPoint<T>,
    pub starts: Starts,
    pub ends: Starts,
    pub meetings: SmallVec<[Meeting<T>; 1]>,
}

/// Event queue of the sweep.
///
/// Maps event points to what is scheduled there, and yields events in
/// increasing lexicographic order. A point the policy considers equal to
/// a queued one joins that entry instead of creating its own; the first
/// point inserted represents the entry. Points may be added while the
/// queue is drained; the sweep only ever adds points strictly ahead of
/// the last popped one.
pub(crate) struct EventQueue<'a, T: GeoFloat, P> {
    policy: &'a P,
    by_point: BTreeMap<SweepPoint<T>, Pending<T>>,
}

impl<'a, T: GeoFloat, P: NumberComparison<T>> EventQueue<'a, T, P> {
    pub fn new(policy: &'a P) -> Self {
        EventQueue {
            policy,
            by_point: BTreeMap::new(),
        }
    }

    /// The queued point `point` merges into, if any.
    ///
    /// Candidates share the `x` coordinate under the policy, so they are
    /// adjacent to `point` in the lexicographic order.
    fn merge_target(&self, point: SweepPoint<T>) -> Option<SweepPoint<T>> {
        if self.by_point.contains_key(&point) {
            return Some(point);
        }
        let policy = self.policy;
        let same_x = |k: &SweepPoint<T>| policy.equals(k.x(), point.x());
        let before = self
            .by_point
            .range((Unbounded, Excluded(point)))
            .rev()
            .map(|(k, _)| *k)
            .take_while(same_x);
        let after = self
            .by_point
            .range((Excluded(point), Unbounded))
            .map(|(k, _)| *k)
            .take_while(same_x);
        before
            .chain(after)
            .find(|k| policy.points_equal(k.coord(), point.coord()))
    }

    /// Ensure `point` is in the queue. Idempotent.
    pub fn ensure(&mut self, point: SweepPoint<T>) -> &mut Pending<T> {
        let key = self.merge_target(point).unwrap_or(point);
        self.by_point.entry(key).or_default()
    }

    /// Ensure `point` is in the queue, and record that `segment` starts
    /// there.
    pub fn insert_start(&mut self, point: SweepPoint<T>, segment: usize) {
        let starts = &mut self.ensure(point).starts;
        if !starts.contains(&segment) {
            starts.push(segment);
        }
    }

    /// Ensure `point` is in the queue, and record that `segment` ends
    /// there.
    pub fn insert_end(&mut self, point: SweepPoint<T>, segment: usize) {
        let ends = &mut self.ensure(point).ends;
        if !ends.contains(&segment) {
            ends.push(segment);
        }
    }

    /// Ensure `point` is in the queue, and record a meeting there.
    pub fn insert_meeting(&mut self, point: SweepPoint<T>, meeting: Meeting<T>) {
        let meetings = &mut self.ensure(point).meetings;
        if !meetings.contains(&meeting) {
            meetings.push(meeting);
        }
    }

    /// Remove and return the lexicographically smallest event.
    pub fn pop_min(&mut self) -> Option<Event<T>> {
        self.by_point.pop_first().map(|(point, pending)| Event {
            point,
            starts: pending.starts,
            ends: pending.ends,
            meetings: pending.meetings,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.by_point.len()
    }

    /// The point of the next event, if any.
    #[cfg(test)]
    pub fn peek_point(&self) -> Option<SweepPoint<T>> {
        self.by_point.keys().next().copied()
    }

    #[cfg(test)]
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.by_point.is_empty()
    }
}

/// Wraps a [`Coordinate`] to support lexicographic ordering.
///
/// The ordering is by `x` and then by `y`. Implements `PartialOrd`,
/// `Ord` and `Eq` even though `Coordinate` doesn't implement these.
/// This is exact ordering: the event queue is keyed by it, and only
/// merges points through the comparison policy.
///
/// Note that the trait impls exist even when `T` is not `Eq` or
/// `Ord`. We must ensure that any sweep point only contains values
/// that can be consistently ordered.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct SweepPoint<T: GeoFloat>(Coordinate<T>);

impl<T: GeoFloat> SweepPoint<T> {
    /// The wrapped coordinate.
    #[inline]
    pub fn coord(&self) -> Coordinate<T> {
        self.0
    }

    #[inline]
    pub fn x(&self) -> T {
        self.0.x
    }

    #[inline]
    pub fn y(&self) -> T {
        self.0.y
    }
}

/// Implement lexicographic ordering by `x` and then by `y`
/// coordinate.
impl<T: GeoFloat> PartialOrd for SweepPoint<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match self.0.x.partial_cmp(&other.0.x) {
            Some(Ordering::Equal) => self.0.y.partial_cmp(&other.0.y),
            o => o,
        }
    }
}

/// Derive `Ord` from `PartialOrd`. Components are finite by
/// construction, so the partial order is total.
impl<T: GeoFloat> Ord for SweepPoint<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.partial_cmp(other).unwrap_or(Ordering::Equal)
    }
}

/// We derive `Eq` manually to not require `T: Eq`.
impl<T: GeoFloat> Eq for SweepPoint<T> {}

/// Create from `Coordinate`. Callers must have checked the components
/// are finite.
impl<T: GeoFloat> From<Coordinate<T>> for SweepPoint<T> {
    fn from(pt: Coordinate<T>) -> Self {
        debug_assert!(
            pt.x.is_finite(),
            "sweep point requires a finite x-coordinate"
        );
        debug_assert!(
            pt.y.is_finite(),
            "sweep point requires a finite y-coordinate"
        );
        SweepPoint(pt)
    }
}

impl<T: GeoFloat> From<(T, T)> for SweepPoint<T> {
    fn from(pt: (T, T)) -> Self {
        Coordinate::from(pt).into()
    }
}

#[cfg(test)]
mod tests {
    use std::iter::from_fn;

    use super::*;
    use crate::{Exact, Tolerance};

    #[test]
    fn test_sweep_point_ordering() {
        let p1 = SweepPoint::from(Coordinate { x: 0., y: 0. });
        let p2 = SweepPoint::from(Coordinate { x: 1., y: 0. });
        let p3 = SweepPoint::from(Coordinate { x: 1., y: 1. });
        let p4 = SweepPoint::from(Coordinate { x: 1., y: 1. });

        assert!(p1 < p2);
        assert!(p1 < p3);
        assert!(p2 < p3);
        assert!(p3 <= p4);
    }

    #[test]
    fn pops_in_lexicographic_order() {
        let policy = Exact;
        let mut queue = EventQueue::new(&policy);
        queue.insert_start((1., 1.).into(), 3);
        queue.insert_start((0., 5.).into(), 0);
        queue.insert_end((1., 0.).into(), 0);
        queue.insert_start((1., 0.).into(), 2);
        assert_eq!(queue.len(), 3);
        assert_eq!(queue.peek_point(), Some((0., 5.).into()));

        let order: Vec<_> = from_fn(|| queue.pop_min())
            .map(|e| (e.point.coord().x_y(), e.starts.to_vec(), e.ends.to_vec()))
            .collect();
        assert_eq!(
            order,
            vec![
                ((0., 5.), vec![0], vec![]),
                ((1., 0.), vec![2], vec![0]),
                ((1., 1.), vec![3], vec![]),
            ]
        );
        assert!(queue.is_empty());
        assert!(queue.pop_min().is_none());
    }

    #[test]
    fn merges_equal_points() {
        let policy = Exact;
        let mut queue = EventQueue::new(&policy);
        queue.insert_start((2., 2.).into(), 1);
        queue.ensure((2., 2.).into());
        queue.insert_start((2., 2.).into(), 4);
        queue.insert_start((2., 2.).into(), 1);
        queue.insert_end((2., 2.).into(), 0);
        queue.insert_end((2., 2.).into(), 0);
        assert_eq!(queue.len(), 1);

        let event = queue.pop_min().unwrap();
        assert_eq!(event.starts.to_vec(), vec![1, 4]);
        assert_eq!(event.ends.to_vec(), vec![0]);
    }

    #[test]
    fn ensure_keeps_an_empty_set() {
        let policy = Exact;
        let mut queue = EventQueue::new(&policy);
        queue.ensure((0.5, 0.5).into());
        queue.ensure((0.5, 0.5).into());
        let event = queue.pop_min().unwrap();
        assert!(event.starts.is_empty() && event.ends.is_empty());
        assert!(event.meetings.is_empty());
        assert!(queue.is_empty());
    }

    #[test]
    fn records_meetings_once() {
        let policy = Exact;
        let mut queue = EventQueue::new(&policy);
        let meeting = Meeting {
            keys: [0, 1],
            pivots: [(0., 0.).into(), (0., 2.).into()],
        };
        queue.insert_meeting((1., 1.).into(), meeting);
        queue.insert_meeting((1., 1.).into(), meeting);
        let event = queue.pop_min().unwrap();
        assert_eq!(event.meetings.to_vec(), vec![meeting]);
    }

    #[test]
    fn merges_points_within_tolerance() {
        let policy = Tolerance::new(1e-6, 0.);
        let mut queue = EventQueue::new(&policy);
        queue.insert_start((1., 1.).into(), 0);
        queue.ensure((1. + 1e-9, 1. - 1e-9).into());
        queue.insert_end((1. - 1e-9, 1. + 1e-9).into(), 3);
        queue.ensure((1., 2.).into());
        assert_eq!(queue.len(), 2);

        // The first inserted point represents the merged entry.
        let event = queue.pop_min().unwrap();
        assert_eq!(event.point, (1., 1.).into());
        assert_eq!(event.starts.to_vec(), vec![0]);
        assert_eq!(event.ends.to_vec(), vec![3]);
    }

    #[test]
    fn merges_across_interleaved_keys() {
        let policy = Tolerance::new(1e-6, 0.);
        let mut queue = EventQueue::new(&policy);
        queue.ensure((1., 5.).into());
        queue.ensure((1. + 1e-9, 0.).into());
        // Lexicographically between the two, but only equal to the first.
        queue.insert_start((1. + 2e-9, 5.).into(), 7);
        assert_eq!(queue.len(), 2);

        let first = queue.pop_min().unwrap();
        assert_eq!(first.point, (1., 5.).into());
        assert_eq!(first.starts.to_vec(), vec![7]);
    }
}
