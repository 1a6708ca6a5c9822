use std::cmp::Ordering;

use geo::{
    kernels::{Kernel, Orientation},
    line_intersection::{line_intersection, LineIntersection},
    Coordinate, GeoFloat,
};
use itertools::Itertools;
use log::{debug, trace, warn};

use super::{
    sets::{EventSets, Keys},
    Handles, Intersection, IntersectionKind, SweepStats,
};
use crate::{
    active::ActiveSet,
    context::SweepContext,
    events::{Event, EventQueue, Meeting, SweepPoint},
    NumberComparison, SweepError,
};

/// Status entries taking part in an event, with their neighbours.
struct Span {
    keys: Keys,
    below: Option<usize>,
    above: Option<usize>,
}

/// Sweep algorithm for detecting all intersection points.
///
/// This is an internal data-structure that implements the
/// [Bentley-Ottman] sweep. Maintains a queue of event points, and the
/// currently active segments ordered along the sweep line. End-users
/// should use [`intersect`](crate::intersect) and friends.
///
/// [Bentley-Ottman]: //en.wikipedia.org/wiki/Bentley%E2%80%93Ottmann_algorithm
pub(crate) struct Sweep<'a, T: GeoFloat, P> {
    ctx: &'a SweepContext<T, P>,
    events: EventQueue<'a, T, P>,
    active: ActiveSet<'a, T, P>,
    stats: SweepStats,
}

impl<'a, T: GeoFloat, P: NumberComparison<T>> Sweep<'a, T, P> {
    /// Seed the event queue with the end points of every segment.
    pub fn new(ctx: &'a SweepContext<T, P>) -> Self {
        let mut events = EventQueue::new(ctx.policy());
        for (key, segment) in ctx.segments() {
            events.insert_start(segment.start(), key);
            events.insert_end(segment.end(), key);
        }
        Sweep {
            ctx,
            events,
            active: ActiveSet::new(ctx),
            stats: SweepStats::default(),
        }
    }

    /// Process events until the queue is drained.
    pub fn run<F: FnMut(&Intersection<T>)>(
        mut self,
        visitor: &mut F,
    ) -> Result<SweepStats, SweepError> {
        while let Some(event) = self.next_event() {
            self.handle_event(event, visitor)?;
        }
        match self.active.first() {
            None => Ok(self.stats),
            Some(key) => {
                warn!("segment {} left active after the sweep", key);
                Err(self.conflict(key))
            }
        }
    }

    #[inline]
    fn next_event(&mut self) -> Option<Event<T>> {
        self.stats.max_queue_len = self.stats.max_queue_len.max(self.events.len());
        self.events.pop_min()
    }

    fn conflict(&self, key: usize) -> SweepError {
        SweepError::StatusConflict {
            segment: self.ctx.segment(key).inputs()[0],
        }
    }

    /// Handle one event.
    fn handle_event<F: FnMut(&Intersection<T>)>(
        &mut self,
        event: Event<T>,
        visitor: &mut F,
    ) -> Result<(), SweepError> {
        let point = event.point;
        self.stats.events += 1;
        self.ctx.set_cursor(point);

        let span = self.span(&event)?;
        let sets = self.classify(event, &span);
        trace!(
            "event at {:?}: {} starting, {} ending, {} containing",
            point,
            sets.upper().len(),
            sets.lower().len(),
            sets.containing().len()
        );

        if sets.input_count(self.ctx) > 1 {
            let intersection = self.report(point.coord(), &sets);
            self.stats.reports += 1;
            visitor(&intersection);
        }

        for &key in &sets.removed() {
            self.active.remove(key)?;
        }
        let reinserted = sets.reinserted();
        for &key in &reinserted {
            // A start merged into an earlier point keeps its own pivot.
            let segment = self.ctx.segment(key);
            if segment.pivot() < point {
                segment.set_pivot(point);
            }
        }
        for &key in &reinserted {
            self.active.insert(key)?;
        }
        self.stats.max_active = self.stats.max_active.max(self.active.len());

        if reinserted.is_empty() {
            self.find_new_event(span.below, span.above);
        } else {
            let (lowest, highest) = self.placed(&reinserted, &span)?;
            self.find_new_event(span.below, Some(lowest));
            self.find_new_event(Some(highest), span.above);
        }
        Ok(())
    }

    /// Whether `key` is to be handled at the cursor point: its piece
    /// passes exactly through it, or the segment does under the policy.
    fn is_near(&self, key: usize) -> bool {
        let point = self.ctx.cursor();
        self.ctx.side(key, point) == Ordering::Equal
            || self.ctx.segment(key).passes_through(point, self.ctx.policy())
    }

    /// Whether `key` already took part in an event at a point the policy
    /// does not tell apart from the cursor. Such segments only join the
    /// event if their piece passes exactly through it.
    fn is_settled(&self, key: usize) -> bool {
        let pivot = self.ctx.segment(key).pivot();
        self.ctx
            .policy()
            .points_equal(pivot.coord(), self.ctx.cursor().coord())
    }

    fn is_pending(&self, meeting: &Meeting<T>) -> bool {
        let [a, b] = meeting.keys;
        let (seg_a, seg_b) = (self.ctx.segment(a), self.ctx.segment(b));
        a != b
            && seg_a.is_active()
            && seg_b.is_active()
            && seg_a.pivot() == meeting.pivots[0]
            && seg_b.pivot() == meeting.pivots[1]
    }

    /// Find the contiguous run of active segments taking part in the
    /// event at the cursor.
    ///
    /// Seeds are the segments ending at the point, pending meetings, and
    /// the segments near the point on either side of the probe. The run
    /// spans the seeds and is widened while the next segment does not lie
    /// strictly on its side of the point, so that the pieces re-inserted
    /// from the point fit between the run's neighbours.
    fn span(&self, event: &Event<T>) -> Result<Span, SweepError> {
        let point = event.point;
        let ctx = self.ctx;

        let mut seeds = Keys::new();
        seeds.extend(
            event
                .ends
                .iter()
                .copied()
                .filter(|&k| ctx.segment(k).is_active()),
        );
        for meeting in &event.meetings {
            if self.is_pending(meeting) {
                seeds.extend(meeting.keys);
            }
        }
        let joins = |k: usize| ctx.side(k, point) == Ordering::Equal || !self.is_settled(k);
        seeds.extend(
            self.active
                .from_cursor()
                .take_while(|&k| self.is_near(k))
                .filter(|&k| joins(k)),
        );
        seeds.extend(
            self.active
                .below_cursor()
                .take_while(|&k| self.is_near(k))
                .filter(|&k| joins(k)),
        );

        let by_position = |a: &usize, b: &usize| ctx.compare_segments(*a, *b);
        let (mut lo, mut hi) = match (
            seeds.iter().min_by(|a, b| by_position(a, b)),
            seeds.iter().max_by(|a, b| by_position(a, b)),
        ) {
            (Some(&lo), Some(&hi)) => (lo, hi),
            _ => {
                return Ok(Span {
                    keys: Keys::new(),
                    below: self.active.below_cursor().next(),
                    above: self.active.from_cursor().next(),
                })
            }
        };

        let mut below = None;
        for key in self.active.below(lo) {
            if ctx.side(key, point) == Ordering::Less && !self.is_near(key) {
                below = Some(key);
                break;
            }
            lo = key;
        }
        let mut above = None;
        for key in self.active.above(hi) {
            if ctx.side(key, point) == Ordering::Greater && !self.is_near(key) {
                above = Some(key);
                break;
            }
            hi = key;
        }

        match self.active.span(lo, hi) {
            Some(keys) => Ok(Span {
                keys: keys.into_iter().collect(),
                below,
                above,
            }),
            None => {
                warn!("segments {} and {} out of order at {:?}", lo, hi, point);
                Err(self.conflict(lo))
            }
        }
    }

    /// Split the run into segments ending at the point and those passing
    /// through it.
    fn classify(&self, event: Event<T>, span: &Span) -> EventSets {
        let point = event.point;
        let policy = self.ctx.policy();
        let ends_here =
            |key: usize| event.ends.contains(&key) || self.ctx.segment(key).ends_at(point, policy);

        let (lower, containing): (Keys, Keys) =
            span.keys.iter().copied().partition(|&key| ends_here(key));
        let collapsed: Keys = event
            .starts
            .iter()
            .copied()
            .filter(|&key| self.ctx.segment(key).ends_at(point, policy))
            .collect();

        EventSets::new(event.starts, lower, containing).with_collapsed(collapsed)
    }

    /// Check that the re-inserted segments landed, in one block, between
    /// the neighbours of the run; return the lowest and highest of them.
    fn placed(&self, reinserted: &[usize], span: &Span) -> Result<(usize, usize), SweepError> {
        let lowest = reinserted
            .iter()
            .copied()
            .min_by(|&a, &b| self.ctx.compare_segments(a, b))
            .unwrap_or(reinserted[0]);
        let block: Keys = std::iter::once(lowest)
            .chain(self.active.above(lowest))
            .take(reinserted.len())
            .collect();
        let highest = block.last().copied().unwrap_or(lowest);

        let contiguous =
            block.len() == reinserted.len() && block.iter().all(|k| reinserted.contains(k));
        if contiguous
            && self.active.prev_key(lowest) == span.below
            && self.active.next_key(highest) == span.above
        {
            Ok((lowest, highest))
        } else {
            warn!(
                "segments re-inserted at {:?} left their neighbours",
                self.ctx.cursor()
            );
            Err(self.conflict(lowest))
        }
    }

    /// Schedule the meeting of two neighbours, `lo` right below `hi`, if
    /// it lies ahead of the sweep.
    ///
    /// Pieces crossing in their interiors must swap before the sweep moves
    /// past them. When their computed crossing is not ahead of the cursor
    /// it is moved just above the cursor on the sweep line. Segments whose
    /// pieces no longer cross are still scheduled if the input segments
    /// cross and have not swapped yet.
    fn find_new_event(&mut self, lo: Option<usize>, hi: Option<usize>) {
        let (lo, hi) = match (lo, hi) {
            (Some(lo), Some(hi)) if lo != hi => (lo, hi),
            _ => return,
        };
        let ctx = self.ctx;
        let (seg_lo, seg_hi) = (ctx.segment(lo), ctx.segment(hi));
        if seg_lo.pivot() == seg_hi.pivot() {
            return;
        }
        let meeting = Meeting {
            keys: [lo, hi],
            pivots: [seg_lo.pivot(), seg_hi.pivot()],
        };
        let limit = seg_lo.end().min(seg_hi.end());

        match line_intersection(seg_lo.piece(), seg_hi.piece()) {
            Some(LineIntersection::SinglePoint {
                intersection,
                is_proper,
            }) => {
                let point = SweepPoint::from(intersection);
                if is_proper || point > ctx.cursor() {
                    self.schedule(point, limit, meeting);
                    return;
                }
            }
            Some(LineIntersection::Collinear { intersection }) => {
                self.ensure_ahead(intersection.start.into());
                self.ensure_ahead(intersection.end.into());
                return;
            }
            None => {}
        }

        if !seg_lo.is_bent() && !seg_hi.is_bent() {
            return;
        }
        let (start, end) = (seg_lo.start().coord(), seg_lo.end().coord());
        let unswapped = T::Ker::orient2d(start, end, seg_hi.end().coord()) == Orientation::Clockwise;
        if let Some(LineIntersection::SinglePoint {
            intersection,
            is_proper: true,
        }) = line_intersection(seg_lo.line(), seg_hi.line())
        {
            if unswapped {
                self.schedule(intersection.into(), limit, meeting);
            }
        }
    }

    /// Record `meeting` at `point`, clamped to `limit`, or right above the
    /// cursor if that is not ahead.
    fn schedule(&mut self, point: SweepPoint<T>, limit: SweepPoint<T>, meeting: Meeting<T>) {
        let cursor = self.ctx.cursor();
        let mut point = point.min(limit);
        if point <= cursor {
            point = nudge(cursor).min(limit);
        }
        if point <= cursor {
            debug!("segments {:?} cannot meet ahead of {:?}", meeting.keys, cursor);
            return;
        }
        debug!("segments {:?} meet ahead at {:?}", meeting.keys, point);
        self.events.insert_meeting(point, meeting);
    }

    fn ensure_ahead(&mut self, point: SweepPoint<T>) {
        if point > self.ctx.cursor() {
            debug!("overlap boundary ahead at {:?}", point);
            self.events.ensure(point);
        }
    }

    /// Build the report for an event.
    fn report(&self, point: Coordinate<T>, sets: &EventSets) -> Intersection<T> {
        let inputs = |keys: &[usize]| -> Handles {
            let mut handles: Handles = keys
                .iter()
                .flat_map(|&key| self.ctx.segment(key).inputs().iter().copied())
                .collect();
            handles.sort_unstable();
            handles
        };

        Intersection {
            point,
            starting: inputs(sets.upper()),
            ending: inputs(sets.lower()),
            containing: inputs(sets.containing()),
            kind: self.classify_kind(sets),
        }
    }

    /// Overlap if any two participants share more than a point; crossing
    /// if at least two inputs pass through the point; touch otherwise.
    fn classify_kind(&self, sets: &EventSets) -> IntersectionKind {
        let participants = sets.participants();
        let merged = participants
            .iter()
            .any(|&key| self.ctx.segment(key).inputs().len() > 1);
        let overlap = merged
            || participants.iter().tuple_combinations().any(|(&a, &b)| {
                let (a, b) = (self.ctx.segment(a), self.ctx.segment(b));
                a.is_collinear(b)
                    && a.geom()
                        .intersect_line(&b.geom())
                        .map_or(false, |g| g.is_line())
            });
        if overlap {
            return IntersectionKind::Overlap;
        }

        let through: usize = sets
            .containing()
            .iter()
            .map(|&key| self.ctx.segment(key).inputs().len())
            .sum();
        if through >= 2 {
            IntersectionKind::Crossing
        } else {
            IntersectionKind::Touch
        }
    }
}

/// The point right above `point` on its sweep line.
fn nudge<T: GeoFloat>(point: SweepPoint<T>) -> SweepPoint<T> {
    let y = point.y();
    let step = (y.abs() * T::epsilon()).max(T::min_positive_value());
    SweepPoint::from((point.x(), y + step))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nudge_moves_strictly_up() {
        for y in [0., 1., -1., 0.1, -2.5, 1e300, -1e-300] {
            let point = SweepPoint::from((3., y));
            let moved = nudge(point);
            assert!(moved > point, "{} did not move", y);
            assert_eq!(moved.x(), 3.);
        }
    }
}
