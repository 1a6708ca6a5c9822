//! Reporting of every point where two or more segments meet.

use geo::{Coordinate, GeoFloat};
use itertools::Itertools;
use smallvec::SmallVec;

use crate::{
    context::SweepContext, segments::prepare_segments, Crossable, NumberComparison, SweepConfig,
    SweepError,
};

mod sets;
mod sweep;
use sweep::Sweep;

/// Indices of input segments, in increasing order.
pub type Handles = SmallVec<[usize; 4]>;

/// How the segments meet at an intersection point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntersectionKind {
    /// At least two segments pass through the point in their interior.
    Crossing,
    /// Segments meet at the point, and at most one passes through it;
    /// e.g. shared end points or a T-junction.
    Touch,
    /// At least two segments share more than this point: they are
    /// collinear and overlap, or they are duplicates of each other.
    Overlap,
}

/// An intersection point along with the input segments meeting there.
///
/// Segments are identified by their index in the input. A segment
/// appears in exactly one of `starting`, `ending` and `containing`.
#[derive(Debug, Clone, PartialEq)]
pub struct Intersection<T: GeoFloat> {
    /// The intersection point. When the comparison policy merges nearby
    /// points, this is the first one discovered.
    pub point: Coordinate<T>,
    /// Segments whose lexicographically smaller end point is `point`.
    pub starting: Handles,
    /// Segments whose lexicographically larger end point is `point`.
    pub ending: Handles,
    /// Segments having `point` strictly between their end points.
    pub containing: Handles,
    pub kind: IntersectionKind,
}

impl<T: GeoFloat> Intersection<T> {
    /// All segments meeting at the point, in increasing order.
    pub fn segments(&self) -> Handles {
        [&self.starting, &self.ending, &self.containing]
            .into_iter()
            .map(|h| h.iter().copied())
            .kmerge()
            .collect()
    }

    /// Number of segments meeting at the point. At least 2.
    #[inline]
    pub fn len(&self) -> usize {
        self.starting.len() + self.ending.len() + self.containing.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Whether input segment `index` meets at the point.
    pub fn contains(&self, index: usize) -> bool {
        [&self.starting, &self.ending, &self.containing]
            .iter()
            .any(|h| h.contains(&index))
    }
}

/// Counters collected during a sweep.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepStats {
    /// Event points processed.
    pub events: usize,
    /// Intersections reported.
    pub reports: usize,
    /// Largest size reached by the event queue.
    pub max_queue_len: usize,
    /// Largest number of segments simultaneously crossing the sweep line.
    pub max_active: usize,
}

/// Find all intersections among `segments` with the [Bentley-Ottman]
/// sweep.
///
/// The `visitor` is called once per point where two or more input
/// segments meet, in lexicographic order of the points (by `x`, then by
/// `y`). Event points are told apart with `policy`; see [`Exact`] and
/// [`Tolerance`]. The input is left untouched and may be in any
/// order.
///
/// Runs in O((n + k) log n) time, with n segments and k intersection
/// points. There is no bound on k: n segments may cross in O(n²)
/// points, in which case the sweep takes O(n² log n) time and holds
/// O(n²) pending events.
///
/// # Errors
///
/// Returns [`SweepError::InvalidSegment`] for non-finite coordinates,
/// or for zero-length segments (see [`intersect_with_config`] to skip
/// them instead). Returns [`SweepError::StatusConflict`] if segments
/// handled at an event do not fit back between their neighbours, which
/// only a policy merging far apart points can cause.
///
/// ```rust
/// use geo::Line;
/// use geo_sweep::{intersect, Exact};
///
/// let input = vec![
///     Line::from([(0., 0.), (2., 2.)]),
///     Line::from([(0., 2.), (2., 0.)]),
/// ];
/// let mut points = vec![];
/// let stats = intersect(&input, Exact, |isec| points.push(isec.point.x_y())).unwrap();
/// assert_eq!(points, vec![(1., 1.)]);
/// assert_eq!(stats.reports, 1);
/// ```
///
/// [Bentley-Ottman]: //en.wikipedia.org/wiki/Bentley%E2%80%93Ottmann_algorithm
/// [`Exact`]: crate::Exact
/// [`Tolerance`]: crate::Tolerance
pub fn intersect<C, I, P, F>(segments: I, policy: P, visitor: F) -> Result<SweepStats, SweepError>
where
    C: Crossable,
    I: IntoIterator<Item = C>,
    P: NumberComparison<C::Scalar>,
    F: FnMut(&Intersection<C::Scalar>),
{
    intersect_with_config(segments, policy, SweepConfig::default(), visitor)
}

/// Like [`intersect`], with control over degenerate input.
pub fn intersect_with_config<C, I, P, F>(
    segments: I,
    policy: P,
    config: SweepConfig,
    mut visitor: F,
) -> Result<SweepStats, SweepError>
where
    C: Crossable,
    I: IntoIterator<Item = C>,
    P: NumberComparison<C::Scalar>,
    F: FnMut(&Intersection<C::Scalar>),
{
    let segments = prepare_segments(segments, &policy, &config)?;
    let ctx = SweepContext::new(segments, policy);
    Sweep::new(&ctx).run(&mut visitor)
}

/// Collect all intersections into a `Vec`, in sweep order.
///
/// ```rust
/// use geo::Line;
/// use geo_sweep::{collect_intersections, IntersectionKind, Tolerance};
///
/// let input = vec![
///     Line::from([(0., 0.), (3., 0.)]),
///     Line::from([(4., 0.), (1., 0.)]),
/// ];
/// let found = collect_intersections(&input, Tolerance::default()).unwrap();
/// assert_eq!(found.len(), 2);
/// assert!(found.iter().all(|i| i.kind == IntersectionKind::Overlap));
/// ```
pub fn collect_intersections<C, I, P>(
    segments: I,
    policy: P,
) -> Result<Vec<Intersection<C::Scalar>>, SweepError>
where
    C: Crossable,
    I: IntoIterator<Item = C>,
    P: NumberComparison<C::Scalar>,
{
    let mut found = vec![];
    intersect(segments, policy, |isec| found.push(isec.clone()))?;
    Ok(found)
}
