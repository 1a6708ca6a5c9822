use geo::GeoFloat;
use itertools::Itertools;
use smallvec::SmallVec;

use crate::{context::SweepContext, events::Starts, NumberComparison};

/// Segment keys, kept sorted.
pub(super) type Keys = SmallVec<[usize; 4]>;

/// Partition of the segments at an event point.
///
/// - `upper`: segments starting at the point (`U`),
/// - `lower`: active segments ending at the point (`L`),
/// - `containing`: active segments passing through the point (`C`).
///
/// The three sets are disjoint. Starting segments that already end at the
/// point are `collapsed`: they are reported but never enter the status.
#[derive(Debug, Default)]
pub(super) struct EventSets {
    upper: Keys,
    lower: Keys,
    containing: Keys,
    collapsed: Keys,
}

fn sorted<I: IntoIterator<Item = usize>>(keys: I) -> Keys {
    let mut keys: Keys = keys.into_iter().collect();
    keys.sort_unstable();
    keys.dedup();
    keys
}

fn union<'k>(sets: impl IntoIterator<Item = &'k Keys>) -> Keys {
    sets.into_iter()
        .map(|s| s.iter().copied())
        .kmerge()
        .dedup()
        .collect()
}

impl EventSets {
    pub fn new(
        upper: Starts,
        lower: impl IntoIterator<Item = usize>,
        containing: impl IntoIterator<Item = usize>,
    ) -> Self {
        let sets = EventSets {
            upper: sorted(upper),
            lower: sorted(lower),
            containing: sorted(containing),
            collapsed: Keys::new(),
        };
        debug_assert!(
            sets.upper.iter().all(|k| !sets.lower.contains(k) && !sets.containing.contains(k)),
            "starting segment was already active: {:?}",
            sets
        );
        sets
    }

    /// Mark the starting segments among `keys` as collapsed.
    pub fn with_collapsed(mut self, keys: impl IntoIterator<Item = usize>) -> Self {
        self.collapsed = sorted(keys.into_iter().filter(|k| self.upper.contains(k)));
        self
    }

    #[inline]
    pub fn upper(&self) -> &[usize] {
        &self.upper
    }

    #[inline]
    pub fn lower(&self) -> &[usize] {
        &self.lower
    }

    #[inline]
    pub fn containing(&self) -> &[usize] {
        &self.containing
    }

    /// `L ∪ C`: the segments leaving the status at this event.
    pub fn removed(&self) -> Keys {
        union([&self.lower, &self.containing])
    }

    /// `U ∪ C` without the collapsed segments: the segments entering the
    /// status at this event.
    pub fn reinserted(&self) -> Keys {
        union([&self.upper, &self.containing])
            .into_iter()
            .filter(|k| !self.collapsed.contains(k))
            .collect()
    }

    /// `L ∪ U ∪ C`.
    pub fn participants(&self) -> Keys {
        union([&self.lower, &self.upper, &self.containing])
    }

    /// Number of input segments meeting at the event. Merged duplicates
    /// count once per input.
    pub fn input_count<T: GeoFloat, P: NumberComparison<T>>(
        &self,
        ctx: &SweepContext<T, P>,
    ) -> usize {
        self.participants()
            .iter()
            .map(|&key| ctx.segment(key).inputs().len())
            .sum()
    }
}
