use std::{
    cmp::Ordering,
    collections::{btree_set, BTreeSet},
    fmt::Debug,
    ops::Bound,
};

use geo::GeoFloat;
use log::warn;

use crate::{
    context::{SweepContext, SweepKey},
    NumberComparison, SweepError,
};

/// Internal representation used in the ordered status set.
///
/// Borrows the sweep context, which holds the pieces being ordered and
/// the cursor the probe stands for.
pub(crate) struct Active<'a, T: GeoFloat, P> {
    key: SweepKey,
    ctx: &'a SweepContext<T, P>,
}

impl<'a, T: GeoFloat, P> Active<'a, T, P> {
    fn new(key: SweepKey, ctx: &'a SweepContext<T, P>) -> Self {
        Active { key, ctx }
    }

    fn segment_key(&self) -> Option<usize> {
        match self.key {
            SweepKey::Segment(key) => Some(key),
            SweepKey::Probe => None,
        }
    }
}

impl<'a, T: GeoFloat, P: NumberComparison<T>> Debug for Active<'a, T, P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut s = f.debug_struct("Active");
        s.field("key", &self.key);
        if let SweepKey::Segment(key) = self.key {
            s.field("segment", &self.ctx.segments().get(key));
        }
        s.finish()
    }
}

/// Equality is consistent with the `Ord` impl.
impl<'a, T: GeoFloat, P: NumberComparison<T>> PartialEq for Active<'a, T, P> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<'a, T: GeoFloat, P: NumberComparison<T>> Eq for Active<'a, T, P> {}

impl<'a, T: GeoFloat, P: NumberComparison<T>> PartialOrd for Active<'a, T, P> {
    #[inline]
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Ordering defined by the sweep comparator.
impl<'a, T: GeoFloat, P: NumberComparison<T>> Ord for Active<'a, T, P> {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        self.ctx.compare(self.key, other.key)
    }
}

/// The sweep status: segments crossing the sweep line, bottom to top.
pub(crate) struct ActiveSet<'a, T: GeoFloat, P> {
    ctx: &'a SweepContext<T, P>,
    set: BTreeSet<Active<'a, T, P>>,
}

impl<'a, T: GeoFloat, P: NumberComparison<T>> ActiveSet<'a, T, P> {
    pub fn new(ctx: &'a SweepContext<T, P>) -> Self {
        ActiveSet {
            ctx,
            set: BTreeSet::new(),
        }
    }

    #[inline]
    fn entry(&self, key: SweepKey) -> Active<'a, T, P> {
        Active::new(key, self.ctx)
    }

    #[inline]
    fn segment(&self, key: usize) -> Active<'a, T, P> {
        self.entry(SweepKey::Segment(key))
    }

    fn conflict(&self, key: usize) -> SweepError {
        SweepError::StatusConflict {
            segment: self.ctx.segment(key).inputs()[0],
        }
    }

    /// Insert a segment at the position of its piece.
    ///
    /// Fails if an entry comparing equal is already present.
    pub fn insert(&mut self, key: usize) -> Result<(), SweepError> {
        debug_assert!(self.ctx.segments().contains(key));
        if self.set.insert(self.segment(key)) {
            self.ctx.segment(key).set_active(true);
            Ok(())
        } else {
            Err(self.conflict(key))
        }
    }

    /// Remove a segment.
    ///
    /// The entry is located by the sweep order first. If it is not found
    /// there, it is looked up by key instead.
    pub fn remove(&mut self, key: usize) -> Result<(), SweepError> {
        debug_assert!(self.ctx.segments().contains(key));
        let entry = self.segment(key);
        let found = match self.set.get(&entry).and_then(|a| a.segment_key()) {
            Some(found) if found == key => self.set.remove(&entry),
            _ => {
                warn!("segment {} not found in sweep order; scanning", key);
                let before = self.set.len();
                self.set.retain(|a| a.key != SweepKey::Segment(key));
                self.set.len() < before
            }
        };
        if found {
            self.ctx.segment(key).set_active(false);
            Ok(())
        } else {
            Err(self.conflict(key))
        }
    }

    /// Segments strictly below `key`, top to bottom.
    #[inline]
    pub fn below(&self, key: usize) -> Walk<'_, 'a, T, P> {
        Walk::down(
            self.set
                .range((Bound::Unbounded, Bound::Excluded(self.segment(key)))),
        )
    }

    /// Segments strictly above `key`, bottom to top.
    #[inline]
    pub fn above(&self, key: usize) -> Walk<'_, 'a, T, P> {
        Walk::up(
            self.set
                .range((Bound::Excluded(self.segment(key)), Bound::Unbounded)),
        )
    }

    /// The segment right below `key`.
    #[inline]
    pub fn prev_key(&self, key: usize) -> Option<usize> {
        self.below(key).next()
    }

    /// The segment right above `key`.
    #[inline]
    pub fn next_key(&self, key: usize) -> Option<usize> {
        self.above(key).next()
    }

    /// Segments passing strictly below the cursor point, top to bottom.
    #[inline]
    pub fn below_cursor(&self) -> Walk<'_, 'a, T, P> {
        Walk::down(
            self.set
                .range((Bound::Unbounded, Bound::Excluded(self.entry(SweepKey::Probe)))),
        )
    }

    /// Segments from the cursor point upwards: first those passing through
    /// the cursor point, then those above it.
    #[inline]
    pub fn from_cursor(&self) -> Walk<'_, 'a, T, P> {
        Walk::up(
            self.set
                .range((Bound::Included(self.entry(SweepKey::Probe)), Bound::Unbounded)),
        )
    }

    /// The segments from `lo` up to `hi`, both included.
    ///
    /// Returns `None` if `hi` is not reached from `lo` going upwards.
    pub fn span(&self, lo: usize, hi: usize) -> Option<Vec<usize>> {
        let mut keys = vec![lo];
        if lo == hi {
            return Some(keys);
        }
        for key in self.above(lo) {
            keys.push(key);
            if key == hi {
                return Some(keys);
            }
        }
        None
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.set.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }

    /// Any segment still in the status.
    #[inline]
    pub fn first(&self) -> Option<usize> {
        self.set.iter().next().and_then(|a| a.segment_key())
    }
}

/// Iterator over segment keys of the status, in one direction.
pub(crate) struct Walk<'s, 'a, T: GeoFloat, P> {
    range: btree_set::Range<'s, Active<'a, T, P>>,
    upwards: bool,
}

impl<'s, 'a, T: GeoFloat, P> Walk<'s, 'a, T, P> {
    fn up(range: btree_set::Range<'s, Active<'a, T, P>>) -> Self {
        Walk {
            range,
            upwards: true,
        }
    }

    fn down(range: btree_set::Range<'s, Active<'a, T, P>>) -> Self {
        Walk {
            range,
            upwards: false,
        }
    }
}

impl<'s, 'a, T: GeoFloat, P> Iterator for Walk<'s, 'a, T, P> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let next = if self.upwards {
            self.range.next()
        } else {
            self.range.next_back()
        };
        next.and_then(|a| a.segment_key())
    }
}
