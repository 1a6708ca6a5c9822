//! Input handling choices made at the API boundary.
//!
//! The sweep itself never validates segments: zero-length and duplicate
//! segments are resolved here, before the event queue is seeded.

/// What to do with a segment whose end points coincide.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Degenerate {
    /// Fail with [`InvalidReason::ZeroLength`](crate::InvalidReason::ZeroLength).
    #[default]
    Reject,
    /// Drop the segment (logged at `warn` level). It never appears in
    /// any report.
    Skip,
}

/// What to do with segments that repeat another input segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Duplicates {
    /// Sweep the repeated segments as one. Every report involving them
    /// lists all of their input indices.
    #[default]
    Merge,
    /// Fail with [`InvalidReason::Duplicate`](crate::InvalidReason::Duplicate).
    Reject,
}

/// Configuration of a sweep run.
///
/// ```rust
/// use geo_sweep::{Degenerate, Duplicates, SweepConfig};
/// let config = SweepConfig::default()
///     .with_zero_length(Degenerate::Skip)
///     .with_duplicates(Duplicates::Reject);
/// assert_eq!(config.zero_length, Degenerate::Skip);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SweepConfig {
    pub zero_length: Degenerate,
    pub duplicates: Duplicates,
}

impl SweepConfig {
    #[must_use]
    pub fn with_zero_length(mut self, zero_length: Degenerate) -> Self {
        self.zero_length = zero_length;
        self
    }

    #[must_use]
    pub fn with_duplicates(mut self, duplicates: Duplicates) -> Self {
        self.duplicates = duplicates;
        self
    }
}
