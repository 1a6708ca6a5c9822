use std::fmt;

/// Failures of a sweep.
///
/// Every failure is fatal to the call: no partial results are reported
/// past the point where the error was raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SweepError {
    /// An input segment was rejected before the sweep started.
    #[error("input segment {index} is invalid: {reason}")]
    InvalidSegment { index: usize, reason: InvalidReason },

    /// A segment could not be placed consistently in the sweep status: it
    /// was missing on removal, or the segments re-inserted at an event did
    /// not fit between their neighbours. This only happens with tolerance
    /// policies whose tolerance is too coarse for the input.
    #[error("input segment {segment} could not be ordered consistently in the sweep status")]
    StatusConflict { segment: usize },
}

/// Why an input segment was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvalidReason {
    /// A coordinate is `NaN` or infinite.
    NonFinite,
    /// Both end points are equal under the comparison policy.
    ZeroLength,
    /// The segment repeats the input segment at index `of`.
    Duplicate { of: usize },
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InvalidReason::NonFinite => write!(f, "non-finite coordinate"),
            InvalidReason::ZeroLength => write!(f, "zero-length segment"),
            InvalidReason::Duplicate { of } => write!(f, "duplicate of segment {}", of),
        }
    }
}
