use tracing::trace;

use crate::{Interval, Range, RangeSet};

impl Range {
    /// An empty interval anchored at `n`.
    #[inline]
    pub const fn empty_from(n: i64) -> Range {
        Range::Interval(Interval::empty_from(n))
    }

    #[inline]
    pub const fn singleton(v: i64) -> Range {
        Range::Interval(Interval::singleton(v))
    }

    /// Every integer between `a` and `b` inclusive, in either order.
    #[inline]
    pub const fn between(a: i64, b: i64) -> Range {
        if a <= b {
            Range::Interval(Interval::new_unchecked(a, b))
        } else {
            Range::Interval(Interval::new_unchecked(b, a))
        }
    }

    #[inline]
    pub const fn unbounded() -> Range {
        Range::Unbounded
    }

    /// Wraps canonical runs in the smallest variant that holds them.
    ///
    /// `runs` must already be ascending, non-overlapping and non-adjacent.
    /// With no runs left the result is empty and anchored at `anchor`.
    pub(crate) fn from_runs(runs: Vec<(i64, i64)>, anchor: i64) -> Range {
        match runs.len() {
            0 => Range::empty_from(anchor),
            1 => {
                let (start, last) = runs[0];
                trace!(start, last, "runs collapsed to a single interval");
                Range::Interval(Interval::new_unchecked(start, last))
            }
            _ => Range::RangeSet(RangeSet::from_runs_unchecked(runs)),
        }
    }
}
