use std::{
    cmp::Ordering,
    fmt,
    hash::{Hash, Hasher},
    iter::FusedIterator,
    ops::RangeInclusive,
};

use crate::{Error, Range};

/// A single inclusive run `[start, last]` of consecutive integers. An empty
/// interval has no `last`; its `start` survives only as the anchor it was
/// built from.
#[derive(Copy, Clone)]
pub struct Interval {
    start: i64,
    last: Option<i64>,
}

impl Interval {
    /// Builds `[start, last]`, which is empty when `start > last` (the same
    /// convention as `start..=last`).
    #[inline]
    pub const fn new(start: i64, last: i64) -> Self {
        if start > last {
            Self::empty_from(start)
        } else {
            Interval {
                start,
                last: Some(last),
            }
        }
    }

    #[inline]
    pub(crate) const fn new_unchecked(start: i64, last: i64) -> Self {
        debug_assert!(start <= last);
        Interval {
            start,
            last: Some(last),
        }
    }

    #[inline]
    pub const fn empty_from(start: i64) -> Self {
        Interval { start, last: None }
    }

    #[inline]
    pub const fn singleton(v: i64) -> Self {
        Interval {
            start: v,
            last: Some(v),
        }
    }

    /// Lower bound, or the anchor of an empty interval.
    #[inline]
    pub const fn start(&self) -> i64 {
        self.start
    }

    #[inline]
    pub const fn last(&self) -> Option<i64> {
        self.last
    }

    #[inline]
    pub const fn bounds(&self) -> Option<(i64, i64)> {
        match self.last {
            Some(last) => Some((self.start, last)),
            None => None,
        }
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.last.is_none()
    }

    /// Number of elements, saturating at `u64::MAX` for the whole `i64` domain.
    #[inline]
    pub fn size(&self) -> u64 {
        self.last
            .map_or(0, |last| last.abs_diff(self.start).saturating_add(1))
    }

    #[inline]
    pub fn contains(&self, v: i64) -> bool {
        self.last.is_some_and(|last| self.start <= v && v <= last)
    }

    /// Whether `other` starts right after this interval ends, or ends right
    /// before it starts.
    ///
    /// An empty interval on either side is adjacent to everything.
    pub fn is_adjacent(&self, other: &Self) -> bool {
        match (self.bounds(), other.bounds()) {
            (Some((start, last)), Some((other_start, other_last))) => {
                other_last.checked_add(1) == Some(start) || last.checked_add(1) == Some(other_start)
            }
            _ => true,
        }
    }

    /// Whether the two intervals share at least one element.
    ///
    /// An empty interval on either side intersects everything.
    pub fn intersects(&self, other: &Self) -> bool {
        match (self.bounds(), other.bounds()) {
            (Some((start, last)), Some((other_start, other_last))) => {
                start <= other_last && other_start <= last
            }
            _ => true,
        }
    }

    /// The smallest interval covering both, if they overlap or touch.
    ///
    /// Returns `None` when there is a gap between them or either is empty.
    #[inline]
    pub fn merge(&self, other: &Self) -> Option<Self> {
        let ((start, last), (other_start, other_last)) = (self.bounds()?, other.bounds()?);
        // 重叠或相邻
        (start.saturating_sub(1) <= other_last && other_start.saturating_sub(1) <= last)
            .then(|| Interval::new_unchecked(start.min(other_start), last.max(other_last)))
    }

    pub fn union(&self, other: &Self) -> Range {
        let (Some((start, last)), Some((other_start, other_last))) = (self.bounds(), other.bounds())
        else {
            // 空区间不贡献任何元素
            return Range::Interval(if self.is_empty() { *other } else { *self });
        };
        if let Some(hull) = self.merge(other) {
            return Range::Interval(hull);
        }
        let runs = if start < other_start {
            vec![(start, last), (other_start, other_last)]
        } else {
            vec![(other_start, other_last), (start, last)]
        };
        Range::from_runs(runs, start.min(other_start))
    }

    pub fn add(&self, v: i64) -> Range {
        let Some(last) = self.last else {
            return Range::singleton(v);
        };
        if self.contains(v) {
            Range::Interval(*self)
        } else if v.checked_add(1) == Some(self.start) {
            Range::Interval(Interval::new_unchecked(v, last))
        } else if last.checked_add(1) == Some(v) {
            Range::Interval(Interval::new_unchecked(self.start, v))
        } else if v < self.start {
            Range::from_runs(vec![(v, v), (self.start, last)], v)
        } else {
            Range::from_runs(vec![(self.start, last), (v, v)], self.start)
        }
    }

    pub fn remove(&self, v: i64) -> Range {
        let Some(last) = self.last.filter(|_| self.contains(v)) else {
            return Range::Interval(*self);
        };
        match (v == self.start, v == last) {
            (true, true) => Range::empty_from(v.saturating_add(1)),
            (true, false) => Range::Interval(Interval::new_unchecked(v + 1, last)),
            (false, true) => Range::Interval(Interval::new_unchecked(self.start, v - 1)),
            (false, false) => Range::from_runs(vec![(self.start, v - 1), (v + 1, last)], v + 1),
        }
    }

    #[inline]
    pub fn iter(&self) -> IntervalIter {
        match self.last {
            Some(last) => IntervalIter {
                front: self.start,
                back: last,
                exhausted: false,
            },
            None => IntervalIter {
                front: self.start,
                back: self.start,
                exhausted: true,
            },
        }
    }

    /// Orders by `start`, but only intervals that are equal or disjoint.
    pub fn try_cmp(&self, other: &Self) -> Result<Ordering, Error> {
        if self == other {
            Ok(Ordering::Equal)
        } else if self.intersects(other) {
            Err(Error::NotComparable)
        } else {
            Ok(self.start.cmp(&other.start))
        }
    }
}

impl PartialEq for Interval {
    fn eq(&self, other: &Self) -> bool {
        self.bounds() == other.bounds()
    }
}

impl Eq for Interval {}

impl Hash for Interval {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bounds().hash(state);
    }
}

impl PartialOrd for Interval {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.try_cmp(other).ok()
    }
}

impl From<RangeInclusive<i64>> for Interval {
    #[inline]
    fn from(rng: RangeInclusive<i64>) -> Self {
        let (start, last) = rng.into_inner();
        Interval::new(start, last)
    }
}

impl fmt::Debug for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bounds() {
            Some((start, last)) => write!(f, "{start}..={last}"),
            None => f.write_str("{}"),
        }
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl IntoIterator for &Interval {
    type Item = i64;
    type IntoIter = IntervalIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Every integer of an [`Interval`], ascending.
#[derive(Clone, Debug)]
pub struct IntervalIter {
    front: i64,
    back: i64,
    exhausted: bool,
}

impl Iterator for IntervalIter {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        if self.exhausted {
            return None;
        }
        let v = self.front;
        // 不能越过 i64::MAX
        if v == self.back {
            self.exhausted = true;
        } else {
            self.front += 1;
        }
        Some(v)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.exhausted {
            return (0, Some(0));
        }
        match usize::try_from(self.back.abs_diff(self.front))
            .ok()
            .and_then(|gap| gap.checked_add(1))
        {
            Some(n) => (n, Some(n)),
            None => (usize::MAX, None),
        }
    }
}

impl DoubleEndedIterator for IntervalIter {
    fn next_back(&mut self) -> Option<i64> {
        if self.exhausted {
            return None;
        }
        let v = self.back;
        if v == self.front {
            self.exhausted = true;
        } else {
            self.back -= 1;
        }
        Some(v)
    }
}

impl FusedIterator for IntervalIter {}
