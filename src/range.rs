use std::{
    cmp::Ordering,
    fmt,
    iter::FusedIterator,
    ops::{BitOr, BitOrAssign, RangeInclusive},
    slice,
};

use tracing::trace;

use crate::{Error, Interval, IntervalIter, RangeSet, range_set::coalesce};

/// An immutable set of `i64` stored as its minimal run decomposition.
///
/// Every operation returns a new `Range` in canonical form: never a
/// [`RangeSet`] with fewer than two runs.
#[derive(Clone, PartialEq, Eq, Hash)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(into = "crate::EncodedRange", try_from = "crate::EncodedRange")
)]
pub enum Range {
    /// Zero or one run.
    Interval(Interval),
    /// Two or more runs.
    RangeSet(RangeSet),
    /// Every `i64`.
    Unbounded,
}

impl Range {
    #[inline]
    pub fn is_empty(&self) -> bool {
        matches!(self, Range::Interval(iv) if iv.is_empty())
    }

    /// Number of elements, saturating at `u64::MAX`.
    pub fn size(&self) -> u64 {
        match self {
            Range::Interval(iv) => iv.size(),
            Range::RangeSet(set) => set.size(),
            Range::Unbounded => u64::MAX,
        }
    }

    /// Smallest element, or the anchor of an empty interval.
    pub fn start(&self) -> i64 {
        match self {
            Range::Interval(iv) => iv.start(),
            Range::RangeSet(set) => set.start(),
            Range::Unbounded => i64::MIN,
        }
    }

    /// Largest element, `None` when empty.
    pub fn last(&self) -> Option<i64> {
        match self {
            Range::Interval(iv) => iv.last(),
            Range::RangeSet(set) => Some(set.last()),
            Range::Unbounded => Some(i64::MAX),
        }
    }

    pub fn contains(&self, v: i64) -> bool {
        match self {
            Range::Interval(iv) => iv.contains(v),
            Range::RangeSet(set) => set.contains(v),
            Range::Unbounded => true,
        }
    }

    /// Whether some run of `self` touches some run of `other` with no gap.
    ///
    /// Empty ranges and the unbounded range are adjacent to everything.
    pub fn is_adjacent(&self, other: &Range) -> bool {
        match (self, other) {
            (Range::Unbounded, _) | (_, Range::Unbounded) => true,
            (Range::Interval(a), Range::Interval(b)) => a.is_adjacent(b),
            (Range::Interval(iv), Range::RangeSet(set))
            | (Range::RangeSet(set), Range::Interval(iv)) => set.is_adjacent_interval(iv),
            (Range::RangeSet(a), Range::RangeSet(b)) => a.is_adjacent(b),
        }
    }

    /// Whether the two ranges share an element.
    ///
    /// Empty ranges and the unbounded range intersect everything.
    pub fn intersects(&self, other: &Range) -> bool {
        match (self, other) {
            (Range::Unbounded, _) | (_, Range::Unbounded) => true,
            (Range::Interval(a), Range::Interval(b)) => a.intersects(b),
            (Range::Interval(iv), Range::RangeSet(set))
            | (Range::RangeSet(set), Range::Interval(iv)) => set.intersects_interval(iv),
            (Range::RangeSet(a), Range::RangeSet(b)) => a.intersects(b),
        }
    }

    #[must_use]
    pub fn union(&self, other: &Range) -> Range {
        match (self, other) {
            (Range::Unbounded, _) | (_, Range::Unbounded) => Range::Unbounded,
            (Range::Interval(a), Range::Interval(b)) => a.union(b),
            (Range::Interval(iv), Range::RangeSet(set))
            | (Range::RangeSet(set), Range::Interval(iv)) => set.union_interval(iv),
            (Range::RangeSet(a), Range::RangeSet(b)) => a.union(b),
        }
    }

    #[must_use]
    pub fn add(&self, v: i64) -> Range {
        match self {
            Range::Interval(iv) => iv.add(v),
            Range::RangeSet(set) => set.add(v),
            Range::Unbounded => Range::Unbounded,
        }
    }

    /// Fails with [`Error::UnsupportedOnUnbounded`] on the unbounded range.
    pub fn remove(&self, v: i64) -> Result<Range, Error> {
        match self {
            Range::Interval(iv) => Ok(iv.remove(v)),
            Range::RangeSet(set) => Ok(set.remove(v)),
            Range::Unbounded => Err(Error::UnsupportedOnUnbounded("remove")),
        }
    }

    /// Every element in ascending order. Each call starts a fresh pass.
    ///
    /// Fails with [`Error::UnsupportedOnUnbounded`] on the unbounded range.
    pub fn iter(&self) -> Result<Iter<'_>, Error> {
        self.runs()
            .map(Iter::new)
            .map_err(|_| Error::UnsupportedOnUnbounded("iterate"))
    }

    /// The canonical runs, ascending. An empty interval has none.
    pub fn runs(&self) -> Result<Runs<'_>, Error> {
        match self {
            Range::Interval(iv) => Ok(Runs::single(*iv)),
            Range::RangeSet(set) => Ok(set.runs()),
            Range::Unbounded => Err(Error::UnsupportedOnUnbounded("runs")),
        }
    }

    /// Partial order: equal ranges are `Equal`, disjoint ranges are ordered
    /// by their smallest element and intersecting ones are
    /// [`Error::NotComparable`].
    ///
    /// The unbounded range precedes every other range and is `Equal` to
    /// itself, so the order agrees with `==`.
    pub fn try_cmp(&self, other: &Range) -> Result<Ordering, Error> {
        match (self, other) {
            (Range::Unbounded, Range::Unbounded) => Ok(Ordering::Equal),
            (Range::Unbounded, _) => Ok(Ordering::Less),
            (_, Range::Unbounded) => Ok(Ordering::Greater),
            _ if self == other => Ok(Ordering::Equal),
            _ if self.intersects(other) => Err(Error::NotComparable),
            _ => Ok(self.start().cmp(&other.start())),
        }
    }

    /// Unions any number of ranges with a single sort and sweep.
    ///
    /// Prefer this over folding [`Range::union`] or [`Range::add`] in a loop,
    /// which rebuilds the run list on every step.
    pub fn union_all<I>(ranges: I) -> Range
    where
        I: IntoIterator<Item = Range>,
    {
        let mut runs = Vec::new();
        let mut anchor = None;
        let mut inputs = 0usize;
        for range in ranges {
            inputs += 1;
            match range {
                Range::Unbounded => return Range::Unbounded,
                Range::Interval(iv) => match iv.bounds() {
                    Some(run) => runs.push(run),
                    None => {
                        anchor.get_or_insert(iv.start());
                    }
                },
                Range::RangeSet(set) => runs.extend_from_slice(set.as_pairs()),
            }
        }
        let runs = coalesce(runs);
        trace!(inputs, runs = runs.len(), "batch union");
        Range::from_runs(runs, anchor.unwrap_or(0))
    }
}

impl PartialOrd for Range {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.try_cmp(other).ok()
    }
}

impl From<Interval> for Range {
    #[inline]
    fn from(iv: Interval) -> Self {
        Range::Interval(iv)
    }
}

impl From<RangeSet> for Range {
    #[inline]
    fn from(set: RangeSet) -> Self {
        Range::RangeSet(set)
    }
}

impl From<RangeInclusive<i64>> for Range {
    #[inline]
    fn from(rng: RangeInclusive<i64>) -> Self {
        Range::Interval(rng.into())
    }
}

impl FromIterator<Range> for Range {
    fn from_iter<I: IntoIterator<Item = Range>>(iter: I) -> Self {
        Range::union_all(iter)
    }
}

impl FromIterator<Interval> for Range {
    fn from_iter<I: IntoIterator<Item = Interval>>(iter: I) -> Self {
        Range::union_all(iter.into_iter().map(Range::Interval))
    }
}

impl FromIterator<i64> for Range {
    fn from_iter<I: IntoIterator<Item = i64>>(iter: I) -> Self {
        let runs = coalesce(iter.into_iter().map(|v| (v, v)).collect());
        Range::from_runs(runs, 0)
    }
}

impl BitOr<&Range> for &Range {
    type Output = Range;
    #[inline]
    fn bitor(self, rhs: &Range) -> Self::Output {
        self.union(rhs)
    }
}

impl BitOr<&Range> for Range {
    type Output = Range;
    #[inline]
    fn bitor(self, rhs: &Range) -> Self::Output {
        self.union(rhs)
    }
}

impl BitOrAssign<&Range> for Range {
    #[inline]
    fn bitor_assign(&mut self, rhs: &Range) {
        *self = self.union(rhs);
    }
}

impl fmt::Debug for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Range::Interval(iv) => fmt::Debug::fmt(iv, f),
            Range::RangeSet(set) => fmt::Debug::fmt(set, f),
            Range::Unbounded => f.write_str(".."),
        }
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// The runs of a bounded [`Range`] as non-empty [`Interval`]s.
#[derive(Clone, Debug)]
pub struct Runs<'a> {
    single: Option<Interval>,
    rest: slice::Iter<'a, (i64, i64)>,
}

impl<'a> Runs<'a> {
    pub(crate) fn from_pairs(pairs: &'a [(i64, i64)]) -> Self {
        Runs {
            single: None,
            rest: pairs.iter(),
        }
    }

    fn single(iv: Interval) -> Self {
        Runs {
            single: (!iv.is_empty()).then_some(iv),
            rest: [].iter(),
        }
    }
}

impl Iterator for Runs<'_> {
    type Item = Interval;

    fn next(&mut self) -> Option<Interval> {
        self.single.take().or_else(|| {
            self.rest
                .next()
                .map(|&(start, last)| Interval::new_unchecked(start, last))
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = usize::from(self.single.is_some()) + self.rest.len();
        (n, Some(n))
    }
}

impl ExactSizeIterator for Runs<'_> {}

impl FusedIterator for Runs<'_> {}

/// Every element of a bounded [`Range`], ascending.
#[derive(Clone, Debug)]
pub struct Iter<'a> {
    runs: Runs<'a>,
    current: IntervalIter,
}

impl<'a> Iter<'a> {
    pub(crate) fn new(runs: Runs<'a>) -> Self {
        Iter {
            runs,
            current: Interval::empty_from(0).iter(),
        }
    }
}

impl Iterator for Iter<'_> {
    type Item = i64;

    fn next(&mut self) -> Option<i64> {
        loop {
            if let Some(v) = self.current.next() {
                return Some(v);
            }
            self.current = self.runs.next()?.iter();
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // 当前区间剩余的元素加上后面每个区间的长度
        let exact = self.current.size_hint().1.and_then(|current| {
            self.runs
                .clone()
                .try_fold(current, |acc, iv| acc.checked_add(iv.iter().size_hint().1?))
        });
        match exact {
            Some(n) => (n, Some(n)),
            None => (usize::MAX, None),
        }
    }
}

impl FusedIterator for Iter<'_> {}

#[cfg(test)]
mod tests {
    use crate::{Error, Interval, Range};
    use std::cmp::Ordering;

    fn set(runs: &[(i64, i64)]) -> Range {
        Range::union_all(runs.iter().map(|&(start, last)| Range::between(start, last)))
    }

    #[test]
    fn test_remove_splits_interval() {
        let split = Range::between(1, 5).remove(3).unwrap();
        assert!(matches!(split, Range::RangeSet(_)));
        assert_eq!(split, set(&[(1, 2), (4, 5)]));
    }

    #[test]
    fn test_union_adjacent_runs_coalesce() {
        let merged = Range::between(1, 5).union(&Range::between(6, 10));
        assert_eq!(merged, Range::Interval(Interval::new(1, 10)));
    }

    #[test]
    fn test_union_keeps_gap() {
        let merged = Range::between(1, 5).union(&Range::between(7, 10));
        let Range::RangeSet(runs) = &merged else {
            panic!("expected a range set, got {merged:?}");
        };
        assert_eq!(runs.runs().collect::<Vec<_>>(), vec![Interval::new(1, 5), Interval::new(7, 10)]);
    }

    #[test]
    fn test_add_grows_singleton() {
        assert_eq!(Range::singleton(5).add(4).add(6), Range::between(4, 6));
    }

    #[test]
    fn test_add_to_empty() {
        assert_eq!(Range::empty_from(0).add(10), Range::Interval(Interval::new(10, 10)));
    }

    #[test]
    fn test_compare_overlapping_fails() {
        assert_eq!(
            Range::between(1, 5).try_cmp(&Range::between(3, 8)),
            Err(Error::NotComparable)
        );
    }

    #[test]
    fn test_compare_disjoint() {
        assert_eq!(Range::between(1, 5).try_cmp(&Range::between(6, 8)), Ok(Ordering::Less));
        assert_eq!(set(&[(10, 12), (20, 22)]).try_cmp(&Range::between(1, 5)), Ok(Ordering::Greater));
        assert_eq!(set(&[(1, 2), (4, 5)]).try_cmp(&set(&[(1, 2), (4, 5)])), Ok(Ordering::Equal));
        assert_eq!(set(&[(1, 2), (4, 5)]).try_cmp(&Range::between(2, 3)), Err(Error::NotComparable));
    }

    #[test]
    fn test_compare_unbounded() {
        assert_eq!(Range::unbounded().try_cmp(&Range::between(1, 5)), Ok(Ordering::Less));
        assert_eq!(Range::between(1, 5).try_cmp(&Range::unbounded()), Ok(Ordering::Greater));
        assert_eq!(Range::unbounded().try_cmp(&Range::unbounded()), Ok(Ordering::Equal));
        assert!(Range::unbounded() < Range::empty_from(0));
    }

    #[test]
    fn test_sort_disjoint_ranges() {
        let mut ranges = vec![Range::between(20, 25), Range::unbounded(), set(&[(1, 2), (5, 6)]), Range::singleton(10)];
        ranges.sort_by(|a, b| a.partial_cmp(b).unwrap());
        assert_eq!(
            ranges,
            vec![Range::unbounded(), set(&[(1, 2), (5, 6)]), Range::singleton(10), Range::between(20, 25)]
        );
    }

    #[test]
    fn test_unbounded_absorbs() {
        let all = Range::unbounded();
        assert_eq!(all.union(&Range::between(1, 5)), Range::Unbounded);
        assert_eq!(Range::between(1, 5).union(&all), Range::Unbounded);
        assert_eq!(all.add(7), Range::Unbounded);
        assert!(all.contains(i64::MIN));
        assert!(all.contains(i64::MAX));
        assert!(all.intersects(&Range::singleton(3)));
        assert!(all.is_adjacent(&set(&[(1, 2), (5, 6)])));
        assert_eq!(all.size(), u64::MAX);
    }

    #[test]
    fn test_unbounded_refuses_remove_and_iter() {
        let all = Range::unbounded();
        assert_eq!(all.remove(3), Err(Error::UnsupportedOnUnbounded("remove")));
        assert!(matches!(all.iter(), Err(Error::UnsupportedOnUnbounded("iterate"))));
        assert!(all.runs().is_err());
    }

    #[test]
    fn test_mixed_predicates() {
        let runs = set(&[(10, 20), (30, 40)]);
        assert!(runs.intersects(&Range::between(18, 22)));
        assert!(Range::between(18, 22).intersects(&runs));
        assert!(!runs.intersects(&Range::between(22, 28)));
        assert!(runs.is_adjacent(&Range::between(41, 50)));
        assert!(Range::empty_from(0).intersects(&runs));
        assert!(Range::empty_from(0).is_adjacent(&Range::between(100, 200)));
        assert!(!Range::empty_from(0).contains(0));
    }

    #[test]
    fn test_union_set_with_interval_commutes() {
        let runs = set(&[(10, 20), (30, 40)]);
        let iv = Range::between(15, 32);
        assert_eq!(runs.union(&iv), iv.union(&runs));
        assert_eq!(runs.union(&iv), Range::between(10, 40));
    }

    #[test]
    fn test_union_all() {
        let merged = Range::union_all([
            Range::between(30, 40),
            Range::empty_from(7),
            set(&[(1, 2), (5, 6)]),
            Range::singleton(3),
        ]);
        assert_eq!(merged, set(&[(1, 3), (5, 6), (30, 40)]));
        assert_eq!(Range::union_all([Range::between(1, 2), Range::unbounded()]), Range::Unbounded);
        let empty = Range::union_all([Range::empty_from(7)]);
        assert!(empty.is_empty());
        assert_eq!(empty.start(), 7);
        assert!(Range::union_all(Vec::new()).is_empty());
    }

    #[test]
    fn test_collect_values() {
        let range: Range = [5i64, 1, 2, 3, 9, 8].into_iter().collect();
        assert_eq!(range, set(&[(1, 3), (5, 5), (8, 9)]));
        let single: Range = (0..100i64).collect();
        assert_eq!(single, Range::between(0, 99));
    }

    #[test]
    fn test_collect_intervals() {
        let range: Range = [Interval::new(1, 3), Interval::new(4, 6)].into_iter().collect();
        assert_eq!(range, Range::between(1, 6));
    }

    #[test]
    fn test_bitor() {
        let mut range = Range::between(1, 2);
        range |= &Range::between(4, 5);
        assert_eq!(range, set(&[(1, 2), (4, 5)]));
        assert_eq!(&range | &Range::singleton(3), Range::between(1, 5));
        assert_eq!(range | &Range::unbounded(), Range::Unbounded);
    }

    #[test]
    fn test_iter() {
        let runs = set(&[(1, 3), (7, 8)]);
        let first: Vec<_> = runs.iter().unwrap().collect();
        let second: Vec<_> = runs.iter().unwrap().collect();
        assert_eq!(first, vec![1, 2, 3, 7, 8]);
        assert_eq!(first, second);
        assert_eq!(Range::empty_from(4).iter().unwrap().next(), None);
    }

    #[test]
    fn test_iter_size_hint_is_exact() {
        let runs = set(&[(1, 3), (7, 8)]);
        let mut iter = runs.iter().unwrap();
        assert_eq!(iter.size_hint(), (5, Some(5)));
        iter.next();
        assert_eq!(iter.size_hint(), (4, Some(4)));
        iter.by_ref().take(2).for_each(drop);
        assert_eq!(iter.size_hint(), (2, Some(2)));
        assert_eq!(iter.collect::<Vec<_>>(), vec![7, 8]);
        assert_eq!(Range::empty_from(4).iter().unwrap().size_hint(), (0, Some(0)));
    }

    #[test]
    fn test_runs() {
        assert_eq!(Range::empty_from(4).runs().unwrap().len(), 0);
        assert_eq!(Range::between(1, 4).runs().unwrap().collect::<Vec<_>>(), vec![Interval::new(1, 4)]);
        assert_eq!(set(&[(1, 3), (7, 8)]).runs().unwrap().len(), 2);
    }

    #[test]
    fn test_bounds() {
        let runs = set(&[(1, 3), (7, 8)]);
        assert_eq!(runs.start(), 1);
        assert_eq!(runs.last(), Some(8));
        assert_eq!(Range::empty_from(4).last(), None);
        assert_eq!(Range::unbounded().start(), i64::MIN);
    }

    #[test]
    fn test_display() {
        assert_eq!(set(&[(1, 3), (7, 8)]).to_string(), "{1..=3, 7..=8}");
        assert_eq!(Range::between(4, 2).to_string(), "2..=4");
        assert_eq!(Range::unbounded().to_string(), "..");
        assert_eq!(Range::empty_from(1).to_string(), "{}");
    }
}
