use std::{cmp::Ordering, fmt};

use crate::{Interval, Iter, Range, Runs};

/// Two or more runs stored as `(start, last)` pairs, ascending, with a gap of
/// at least one integer between neighbours.
///
/// A set that would hold fewer than two runs is always handed out as an
/// [`Interval`] instead, so a `RangeSet` never exists in a collapsible state.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct RangeSet(Box<[(i64, i64)]>);

impl fmt::Debug for RangeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut set_builder = f.debug_set();
        for &(start, last) in self.0.iter() {
            set_builder.entry(&(start..=last));
        }
        set_builder.finish()
    }
}

impl fmt::Display for RangeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl RangeSet {
    pub(crate) fn from_runs_unchecked(runs: Vec<(i64, i64)>) -> Self {
        debug_assert!(runs.len() >= 2);
        debug_assert!(is_canonical(&runs));
        RangeSet(runs.into_boxed_slice())
    }

    #[inline]
    pub(crate) fn as_pairs(&self) -> &[(i64, i64)] {
        &self.0
    }

    #[inline]
    pub fn runs(&self) -> Runs<'_> {
        Runs::from_pairs(&self.0)
    }

    #[inline]
    pub fn run_count(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn start(&self) -> i64 {
        self.0[0].0
    }

    #[inline]
    pub fn last(&self) -> i64 {
        self.0[self.0.len() - 1].1
    }

    /// Number of elements, saturating at `u64::MAX`.
    pub fn size(&self) -> u64 {
        self.0.iter().fold(0u64, |acc, &(start, last)| {
            acc.saturating_add(last.abs_diff(start).saturating_add(1))
        })
    }

    /// 二分查找包含 `v` 的区间
    fn run_containing(&self, v: i64) -> Option<usize> {
        let idx = self.0.partition_point(|&(start, _)| start <= v);
        idx.checked_sub(1).filter(|&i| v <= self.0[i].1)
    }

    #[inline]
    pub fn contains(&self, v: i64) -> bool {
        self.run_containing(v).is_some()
    }

    /// Whether any run shares an element with `iv`; an empty `iv` intersects
    /// everything.
    pub fn intersects_interval(&self, iv: &Interval) -> bool {
        let Some((start, last)) = iv.bounds() else {
            return true;
        };
        // 各区间互不重叠，所以 last 同样有序
        let idx = self.0.partition_point(|&(_, run_last)| run_last < start);
        self.0.get(idx).is_some_and(|&(run_start, _)| run_start <= last)
    }

    /// Whether any run ends right before `iv` or starts right after it; an
    /// empty `iv` is adjacent to everything.
    pub fn is_adjacent_interval(&self, iv: &Interval) -> bool {
        let Some((start, last)) = iv.bounds() else {
            return true;
        };
        let ends_before = start
            .checked_sub(1)
            .is_some_and(|p| self.0.binary_search_by_key(&p, |&(_, run_last)| run_last).is_ok());
        let starts_after = last
            .checked_add(1)
            .is_some_and(|n| self.0.binary_search_by_key(&n, |&(run_start, _)| run_start).is_ok());
        ends_before || starts_after
    }

    pub fn intersects(&self, other: &RangeSet) -> bool {
        let (small, large) = self.by_run_count(other);
        small.runs().any(|iv| large.intersects_interval(&iv))
    }

    pub fn is_adjacent(&self, other: &RangeSet) -> bool {
        let (small, large) = self.by_run_count(other);
        small.runs().any(|iv| large.is_adjacent_interval(&iv))
    }

    #[inline]
    fn by_run_count<'a>(&'a self, other: &'a RangeSet) -> (&'a RangeSet, &'a RangeSet) {
        if self.0.len() <= other.0.len() {
            (self, other)
        } else {
            (other, self)
        }
    }

    pub fn union_interval(&self, iv: &Interval) -> Range {
        match iv.bounds() {
            Some(run) => Range::from_runs(merge_runs(self.0.iter().copied(), [run]), self.start()),
            None => Range::RangeSet(self.clone()),
        }
    }

    pub fn union(&self, other: &RangeSet) -> Range {
        let runs = merge_runs(self.0.iter().copied(), other.0.iter().copied());
        Range::from_runs(runs, self.start().min(other.start()))
    }

    #[inline]
    pub fn add(&self, v: i64) -> Range {
        self.union_interval(&Interval::singleton(v))
    }

    pub fn remove(&self, v: i64) -> Range {
        let Some(i) = self.run_containing(v) else {
            return Range::RangeSet(self.clone());
        };
        let (start, last) = self.0[i];
        let mut runs = Vec::with_capacity(self.0.len() + 1);
        runs.extend_from_slice(&self.0[..i]);
        // 被删除的点把所在区间切成零到两段
        if start < v {
            runs.push((start, v - 1));
        }
        if v < last {
            runs.push((v + 1, last));
        }
        runs.extend_from_slice(&self.0[i + 1..]);
        Range::from_runs(runs, v.saturating_add(1))
    }

    #[inline]
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self.runs())
    }
}

impl PartialOrd for RangeSet {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        if self == other {
            Some(Ordering::Equal)
        } else if self.intersects(other) {
            None
        } else {
            Some(self.start().cmp(&other.start()))
        }
    }
}

impl<'a> IntoIterator for &'a RangeSet {
    type Item = i64;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Ascending, pairwise non-overlapping and non-adjacent.
pub(crate) fn is_canonical(runs: &[(i64, i64)]) -> bool {
    runs.iter().all(|&(start, last)| start <= last)
        && runs
            .windows(2)
            .all(|w| w[0].1.checked_add(1).is_some_and(|after| after < w[1].0))
}

/// Merges two run sequences that are each sorted by start into one canonical
/// run sequence.
pub(crate) fn merge_runs<L, R>(left: L, right: R) -> Vec<(i64, i64)>
where
    L: IntoIterator<Item = (i64, i64)>,
    R: IntoIterator<Item = (i64, i64)>,
{
    let mut left = left.into_iter().peekable();
    let mut right = right.into_iter().peekable();
    let mut merged = Vec::with_capacity(left.size_hint().0 + right.size_hint().0);

    // 当前正在构建、可能还会继续扩大的区间
    let mut cur_merged: Option<(i64, i64)> = None;

    loop {
        // 从两侧头部取 start 最小的区间
        let next_run = match (left.peek().copied(), right.peek().copied()) {
            (Some((left_start, _)), Some((right_start, _))) => {
                if left_start <= right_start {
                    left.next()
                } else {
                    right.next()
                }
            }
            (Some(_), None) => left.next(),
            (None, Some(_)) => right.next(),
            (None, None) => break,
        };
        let Some(next_run) = next_run else {
            break;
        };
        match cur_merged.as_mut() {
            None => cur_merged = Some(next_run),
            // 重叠或相邻，扩大当前区间
            Some(merged_run) if next_run.0 <= merged_run.1.saturating_add(1) => {
                merged_run.1 = merged_run.1.max(next_run.1);
            }
            Some(merged_run) => {
                merged.push(*merged_run);
                *merged_run = next_run;
            }
        }
    }
    merged.extend(cur_merged);
    merged
}

/// Sorts arbitrary non-empty runs and coalesces them in one sweep.
pub(crate) fn coalesce(mut runs: Vec<(i64, i64)>) -> Vec<(i64, i64)> {
    runs.sort_unstable_by_key(|&(start, _)| start);
    let mut write = 0;
    for read in 0..runs.len() {
        let run = runs[read];
        if write > 0 && run.0 <= runs[write - 1].1.saturating_add(1) {
            runs[write - 1].1 = runs[write - 1].1.max(run.1);
        } else {
            runs[write] = run;
            write += 1;
        }
    }
    runs.truncate(write);
    runs
}
