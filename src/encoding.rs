//! Tagged record form of a [`Range`], for whatever persists or transmits it.
//!
//! With the `serde` feature the record is internally tagged by `kind`:
//!
//! ```json
//! {"kind":"range-set","runs":[[1,2],[4,5]]}
//! ```
//!
//! Decoding only accepts the canonical form, so a payload that could not have
//! come out of [`Range::encode`] is an error rather than a malformed value.

use tracing::debug;

use crate::{Error, Interval, Range, RangeSet};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(tag = "kind", rename_all = "kebab-case")
)]
pub enum EncodedRange {
    /// Only the anchor survives.
    EmptyInterval { from: i64 },
    Interval { from: i64, to: i64 },
    /// `(from, to)` pairs in ascending order.
    RangeSet { runs: Vec<(i64, i64)> },
    Unbounded,
}

impl Range {
    pub fn encode(&self) -> EncodedRange {
        match self {
            Range::Interval(iv) => match iv.bounds() {
                Some((from, to)) => EncodedRange::Interval { from, to },
                None => EncodedRange::EmptyInterval { from: iv.start() },
            },
            Range::RangeSet(set) => EncodedRange::RangeSet {
                runs: set.as_pairs().to_vec(),
            },
            Range::Unbounded => EncodedRange::Unbounded,
        }
    }

    /// Rebuilds the exact variant that was encoded.
    ///
    /// Fails with [`Error::MalformedEncoding`] on reversed bounds, on a
    /// range-set with fewer than two runs, and on runs that are out of order,
    /// overlapping or adjacent.
    pub fn decode(encoded: EncodedRange) -> Result<Range, Error> {
        match encoded {
            EncodedRange::EmptyInterval { from } => Ok(Range::empty_from(from)),
            EncodedRange::Interval { from, to } => {
                if from > to {
                    return Err(malformed(format!("interval bounds {from}..={to} are reversed")));
                }
                Ok(Range::Interval(Interval::new_unchecked(from, to)))
            }
            EncodedRange::RangeSet { runs } => {
                check_runs(&runs)?;
                Ok(Range::RangeSet(RangeSet::from_runs_unchecked(runs)))
            }
            EncodedRange::Unbounded => Ok(Range::Unbounded),
        }
    }
}

fn check_runs(runs: &[(i64, i64)]) -> Result<(), Error> {
    if runs.len() < 2 {
        return Err(malformed(format!(
            "range-set holds {} run(s), at least two are required",
            runs.len()
        )));
    }
    if let Some((i, &(from, to))) = runs.iter().enumerate().find(|(_, run)| run.0 > run.1) {
        return Err(malformed(format!("run {i} ({from}..={to}) is reversed")));
    }
    for (i, pair) in runs.windows(2).enumerate() {
        let ((prev_from, prev_to), (from, to)) = (pair[0], pair[1]);
        let problem = if from < prev_from {
            "is out of order with"
        } else if from <= prev_to {
            "overlaps"
        } else if prev_to.checked_add(1) == Some(from) {
            "is adjacent to"
        } else {
            continue;
        };
        return Err(malformed(format!(
            "run {} ({from}..={to}) {problem} run {i} ({prev_from}..={prev_to})",
            i + 1
        )));
    }
    Ok(())
}

fn malformed(reason: String) -> Error {
    debug!(%reason, "rejecting malformed range encoding");
    Error::MalformedEncoding(reason)
}

impl From<&Range> for EncodedRange {
    fn from(range: &Range) -> Self {
        range.encode()
    }
}

impl From<Range> for EncodedRange {
    fn from(range: Range) -> Self {
        range.encode()
    }
}

impl TryFrom<EncodedRange> for Range {
    type Error = Error;

    fn try_from(encoded: EncodedRange) -> Result<Self, Self::Error> {
        Range::decode(encoded)
    }
}
