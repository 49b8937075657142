//! Immutable sets of `i64` kept as their minimal list of runs.
//!
//! A [`Range`] is one of three variants: an [`Interval`] (zero or one run), a
//! [`RangeSet`] (two or more runs separated by gaps) or `Unbounded` (every
//! `i64`). Every operation returns a new value in the smallest variant that
//! can hold it.
//!
//! ```
//! use run_ranges::Range;
//!
//! let split = Range::between(1, 5).remove(3).unwrap();
//! assert_eq!(split.to_string(), "{1..=2, 4..=5}");
//! assert_eq!(split.add(3), Range::between(1, 5));
//! ```

mod encoding;
mod factory;
mod interval;
mod range;
mod range_set;

pub use encoding::EncodedRange;
pub use interval::{Interval, IntervalIter};
pub use range::{Iter, Range, Runs};
pub use range_set::RangeSet;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// Distinct ranges that intersect have no order.
    #[error("intersecting ranges cannot be ordered")]
    NotComparable,
    #[error("cannot {0} the unbounded range")]
    UnsupportedOnUnbounded(&'static str),
    #[error("malformed range encoding: {0}")]
    MalformedEncoding(String),
}
