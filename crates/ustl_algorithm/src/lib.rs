//! Generic algorithms over iterable ranges and slices.
//!
//! Functions taking a range accept anything implementing [`IntoIterator`], searches that need to restart part way
//! through additionally require the iterator to be [`Clone`]. Positions are returned as offsets from the start of the
//! range, `None` meaning "not found".
//!
//! Custom orderings are given as comparison functions returning an [`Ordering`](std::cmp::Ordering), custom
//! equivalences as predicates returning `bool`.

use ustl_logging::LogCategory;

mod compare;
mod merge;
mod minmax;
mod predicate;
mod search;
mod sort;

pub use compare::*;
pub use merge::*;
pub use minmax::*;
pub use predicate::*;
pub use search::*;
pub use sort::*;

pub(crate) const LOG_CAT: LogCategory = LogCategory::new("Algorithm");
