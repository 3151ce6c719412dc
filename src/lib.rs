//! A growable array with an exchangeable allocation strategy, and generic algorithms over ranges.
//!
//! The sub-crates are re-exported under shorter names, [`prelude`] pulls in the commonly used items.

pub use ustl_algorithm as algorithm;
pub use ustl_common as common;
pub use ustl_logging as logging;

pub mod prelude {
    pub use ustl_common::prelude::*;
    pub use ustl_algorithm::{
        find, find_first_of, find_if, is_permutation, is_sorted, merge, merge_extend, search, sort, sort_by,
        sort_by_key, stable_sort, stable_sort_by, try_sort,
    };
    pub use ustl_logging::{log_error, log_info, log_verbose, log_warning, LogCategory, LogLevel, Logger};
}
