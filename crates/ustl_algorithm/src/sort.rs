//! Stable merge sort and sortedness checks.
//!
//! Sorting is a top-down merge sort: runs of at most [`SMALL_SORT_THRESHOLD`] elements are insertion sorted in place,
//! larger runs are split in half, both halves are sorted, and then merged through a scratch buffer.
//! The scratch buffer is allocated once per call, with enough room for the whole slice.
//!
//! If the comparison panics, every element still ends up in the slice exactly once, only the order is unspecified.

use std::{
    cmp::Ordering,
    mem::{self, ManuallyDrop},
    ptr,
};

use scopeguard::guard;
use static_assertions::const_assert;
use ustl_common::{
    alloc::{Allocator, Mallocator},
    collections::{DynArr, TryReserveError},
};
use ustl_logging::log_error;

use crate::LOG_CAT;

/// Runs up to this length are sorted with insertion sort instead of being split further.
pub const SMALL_SORT_THRESHOLD: usize = 8;
const_assert!(SMALL_SORT_THRESHOLD >= 1);

/// Sort the slice in ascending order.
///
/// The sort is stable, equal elements keep their relative order.
///
/// ```
/// use ustl_algorithm::sort;
///
/// let mut v = [3, 1, 4, 1, 5, 9, 2, 6];
/// sort(&mut v);
/// assert_eq!(v, [1, 1, 2, 3, 4, 5, 6, 9]);
/// ```
pub fn sort<T: Ord>(v: &mut [T]) {
    stable_sort_by(v, T::cmp);
}

/// Sort the slice with a comparison function.
///
/// The sort is stable, see [`stable_sort_by`].
pub fn sort_by<T, F>(v: &mut [T], compare: F) where
    F: FnMut(&T, &T) -> Ordering,
{
    stable_sort_by(v, compare);
}

/// Sort the slice by the key `f` extracts from each element.
///
/// The key is extracted again for every comparison.
pub fn sort_by_key<T, K, F>(v: &mut [T], mut f: F) where
    K: Ord,
    F: FnMut(&T) -> K,
{
    stable_sort_by(v, |a, b| f(a).cmp(&f(b)));
}

/// Sort the slice in ascending order, keeping equal elements in their original order.
pub fn stable_sort<T: Ord>(v: &mut [T]) {
    stable_sort_by(v, T::cmp);
}

/// Sort the slice with a comparison function, keeping equal elements in their original order.
///
/// # Panics
///
/// Aborts through [`std::alloc::handle_alloc_error`] if the scratch buffer can't be allocated,
/// use [`try_sort_by`] to handle that case.
///
/// ```
/// use ustl_algorithm::stable_sort_by;
///
/// let mut v = [(2, 'a'), (1, 'b'), (2, 'c'), (1, 'd')];
/// stable_sort_by(&mut v, |a, b| a.0.cmp(&b.0));
/// assert_eq!(v, [(1, 'b'), (1, 'd'), (2, 'a'), (2, 'c')]);
/// ```
pub fn stable_sort_by<T, F>(v: &mut [T], mut compare: F) where
    F: FnMut(&T, &T) -> Ordering,
{
    let mut is_less = |a: &T, b: &T| compare(a, b) == Ordering::Less;
    if !needs_scratch(v) {
        insertion_sort(v, &mut is_less);
        return;
    }

    let mut scratch = DynArr::<T>::with_capacity(v.len());
    merge_sort(v, scratch.as_mut_ptr(), &mut is_less);
}

/// Sort the slice in ascending order, reporting a failure to allocate the scratch buffer instead of aborting.
///
/// The slice is left untouched when an error is returned.
pub fn try_sort<T: Ord>(v: &mut [T]) -> Result<(), TryReserveError> {
    try_sort_by(v, T::cmp)
}

/// Sort the slice with a comparison function, reporting a failure to allocate the scratch buffer instead of aborting.
///
/// The slice is left untouched when an error is returned.
pub fn try_sort_by<T, F>(v: &mut [T], compare: F) -> Result<(), TryReserveError> where
    F: FnMut(&T, &T) -> Ordering,
{
    try_sort_by_in(v, compare, Mallocator)
}

/// Sort the slice with a comparison function, allocating the scratch buffer from `alloc`.
///
/// The slice is left untouched when an error is returned.
pub fn try_sort_by_in<T, F, A>(v: &mut [T], mut compare: F, alloc: A) -> Result<(), TryReserveError> where
    F: FnMut(&T, &T) -> Ordering,
    A: Allocator,
{
    let mut is_less = |a: &T, b: &T| compare(a, b) == Ordering::Less;
    if !needs_scratch(v) {
        insertion_sort(v, &mut is_less);
        return Ok(());
    }

    let mut scratch: DynArr<T, A> = DynArr::try_with_capacity_in(v.len(), alloc).map_err(|err| {
        log_error!(LOG_CAT, "failed to allocate a sort buffer for {} elements: {err}", v.len());
        err
    })?;
    merge_sort(v, scratch.as_mut_ptr(), &mut is_less);
    Ok(())
}

/// Check if the range is sorted in ascending order.
///
/// Empty and single element ranges are sorted.
pub fn is_sorted<I>(range: I) -> bool where
    I: IntoIterator,
    I::Item: Ord,
{
    is_sorted_by(range, Ord::cmp)
}

/// Check if the range is sorted according to `compare`, meaning no element compares less than the one before it.
pub fn is_sorted_by<I, F>(range: I, mut compare: F) -> bool where
    I: IntoIterator,
    F: FnMut(&I::Item, &I::Item) -> Ordering,
{
    let mut iter = range.into_iter();
    let Some(mut prev) = iter.next() else {
        return true;
    };
    for cur in iter {
        if compare(&cur, &prev) == Ordering::Less {
            return false;
        }
        prev = cur;
    }
    true
}

/// Returns the length of the longest sorted prefix of the range.
///
/// ```
/// use ustl_algorithm::is_sorted_until;
///
/// assert_eq!(is_sorted_until(&[1, 2, 2, 5, 3, 6]), 4);
/// assert_eq!(is_sorted_until(&[1, 2, 3]), 3);
/// ```
pub fn is_sorted_until<I>(range: I) -> usize where
    I: IntoIterator,
    I::Item: Ord,
{
    is_sorted_until_by(range, Ord::cmp)
}

/// Returns the length of the longest prefix of the range that is sorted according to `compare`.
pub fn is_sorted_until_by<I, F>(range: I, mut compare: F) -> usize where
    I: IntoIterator,
    F: FnMut(&I::Item, &I::Item) -> Ordering,
{
    let mut iter = range.into_iter();
    let Some(mut prev) = iter.next() else {
        return 0;
    };
    let mut len = 1;
    for cur in iter {
        if compare(&cur, &prev) == Ordering::Less {
            break;
        }
        prev = cur;
        len += 1;
    }
    len
}

fn needs_scratch<T>(v: &[T]) -> bool {
    // Zero sized values are indistinguishable, so any order is sorted.
    mem::size_of::<T>() != 0 && v.len() > SMALL_SORT_THRESHOLD
}

/// Sort `v`, using `buf` as scratch space.
///
/// `buf` must be valid for writes of `v.len()` elements and must not overlap `v`.
fn merge_sort<T, F>(v: &mut [T], buf: *mut T, is_less: &mut F) where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    if len <= SMALL_SORT_THRESHOLD {
        insertion_sort(v, is_less);
        return;
    }

    let mid = len / 2;
    merge_sort(&mut v[..mid], buf, is_less);
    merge_sort(&mut v[mid..], buf, is_less);

    if !is_less(&v[mid], &v[mid - 1]) {
        return;
    }
    merge_halves(v, mid, buf, is_less);
}

struct MergeState {
    left:  usize,
    right: usize,
    dest:  usize,
}

/// Merge the sorted runs `v[..mid]` and `v[mid..]`.
///
/// Both runs are moved into `buf`, then merged back into `v`.
/// Until the merge is done, `v` is a hole that the guard fills with whatever is left of both runs.
fn merge_halves<T, F>(v: &mut [T], mid: usize, buf: *mut T, is_less: &mut F) where
    F: FnMut(&T, &T) -> bool,
{
    let len = v.len();
    let v = v.as_mut_ptr();

    // SAFETY: `buf` has room for `len` elements and doesn't overlap `v`.
    unsafe { ptr::copy_nonoverlapping(v, buf, len) };

    let mut state = guard(MergeState { left: 0, right: mid, dest: 0 }, |state| {
        let left_len = mid - state.left;
        let right_len = len - state.right;
        // SAFETY: `[dest, len)` in `v` is exactly as long as the unmerged parts of both runs, and each
        //         element in `buf` is copied back once.
        unsafe {
            ptr::copy_nonoverlapping(buf.add(state.left), v.add(state.dest), left_len);
            ptr::copy_nonoverlapping(buf.add(state.right), v.add(state.dest + left_len), right_len);
        }
    });

    while state.left < mid && state.right < len {
        // SAFETY: both indices point at elements in `buf` that weren't moved back yet,
        //         and `dest == left + (right - mid)` stays below `len`.
        unsafe {
            let left = buf.add(state.left);
            let right = buf.add(state.right);
            if is_less(&*right, &*left) {
                ptr::copy_nonoverlapping(right, v.add(state.dest), 1);
                state.right += 1;
            } else {
                ptr::copy_nonoverlapping(left, v.add(state.dest), 1);
                state.left += 1;
            }
        }
        state.dest += 1;
    }
}

fn insertion_sort<T, F>(v: &mut [T], is_less: &mut F) where
    F: FnMut(&T, &T) -> bool,
{
    for end in 2..=v.len() {
        insert_tail(&mut v[..end], is_less);
    }
}

/// Move the last element of `v` back until `v` is sorted, assuming `v[..v.len() - 1]` already is.
fn insert_tail<T, F>(v: &mut [T], is_less: &mut F) where
    F: FnMut(&T, &T) -> bool,
{
    let last = v.len() - 1;
    let base = v.as_mut_ptr();

    // SAFETY: `last` and `last - 1` are in bounds.
    unsafe {
        if !is_less(&*base.add(last), &*base.add(last - 1)) {
            return;
        }

        // The tail is read out, leaving a hole the guard writes it back into.
        let tmp = ManuallyDrop::new(ptr::read(base.add(last)));
        let mut hole = guard(last, |hole| ptr::copy_nonoverlapping(&*tmp as *const T, base.add(hole), 1));

        ptr::copy_nonoverlapping(base.add(last - 1), base.add(last), 1);
        *hole = last - 1;
        while *hole > 0 && is_less(&*tmp, &*base.add(*hole - 1)) {
            ptr::copy_nonoverlapping(base.add(*hole - 1), base.add(*hole), 1);
            *hole -= 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        cell::Cell,
        panic::{self, AssertUnwindSafe},
        rc::Rc,
    };

    use super::*;

    /// Deterministic pseudo random values, so failures are reproducible.
    fn scrambled(len: usize, seed: u64) -> DynArr<u32> {
        let mut state = seed;
        (0..len).map(|_| {
            state = state.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            (state >> 40) as u32 % 1000
        }).collect()
    }

    #[test]
    fn sorts_small_and_large() {
        for len in [0, 1, 2, 7, 8, 9, 16, 17, 100, 1000] {
            let mut v = scrambled(len, len as u64);
            let mut expected = v.clone();
            expected.sort();
            sort(&mut v);
            assert_eq!(v, expected, "len {len}");
        }
    }

    #[test]
    fn sort_is_stable() {
        let keys = scrambled(200, 7);
        let mut v: DynArr<(u32, usize)> = keys.iter().map(|k| k % 10).zip(0..).collect();
        sort_by_key(&mut v, |e| e.0);
        for pair in v.windows(2) {
            assert!(pair[0].0 < pair[1].0 || (pair[0].0 == pair[1].0 && pair[0].1 < pair[1].1), "{pair:?}");
        }
    }

    #[test]
    fn sort_with_comparison() {
        let mut v = scrambled(50, 3);
        sort_by(&mut v, |a, b| b.cmp(a));
        assert!(is_sorted_by(&v, |a, b| b.cmp(a)));

        let mut words = ["pear", "fig", "banana", "kiwi"];
        sort_by_key(&mut words, |w| w.len());
        assert_eq!(words, ["fig", "pear", "kiwi", "banana"]);
    }

    #[test]
    fn try_sort_sorts() {
        let mut v = scrambled(64, 11);
        assert!(try_sort(&mut v).is_ok());
        assert!(is_sorted(&v));
    }

    #[test]
    fn sorts_zero_sized() {
        let mut v = [(); 20];
        sort(&mut v);
        assert_eq!(v.len(), 20);
    }

    #[test]
    fn sortedness() {
        assert!(is_sorted(&[] as &[i32]));
        assert!(is_sorted(&[1]));
        assert!(is_sorted(&[1, 1, 2]));
        assert!(!is_sorted(&[2, 1]));
        assert!(!is_sorted(&[1, 2, 3, 0]));

        assert_eq!(is_sorted_until(&[] as &[i32]), 0);
        assert_eq!(is_sorted_until(&[5]), 1);
        assert_eq!(is_sorted_until(&[1, 3, 2]), 2);
        assert_eq!(is_sorted_until_by(&[3, 2, 2, 5], |a, b| b.cmp(a)), 3);
    }

    #[test]
    fn panicking_comparison_keeps_every_element() {
        for len in [5, 40] {
            let drops = Rc::new(Cell::new(0));
            let mut v: DynArr<_> = scrambled(len, 5).into_iter().map(|k| (k, DropCounter(drops.clone()))).collect();

            let mut calls = 0;
            let res = panic::catch_unwind(AssertUnwindSafe(|| {
                sort_by(&mut v, |a, b| {
                    calls += 1;
                    if calls == len {
                        panic!("comparison failed");
                    }
                    a.0.cmp(&b.0)
                });
            }));
            assert!(res.is_err());

            let mut keys: DynArr<_> = v.iter().map(|e| e.0).collect();
            let mut expected = scrambled(len, 5);
            keys.sort();
            expected.sort();
            assert_eq!(keys, expected);

            drop(v);
            assert_eq!(drops.get(), len);
        }
    }

    struct DropCounter(Rc<Cell<usize>>);

    impl Drop for DropCounter {
        fn drop(&mut self) {
            self.0.set(self.0.get() + 1);
        }
    }
}
