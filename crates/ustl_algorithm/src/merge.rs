//! Merging of sorted ranges.

use std::{
    cmp::Ordering,
    fmt,
    iter::{FusedIterator, Peekable},
};

/// Iterator merging two sorted sequences into one sorted sequence.
///
/// Equal elements are taken from the first sequence before the second.
/// This `struct` is created by [`merge_iter`] and [`merge_iter_by`].
pub struct MergeIter<I: Iterator, J: Iterator<Item = I::Item>, F> {
    a:       Peekable<I>,
    b:       Peekable<J>,
    compare: F,
}

impl<I, J, F> Iterator for MergeIter<I, J, F> where
    I: Iterator,
    J: Iterator<Item = I::Item>,
    F: FnMut(&I::Item, &I::Item) -> Ordering,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        let take_b = match (self.a.peek(), self.b.peek()) {
            (Some(x), Some(y)) => (self.compare)(y, x) == Ordering::Less,
            (Some(_), None) => false,
            (None, _) => true,
        };
        if take_b { self.b.next() } else { self.a.next() }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (a_min, a_max) = self.a.size_hint();
        let (b_min, b_max) = self.b.size_hint();
        let max = match (a_max, b_max) {
            (Some(a), Some(b)) => a.checked_add(b),
            _ => None,
        };
        (a_min.saturating_add(b_min), max)
    }
}

impl<I, J, F> FusedIterator for MergeIter<I, J, F> where
    I: FusedIterator,
    J: FusedIterator<Item = I::Item>,
    F: FnMut(&I::Item, &I::Item) -> Ordering,
{}

impl<I, J, F> fmt::Debug for MergeIter<I, J, F> where
    I: Iterator + fmt::Debug,
    J: Iterator<Item = I::Item> + fmt::Debug,
    I::Item: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MergeIter").field("a", &self.a).field("b", &self.b).finish_non_exhaustive()
    }
}

/// Lazily merge two sorted ranges.
///
/// ```
/// use ustl_algorithm::merge_iter;
///
/// let merged: Vec<_> = merge_iter([1, 4, 6], [2, 3, 7]).collect();
/// assert_eq!(merged, [1, 2, 3, 4, 6, 7]);
/// ```
pub fn merge_iter<I, J>(a: I, b: J) -> MergeIter<I::IntoIter, J::IntoIter, fn(&I::Item, &I::Item) -> Ordering> where
    I: IntoIterator,
    J: IntoIterator<Item = I::Item>,
    I::Item: Ord,
{
    let compare: fn(&I::Item, &I::Item) -> Ordering = Ord::cmp;
    merge_iter_by(a, b, compare)
}

/// Lazily merge two ranges sorted according to `compare`.
pub fn merge_iter_by<I, J, F>(a: I, b: J, compare: F) -> MergeIter<I::IntoIter, J::IntoIter, F> where
    I: IntoIterator,
    J: IntoIterator<Item = I::Item>,
    F: FnMut(&I::Item, &I::Item) -> Ordering,
{
    MergeIter { a: a.into_iter().peekable(), b: b.into_iter().peekable(), compare }
}

/// Merge two sorted ranges into `dest`, returning the number of elements written.
///
/// # Panics
///
/// Panics if `dest` is shorter than the combined length of both ranges.
/// Elements merged before the panic stay in `dest`.
///
/// ```
/// use ustl_algorithm::merge;
///
/// let mut out = [0; 6];
/// assert_eq!(merge([1, 3, 5], [2, 4, 6], &mut out), 6);
/// assert_eq!(out, [1, 2, 3, 4, 5, 6]);
/// ```
#[track_caller]
pub fn merge<I, J, T>(a: I, b: J, dest: &mut [T]) -> usize where
    I: IntoIterator<Item = T>,
    J: IntoIterator<Item = T>,
    T: Ord,
{
    merge_by(a, b, dest, T::cmp)
}

/// Merge two ranges sorted according to `compare` into `dest`, returning the number of elements written.
///
/// # Panics
///
/// Panics if `dest` is shorter than the combined length of both ranges.
#[track_caller]
pub fn merge_by<I, J, T, F>(a: I, b: J, dest: &mut [T], compare: F) -> usize where
    I: IntoIterator<Item = T>,
    J: IntoIterator<Item = T>,
    F: FnMut(&T, &T) -> Ordering,
{
    let dest_len = dest.len();
    let mut written = 0;
    for item in merge_iter_by(a, b, compare) {
        match dest.get_mut(written) {
            Some(slot) => *slot = item,
            None => panic!("merge destination (len {dest_len}) is too short for the merged ranges"),
        }
        written += 1;
    }
    written
}

/// Merge two sorted ranges onto the end of `dest`, returning the number of elements added.
///
/// ```
/// use ustl_algorithm::merge_extend;
/// use ustl_common::dynarr;
///
/// let mut out = dynarr![0];
/// assert_eq!(merge_extend([1, 1, 5], [2, 3], &mut out), 5);
/// assert_eq!(out, [0, 1, 1, 2, 3, 5]);
/// ```
pub fn merge_extend<I, J, T, E>(a: I, b: J, dest: &mut E) -> usize where
    I: IntoIterator<Item = T>,
    J: IntoIterator<Item = T>,
    T: Ord,
    E: Extend<T>,
{
    merge_extend_by(a, b, dest, T::cmp)
}

/// Merge two ranges sorted according to `compare` onto the end of `dest`, returning the number of elements added.
pub fn merge_extend_by<I, J, T, E, F>(a: I, b: J, dest: &mut E, compare: F) -> usize where
    I: IntoIterator<Item = T>,
    J: IntoIterator<Item = T>,
    E: Extend<T>,
    F: FnMut(&T, &T) -> Ordering,
{
    let mut added = 0;
    dest.extend(merge_iter_by(a, b, compare).inspect(|_| added += 1));
    added
}
