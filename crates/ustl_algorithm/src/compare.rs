//! Counting and range comparison.

use std::{collections::HashMap, hash::Hash};

use ustl_common::hashing::FnvBuildHasher;

/// Count the elements equal to `value`.
pub fn count<I, V>(range: I, value: V) -> usize where
    I: IntoIterator,
    I::Item: PartialEq<V>,
{
    range.into_iter().filter(|item| *item == value).count()
}

/// Count the elements `pred` holds for.
pub fn count_if<I, P>(range: I, mut pred: P) -> usize where
    I: IntoIterator,
    P: FnMut(I::Item) -> bool,
{
    range.into_iter().fold(0, |acc, item| acc + pred(item) as usize)
}

/// Find the first offset at which `a` and `b` differ.
///
/// When one range is a prefix of the other, the offset is the length of the shorter range.
/// Returns `None` when both ranges have the same length and all elements are equal.
///
/// ```
/// use ustl_algorithm::mismatch;
///
/// assert_eq!(mismatch(&[1, 2, 3], &[1, 2, 4]), Some(2));
/// assert_eq!(mismatch(&[1, 2], &[1, 2, 3]), Some(2));
/// assert_eq!(mismatch(&[1, 2], &[1, 2]), None);
/// ```
pub fn mismatch<I, J>(a: I, b: J) -> Option<usize> where
    I: IntoIterator,
    J: IntoIterator,
    I::Item: PartialEq<J::Item>,
{
    mismatch_by(a, b, |x, y| x == y)
}

/// Find the first offset at which `pred` does not hold for the elements of `a` and `b`.
pub fn mismatch_by<I, J, P>(a: I, b: J, mut pred: P) -> Option<usize> where
    I: IntoIterator,
    J: IntoIterator,
    P: FnMut(I::Item, J::Item) -> bool,
{
    let mut a = a.into_iter();
    let mut b = b.into_iter();
    let mut idx = 0;
    loop {
        match (a.next(), b.next()) {
            (Some(x), Some(y)) => if !pred(x, y) {
                return Some(idx);
            },
            (None, None) => return None,
            _ => return Some(idx),
        }
        idx += 1;
    }
}

/// Check if both ranges have the same length and equal elements at each position.
pub fn equal<I, J>(a: I, b: J) -> bool where
    I: IntoIterator,
    J: IntoIterator,
    I::Item: PartialEq<J::Item>,
{
    mismatch(a, b).is_none()
}

/// Check if both ranges have the same length and `pred` holds for the elements at each position.
pub fn equal_by<I, J, P>(a: I, b: J, pred: P) -> bool where
    I: IntoIterator,
    J: IntoIterator,
    P: FnMut(I::Item, J::Item) -> bool,
{
    mismatch_by(a, b, pred).is_none()
}

/// Check if `b` is a reordering of `a`, with every element occurring the same number of times in both.
///
/// Runs in linear time by counting occurrences in a hash map, ranges of different lengths are never permutations.
///
/// ```
/// use ustl_algorithm::is_permutation;
///
/// assert!(is_permutation(&[1, 2, 2, 3], &[3, 1, 2, 2]));
/// assert!(!is_permutation(&[1, 2, 2], &[1, 1, 2]));
/// ```
pub fn is_permutation<I, J>(a: I, b: J) -> bool where
    I: IntoIterator,
    J: IntoIterator<Item = I::Item>,
    I::Item: Hash + Eq,
{
    let mut counts: HashMap<I::Item, usize, FnvBuildHasher> = HashMap::default();
    let mut len_a = 0;
    for item in a {
        *counts.entry(item).or_insert(0) += 1;
        len_a += 1;
    }

    let mut len_b = 0;
    for item in b {
        match counts.get_mut(&item) {
            Some(count) if *count > 0 => *count -= 1,
            _ => return false,
        }
        len_b += 1;
    }
    len_a == len_b
}

/// Check if `b` is a reordering of `a`, using `pred` as the equivalence between elements.
///
/// Only an equivalence is needed, so this compares every distinct element against both slices, in quadratic time.
pub fn is_permutation_by<T, P>(a: &[T], b: &[T], mut pred: P) -> bool where
    P: FnMut(&T, &T) -> bool,
{
    if a.len() != b.len() {
        return false;
    }

    // Skip the common prefix, it can't change the outcome.
    let start = mismatch_by(a, b, &mut pred).unwrap_or(a.len());
    let (a, b) = (&a[start..], &b[start..]);

    for (idx, item) in a.iter().enumerate() {
        if a[..idx].iter().any(|prev| pred(prev, item)) {
            continue;
        }
        let in_a = a[idx..].iter().filter(|other| pred(item, *other)).count();
        let in_b = b.iter().filter(|other| pred(item, *other)).count();
        if in_a != in_b {
            return false;
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counting() {
        let arr = [1, 2, 1, 3, 1];
        assert_eq!(count(&arr, &1), 3);
        assert_eq!(count(&arr, &4), 0);
        assert_eq!(count_if(&arr, |x| *x > 1), 2);
        assert_eq!(count_if(&[] as &[i32], |_| true), 0);
    }

    #[test]
    fn mismatch_and_equal() {
        assert_eq!(mismatch(&[1, 2, 3], &[1, 2]), Some(2));
        assert_eq!(mismatch(&[] as &[i32], &[] as &[i32]), None);
        assert_eq!(mismatch(&[] as &[i32], &[1]), Some(0));
        assert_eq!(mismatch_by(&[1i32, 2, 3], &[-1i32, -2, 3], |a, b| a.abs() == b.abs()), None);

        assert!(equal(&[1, 2, 3], &[1, 2, 3]));
        assert!(!equal(&[1, 2, 3], &[1, 2]));
        assert!(equal(0..3, [0, 1, 2]));
        assert!(equal_by(["a", "B"], ["A", "b"], |x, y| x.eq_ignore_ascii_case(y)));
    }

    #[test]
    fn permutations() {
        assert!(is_permutation(&[1, 2, 2, 3], &[3, 1, 2, 2]));
        assert!(!is_permutation(&[1, 2, 3], &[1, 2, 3, 3]));
        assert!(!is_permutation(&[1, 2, 3, 3], &[1, 2, 3]));
        assert!(!is_permutation(&[1, 1, 2], &[1, 2, 2]));
        assert!(is_permutation(&[] as &[i32], &[] as &[i32]));
        assert!(is_permutation("listen".chars(), "silent".chars()));
    }

    #[test]
    fn permutations_by_equivalence() {
        let same_parity = |a: &i32, b: &i32| a % 2 == b % 2;
        assert!(is_permutation_by(&[1, 2, 3], &[4, 5, 7], same_parity));
        assert!(!is_permutation_by(&[1, 2, 3], &[4, 6, 7], same_parity));
        assert!(!is_permutation_by(&[1, 2], &[1, 2, 3], same_parity));
        assert!(is_permutation_by(&[1, 2, 2, 3], &[3, 2, 1, 2], |a, b| a == b));
        assert!(!is_permutation_by(&[1, 2, 2, 3], &[3, 2, 1, 1], |a, b| a == b));
    }
}
