//! Minimum and maximum of values, ranges and slices.
//!
//! On ties, every function here picks the earliest candidate: the first argument, or the element with the lowest offset.

use std::cmp::Ordering;

/// Returns the smaller of two values, `a` when they are equal.
pub fn min<T: Ord>(a: T, b: T) -> T {
    min_by(a, b, T::cmp)
}

/// Returns the smaller of two values according to `compare`, `a` when they are equal.
pub fn min_by<T, F>(a: T, b: T, compare: F) -> T where
    F: FnOnce(&T, &T) -> Ordering,
{
    if compare(&b, &a) == Ordering::Less { b } else { a }
}

/// Returns the larger of two values, `a` when they are equal.
///
/// ```
/// use ustl_algorithm::max_by;
///
/// let a = (1, "first");
/// let b = (1, "second");
/// assert_eq!(max_by(a, b, |x, y| x.0.cmp(&y.0)), a);
/// ```
pub fn max<T: Ord>(a: T, b: T) -> T {
    max_by(a, b, T::cmp)
}

/// Returns the larger of two values according to `compare`, `a` when they are equal.
pub fn max_by<T, F>(a: T, b: T, compare: F) -> T where
    F: FnOnce(&T, &T) -> Ordering,
{
    if compare(&a, &b) == Ordering::Less { b } else { a }
}

/// Returns both values as `(smaller, larger)`, keeping them in order when they are equal.
pub fn minmax<T: Ord>(a: T, b: T) -> (T, T) {
    minmax_by(a, b, T::cmp)
}

/// Returns both values as `(smaller, larger)` according to `compare`, keeping them in order when they are equal.
pub fn minmax_by<T, F>(a: T, b: T, compare: F) -> (T, T) where
    F: FnOnce(&T, &T) -> Ordering,
{
    if compare(&b, &a) == Ordering::Less { (b, a) } else { (a, b) }
}

/// Returns the smallest element of the range, or `None` if it's empty.
pub fn min_of<I>(range: I) -> Option<I::Item> where
    I: IntoIterator,
    I::Item: Ord,
{
    min_of_by(range, Ord::cmp)
}

/// Returns the smallest element of the range according to `compare`, or `None` if it's empty.
pub fn min_of_by<I, F>(range: I, mut compare: F) -> Option<I::Item> where
    I: IntoIterator,
    F: FnMut(&I::Item, &I::Item) -> Ordering,
{
    range.into_iter().reduce(|best, item| min_by(best, item, &mut compare))
}

/// Returns the largest element of the range, or `None` if it's empty.
pub fn max_of<I>(range: I) -> Option<I::Item> where
    I: IntoIterator,
    I::Item: Ord,
{
    max_of_by(range, Ord::cmp)
}

/// Returns the largest element of the range according to `compare`, or `None` if it's empty.
pub fn max_of_by<I, F>(range: I, mut compare: F) -> Option<I::Item> where
    I: IntoIterator,
    F: FnMut(&I::Item, &I::Item) -> Ordering,
{
    range.into_iter().reduce(|best, item| max_by(best, item, &mut compare))
}

/// Returns the smallest and largest element of the range, or `None` if it's empty.
///
/// A single element range returns that element twice.
///
/// ```
/// use ustl_algorithm::minmax_of;
///
/// assert_eq!(minmax_of([3, 9, 1, 4]), Some((1, 9)));
/// assert_eq!(minmax_of([7]), Some((7, 7)));
/// ```
pub fn minmax_of<I>(range: I) -> Option<(I::Item, I::Item)> where
    I: IntoIterator,
    I::Item: Ord + Clone,
{
    minmax_of_by(range, Ord::cmp)
}

/// Returns the smallest and largest element of the range according to `compare`, or `None` if it's empty.
///
/// Elements are compared in pairs first, which needs about 3 comparisons for every 2 elements.
pub fn minmax_of_by<I, F>(range: I, mut compare: F) -> Option<(I::Item, I::Item)> where
    I: IntoIterator,
    I::Item: Clone,
    F: FnMut(&I::Item, &I::Item) -> Ordering,
{
    let mut iter = range.into_iter();
    let first = iter.next()?;
    let mut lo = first.clone();
    let mut hi = first;

    while let Some(x) = iter.next() {
        let (small, large) = match iter.next() {
            None => (x.clone(), x),
            Some(y) => match compare(&y, &x) {
                Ordering::Less => (y, x),
                Ordering::Equal => (x.clone(), x),
                Ordering::Greater => (x, y),
            },
        };
        if compare(&small, &lo) == Ordering::Less {
            lo = small;
        }
        if compare(&hi, &large) == Ordering::Less {
            hi = large;
        }
    }
    Some((lo, hi))
}

/// Returns the offset of the smallest element of the slice, or `None` if it's empty.
pub fn min_element<T: Ord>(v: &[T]) -> Option<usize> {
    min_element_by(v, T::cmp)
}

/// Returns the offset of the smallest element of the slice according to `compare`, or `None` if it's empty.
pub fn min_element_by<T, F>(v: &[T], mut compare: F) -> Option<usize> where
    F: FnMut(&T, &T) -> Ordering,
{
    let mut best = 0;
    for idx in 1..v.len() {
        if compare(&v[idx], &v[best]) == Ordering::Less {
            best = idx;
        }
    }
    (!v.is_empty()).then_some(best)
}

/// Returns the offset of the largest element of the slice, or `None` if it's empty.
pub fn max_element<T: Ord>(v: &[T]) -> Option<usize> {
    max_element_by(v, T::cmp)
}

/// Returns the offset of the largest element of the slice according to `compare`, or `None` if it's empty.
pub fn max_element_by<T, F>(v: &[T], mut compare: F) -> Option<usize> where
    F: FnMut(&T, &T) -> Ordering,
{
    let mut best = 0;
    for idx in 1..v.len() {
        if compare(&v[best], &v[idx]) == Ordering::Less {
            best = idx;
        }
    }
    (!v.is_empty()).then_some(best)
}

/// Returns the offsets of the smallest and largest element of the slice, or `None` if it's empty.
///
/// ```
/// use ustl_algorithm::minmax_element;
///
/// assert_eq!(minmax_element(&[4, 1, 9, 1, 9]), Some((1, 2)));
/// ```
pub fn minmax_element<T: Ord>(v: &[T]) -> Option<(usize, usize)> {
    minmax_element_by(v, T::cmp)
}

/// Returns the offsets of the smallest and largest element of the slice according to `compare`, or `None` if it's empty.
pub fn minmax_element_by<T, F>(v: &[T], mut compare: F) -> Option<(usize, usize)> where
    F: FnMut(&T, &T) -> Ordering,
{
    if v.is_empty() {
        return None;
    }

    let (mut lo, mut hi) = (0, 0);
    for idx in 1..v.len() {
        if compare(&v[idx], &v[lo]) == Ordering::Less {
            lo = idx;
        } else if compare(&v[hi], &v[idx]) == Ordering::Less {
            hi = idx;
        }
    }
    Some((lo, hi))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq)]
    struct Tagged(i32, char);

    fn by_value(a: &Tagged, b: &Tagged) -> Ordering {
        a.0.cmp(&b.0)
    }

    #[test]
    fn pairs() {
        assert_eq!(min(3, 5), 3);
        assert_eq!(max(3, 5), 5);
        assert_eq!(minmax(5, 3), (3, 5));
        assert_eq!(minmax(3, 5), (3, 5));
    }

    #[test]
    fn pair_ties_pick_first_argument() {
        let a = Tagged(1, 'a');
        let b = Tagged(1, 'b');
        assert_eq!(min_by(a, b, by_value), a);
        assert_eq!(max_by(a, b, by_value), a);
        assert_eq!(minmax_by(a, b, by_value), (a, b));
    }

    #[test]
    fn ranges() {
        assert_eq!(min_of([4, 2, 8, 2]), Some(2));
        assert_eq!(max_of([4, 2, 8, 2]), Some(8));
        assert_eq!(minmax_of([4, 2, 8, 2, 5]), Some((2, 8)));
        assert_eq!(min_of(Vec::<i32>::new()), None);
        assert_eq!(minmax_of(Vec::<i32>::new()), None);
        assert_eq!(minmax_of("hello".chars()), Some(('e', 'o')));
    }

    #[test]
    fn range_ties_keep_earliest() {
        let v = [Tagged(2, 'a'), Tagged(1, 'b'), Tagged(3, 'c'), Tagged(1, 'd'), Tagged(3, 'e'), Tagged(3, 'f')];
        assert_eq!(min_of_by(v, by_value), Some(Tagged(1, 'b')));
        assert_eq!(max_of_by(v, by_value), Some(Tagged(3, 'c')));
        assert_eq!(minmax_of_by(v, by_value), Some((Tagged(1, 'b'), Tagged(3, 'c'))));

        // Odd length, the unpaired last element is compared on its own.
        let v = [Tagged(3, 'a'), Tagged(3, 'b'), Tagged(3, 'c')];
        assert_eq!(minmax_of_by(v, by_value), Some((Tagged(3, 'a'), Tagged(3, 'a'))));
    }

    #[test]
    fn element_offsets() {
        let v = [5, 1, 7, 1, 7];
        assert_eq!(min_element(&v), Some(1));
        assert_eq!(max_element(&v), Some(2));
        assert_eq!(minmax_element(&v), Some((1, 2)));
        assert_eq!(min_element::<i32>(&[]), None);
        assert_eq!(max_element::<i32>(&[]), None);
        assert_eq!(minmax_element::<i32>(&[]), None);
        assert_eq!(minmax_element(&[4]), Some((0, 0)));
        assert_eq!(max_element_by(&v, |a, b| b.cmp(a)), Some(1));
    }
}
