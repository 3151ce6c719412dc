//! Linear searches, returning positions as offsets from the start of the range.

/// Result of matching a needle against the front of a haystack.
enum Prefix {
    Match,
    Mismatch,
    /// The haystack ran out first, so no later start can match either.
    Exhausted,
}

fn match_prefix<I, J, P>(mut haystack: I, needle: J, pred: &mut P) -> Prefix where
    I: Iterator,
    J: Iterator,
    P: FnMut(I::Item, J::Item) -> bool,
{
    for expected in needle {
        match haystack.next() {
            None => return Prefix::Exhausted,
            Some(item) => if !pred(item, expected) {
                return Prefix::Mismatch;
            },
        }
    }
    Prefix::Match
}

/// Find the offset of the first element equal to `value`.
///
/// ```
/// use ustl_algorithm::find;
///
/// assert_eq!(find(&[4, 8, 15], &8), Some(1));
/// assert_eq!(find(0..10, 12), None);
/// ```
pub fn find<I, V>(range: I, value: V) -> Option<usize> where
    I: IntoIterator,
    I::Item: PartialEq<V>,
{
    range.into_iter().position(|item| item == value)
}

/// Find the offset of the first element `pred` holds for.
pub fn find_if<I, P>(range: I, pred: P) -> Option<usize> where
    I: IntoIterator,
    P: FnMut(I::Item) -> bool,
{
    range.into_iter().position(pred)
}

/// Find the offset of the first element `pred` does not hold for.
pub fn find_if_not<I, P>(range: I, mut pred: P) -> Option<usize> where
    I: IntoIterator,
    P: FnMut(I::Item) -> bool,
{
    range.into_iter().position(|item| !pred(item))
}

/// Find the offset of the last occurrence of `needle` in `haystack`.
///
/// An empty needle never matches.
pub fn find_end<I, J>(haystack: I, needle: J) -> Option<usize> where
    I: IntoIterator,
    I::IntoIter: Clone,
    J: IntoIterator,
    J::IntoIter: Clone,
    I::Item: PartialEq<J::Item>,
{
    find_end_by(haystack, needle, |a, b| a == b)
}

/// Find the offset of the last occurrence of `needle` in `haystack`, using `pred` to compare elements.
pub fn find_end_by<I, J, P>(haystack: I, needle: J, mut pred: P) -> Option<usize> where
    I: IntoIterator,
    I::IntoIter: Clone,
    J: IntoIterator,
    J::IntoIter: Clone,
    P: FnMut(I::Item, J::Item) -> bool,
{
    let needle = needle.into_iter();
    if needle.clone().next().is_none() {
        return None;
    }

    let mut haystack = haystack.into_iter();
    let mut last = None;
    let mut pos = 0;
    loop {
        match match_prefix(haystack.clone(), needle.clone(), &mut pred) {
            Prefix::Match => last = Some(pos),
            Prefix::Mismatch => {},
            Prefix::Exhausted => return last,
        }
        if haystack.next().is_none() {
            return last;
        }
        pos += 1;
    }
}

/// Find the offset of the first occurrence of `needle` in `haystack`.
///
/// An empty needle matches at offset 0, even in an empty haystack.
///
/// ```
/// use ustl_algorithm::search;
///
/// assert_eq!(search(&[1, 2, 3, 2, 3], &[2, 3]), Some(1));
/// assert_eq!(search(&[1, 2, 3], &[3, 4]), None);
/// ```
pub fn search<I, J>(haystack: I, needle: J) -> Option<usize> where
    I: IntoIterator,
    I::IntoIter: Clone,
    J: IntoIterator,
    J::IntoIter: Clone,
    I::Item: PartialEq<J::Item>,
{
    search_by(haystack, needle, |a, b| a == b)
}

/// Find the offset of the first occurrence of `needle` in `haystack`, using `pred` to compare elements.
pub fn search_by<I, J, P>(haystack: I, needle: J, mut pred: P) -> Option<usize> where
    I: IntoIterator,
    I::IntoIter: Clone,
    J: IntoIterator,
    J::IntoIter: Clone,
    P: FnMut(I::Item, J::Item) -> bool,
{
    let needle = needle.into_iter();
    let mut haystack = haystack.into_iter();
    let mut pos = 0;
    loop {
        match match_prefix(haystack.clone(), needle.clone(), &mut pred) {
            Prefix::Match => return Some(pos),
            Prefix::Mismatch => {},
            Prefix::Exhausted => return None,
        }
        haystack.next()?;
        pos += 1;
    }
}

/// Find the offset of the first run of `count` consecutive elements equal to `value`.
///
/// A `count` of 0 matches at offset 0.
pub fn search_n<I, V>(range: I, count: usize, value: V) -> Option<usize> where
    I: IntoIterator,
    I::Item: PartialEq<V>,
{
    search_n_by(range, count, |item| item == value)
}

/// Find the offset of the first run of `count` consecutive elements `pred` holds for.
pub fn search_n_by<I, P>(range: I, count: usize, mut pred: P) -> Option<usize> where
    I: IntoIterator,
    P: FnMut(I::Item) -> bool,
{
    if count == 0 {
        return Some(0);
    }

    let mut run_start = 0;
    let mut run = 0;
    for (idx, item) in range.into_iter().enumerate() {
        if pred(item) {
            if run == 0 {
                run_start = idx;
            }
            run += 1;
            if run == count {
                return Some(run_start);
            }
        } else {
            run = 0;
        }
    }
    None
}

/// Find the offset of the first element in `range` that is equal to any element of `set`.
///
/// ```
/// use ustl_algorithm::find_first_of;
///
/// assert_eq!(find_first_of(&[1, 2, 3, 4], &[5, 6, 3]), Some(2));
/// ```
pub fn find_first_of<I, J>(range: I, set: J) -> Option<usize> where
    I: IntoIterator,
    J: IntoIterator,
    J::IntoIter: Clone,
    I::Item: PartialEq<J::Item>,
{
    find_first_of_by(range, set, |a, b| *a == b)
}

/// Find the offset of the first element in `range` that `pred` holds for together with any element of `set`.
pub fn find_first_of_by<I, J, P>(range: I, set: J, mut pred: P) -> Option<usize> where
    I: IntoIterator,
    J: IntoIterator,
    J::IntoIter: Clone,
    P: FnMut(&I::Item, J::Item) -> bool,
{
    let set = set.into_iter();
    range.into_iter().position(|item| set.clone().any(|candidate| pred(&item, candidate)))
}

/// Find the offset of the first element that is equal to the element following it.
///
/// ```
/// use ustl_algorithm::adjacent_find;
///
/// assert_eq!(adjacent_find(&[1, 2, 2, 3, 3]), Some(1));
/// assert_eq!(adjacent_find(&[1, 2, 3]), None);
/// ```
pub fn adjacent_find<I>(range: I) -> Option<usize> where
    I: IntoIterator,
    I::Item: PartialEq,
{
    adjacent_find_by(range, |a, b| a == b)
}

/// Find the offset of the first element that `pred` holds for together with the element following it.
pub fn adjacent_find_by<I, P>(range: I, mut pred: P) -> Option<usize> where
    I: IntoIterator,
    P: FnMut(&I::Item, &I::Item) -> bool,
{
    let mut iter = range.into_iter();
    let mut prev = iter.next()?;
    for (idx, cur) in iter.enumerate() {
        if pred(&prev, &cur) {
            return Some(idx);
        }
        prev = cur;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_variants() {
        let arr = [5, 3, 8, 3];
        assert_eq!(find(&arr, &3), Some(1));
        assert_eq!(find(&arr, &7), None);
        assert_eq!(find_if(&arr, |x| *x > 5), Some(2));
        assert_eq!(find_if_not(&arr, |x| *x > 4), Some(1));
        assert_eq!(find_if_not(&arr, |x| *x > 0), None);
        assert_eq!(find(&[] as &[i32], &3), None);
    }

    #[test]
    fn find_end_returns_last_match() {
        let hay = [1, 2, 3, 1, 2, 3, 1, 2];
        assert_eq!(find_end(&hay, &[1, 2, 3]), Some(3));
        assert_eq!(find_end(&hay, &[1, 2]), Some(6));
        assert_eq!(find_end(&hay, &[3, 2]), None);
        assert_eq!(find_end(&hay, &[] as &[i32]), None);
        assert_eq!(find_end(&[] as &[i32], &[1]), None);
        assert_eq!(find_end(&[1, 2], &[1, 2, 3]), None);
    }

    #[test]
    fn search_returns_first_match() {
        let hay = [1, 2, 1, 2, 1, 3];
        assert_eq!(search(&hay, &[1, 2]), Some(0));
        assert_eq!(search(&hay, &[2, 1, 3]), Some(3));
        assert_eq!(search(&hay, &[1, 3, 1]), None);
        assert_eq!(search(&hay, &[] as &[i32]), Some(0));
        assert_eq!(search(&[] as &[i32], &[] as &[i32]), Some(0));
        assert_eq!(search(&[] as &[i32], &[1]), None);
    }

    #[test]
    fn search_with_predicate() {
        let hay = ["Foo", "BAR", "baz"];
        assert_eq!(search_by(&hay, &["bar", "BAZ"], |a, b| a.eq_ignore_ascii_case(b)), Some(1));
        assert_eq!(find_end_by(0..10, [2, 3], |a, b| a % 5 == b), Some(7));
    }

    #[test]
    fn search_n_finds_runs() {
        let arr = [1, 7, 7, 2, 7, 7, 7];
        assert_eq!(search_n(&arr, 2, &7), Some(1));
        assert_eq!(search_n(&arr, 3, &7), Some(4));
        assert_eq!(search_n(&arr, 4, &7), None);
        assert_eq!(search_n(&arr, 0, &9), Some(0));
        assert_eq!(search_n_by(&arr, 2, |x| *x > 1), Some(1));
    }

    #[test]
    fn find_first_of_scans_in_order() {
        assert_eq!(find_first_of(&[1, 2, 3, 4], &[5, 6, 3]), Some(2));
        assert_eq!(find_first_of(&[1, 2, 3, 4], &[7, 4, 1]), Some(0));
        assert_eq!(find_first_of(&[1, 2], &[] as &[i32]), None);
        assert_eq!(find_first_of_by("abc".chars(), "XYC".chars(), |a, b| a.eq_ignore_ascii_case(&b)), Some(2));
    }

    #[test]
    fn adjacent_find_reports_first_of_pair() {
        assert_eq!(adjacent_find(&[1, 1]), Some(0));
        assert_eq!(adjacent_find(&[1]), None);
        assert_eq!(adjacent_find(&[] as &[i32]), None);
        assert_eq!(adjacent_find_by(&[1, 3, 2, 4], |a, b| *a > *b), Some(1));
    }
}
