//! Whole-range predicates.

/// Check if `pred` holds for every element, stops at the first element it doesn't hold for.
///
/// An empty range returns `true`.
pub fn all_of<I, P>(range: I, mut pred: P) -> bool where
    I: IntoIterator,
    P: FnMut(I::Item) -> bool,
{
    for item in range {
        if !pred(item) {
            return false;
        }
    }
    true
}

/// Check if `pred` holds for at least one element, stops at the first element it holds for.
///
/// An empty range returns `false`.
pub fn any_of<I, P>(range: I, mut pred: P) -> bool where
    I: IntoIterator,
    P: FnMut(I::Item) -> bool,
{
    for item in range {
        if pred(item) {
            return true;
        }
    }
    false
}

/// Check if `pred` holds for no element.
///
/// An empty range returns `true`.
pub fn none_of<I, P>(range: I, pred: P) -> bool where
    I: IntoIterator,
    P: FnMut(I::Item) -> bool,
{
    !any_of(range, pred)
}

/// Call `f` with every element in order, and give `f` back so any state it accumulated can be recovered.
///
/// ```
/// use ustl_algorithm::for_each;
///
/// let mut sum = 0;
/// for_each([1, 2, 3], |x| sum += x);
/// assert_eq!(sum, 6);
/// ```
pub fn for_each<I, F>(range: I, mut f: F) -> F where
    I: IntoIterator,
    F: FnMut(I::Item),
{
    for item in range {
        f(item);
    }
    f
}
