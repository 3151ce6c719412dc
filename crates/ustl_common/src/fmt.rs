use core::fmt::{self, Display, Formatter};

/// Display adapter writing every item of a sequence, separated by a single space.
///
/// The format spec is forwarded to each item, so `{:>3}` pads every element.
///
/// ```
/// use ustl_common::fmt::SpaceSeparated;
///
/// assert_eq!(SpaceSeparated([1, 2, 3].iter()).to_string(), "1 2 3");
/// assert_eq!(format!("{:02}", SpaceSeparated(&[4, 5])), "04 05");
/// ```
#[derive(Clone, Copy, Debug)]
pub struct SpaceSeparated<I>(pub I);

impl<I> Display for SpaceSeparated<I> where
    I: IntoIterator + Clone,
    I::Item: Display,
{
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let mut iter = self.0.clone().into_iter();
        if let Some(first) = iter.next() {
            Display::fmt(&first, f)?;
            for item in iter {
                f.write_str(" ")?;
                Display::fmt(&item, f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn joins_with_single_spaces() {
        assert_eq!(SpaceSeparated(["a", "b", "c"]).to_string(), "a b c");
        assert_eq!(SpaceSeparated(Vec::<u8>::new()).to_string(), "");
        assert_eq!(SpaceSeparated(Some(7)).to_string(), "7");
    }

    #[test]
    fn forwards_format_spec() {
        assert_eq!(format!("{:>3}", SpaceSeparated(1..4)), "  1   2   3");
    }
}
