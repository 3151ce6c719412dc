use std::{
    fmt,
    iter::FusedIterator,
    ptr,
    slice,
};

use crate::{
    alloc::{Allocator, Mallocator},
    collections::{imp::array::RawArray, DoubleOrMinReserveStrategy, ReserveStrategy},
};

use super::DynArr;

/// An iterator that moves out of a dynamic array.
///
/// This `struct` is created by the `into_iter` method on [`DynArr`] (provided by the [`IntoIterator`] trait).
/// The buffer is released when the iterator is dropped, together with any element that was not yielded.
pub struct IntoIter<T, A: Allocator = Mallocator, R: ReserveStrategy = DoubleOrMinReserveStrategy> {
    buf:   RawArray<T, A, R>,
    /// Index of the next element yielded from the front.
    start: usize,
    /// One past the index of the next element yielded from the back.
    end:   usize,
}

impl<T, A: Allocator, R: ReserveStrategy> IntoIter<T, A, R> {
    pub(super) fn new(buf: RawArray<T, A, R>, len: usize) -> Self {
        Self { buf, start: 0, end: len }
    }

    /// Returns the remaining items of this iterator as a slice.
    ///
    /// ```
    /// use ustl_common::dynarr;
    ///
    /// let arr = dynarr!['a', 'b', 'c'];
    /// let mut into_iter = arr.into_iter();
    /// assert_eq!(into_iter.as_slice(), &['a', 'b', 'c']);
    /// let _ = into_iter.next();
    /// assert_eq!(into_iter.as_slice(), &['b', 'c']);
    /// ```
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: `[start, end)` are the elements that have not been moved out yet.
        unsafe { slice::from_raw_parts(self.buf.ptr().add(self.start), self.end - self.start) }
    }

    /// Returns the remaining items of this iterator as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: See `as_slice`
        unsafe { slice::from_raw_parts_mut(self.buf.ptr().add(self.start), self.end - self.start) }
    }

    /// Returns a reference to the underlying allocator.
    pub fn allocator(&self) -> &A {
        self.buf.allocator()
    }
}

impl<T: fmt::Debug, A: Allocator, R: ReserveStrategy> fmt::Debug for IntoIter<T, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("IntoIter").field(&self.as_slice()).finish()
    }
}

impl<T, A: Allocator, R: ReserveStrategy> Iterator for IntoIter<T, A, R> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        // SAFETY: `start < end`, so the element is live, and it is no longer reachable after the increment.
        let value = unsafe { ptr::read(self.buf.ptr().add(self.start)) };
        self.start += 1;
        Some(value)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let len = self.end - self.start;
        (len, Some(len))
    }

    #[inline]
    fn count(self) -> usize {
        self.len()
    }
}

impl<T, A: Allocator, R: ReserveStrategy> DoubleEndedIterator for IntoIter<T, A, R> {
    #[inline]
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        self.end -= 1;
        // SAFETY: the element at the old `end - 1` is live and no longer reachable.
        Some(unsafe { ptr::read(self.buf.ptr().add(self.end)) })
    }
}

impl<T, A: Allocator, R: ReserveStrategy> ExactSizeIterator for IntoIter<T, A, R> {}

impl<T, A: Allocator, R: ReserveStrategy> FusedIterator for IntoIter<T, A, R> {}

impl<T: Clone, A: Allocator + Clone, R: ReserveStrategy> Clone for IntoIter<T, A, R> {
    fn clone(&self) -> Self {
        let mut arr = DynArr::<T, A, R>::with_capacity_in(self.end - self.start, self.allocator().clone());
        arr.extend_from_slice(self.as_slice());
        arr.into_iter()
    }
}

impl<T, A: Allocator, R: ReserveStrategy> Drop for IntoIter<T, A, R> {
    fn drop(&mut self) {
        // `buf` releases the memory once the remaining elements are dropped.
        let remaining: *mut [T] = self.as_mut_slice();
        unsafe { ptr::drop_in_place(remaining) };
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use crate::{alloc::TrackingAllocator, collections::DynArr, dynarr};

    #[test]
    fn yields_from_both_ends() {
        let mut iter = dynarr![1, 2, 3, 4].into_iter();
        assert_eq!(iter.len(), 4);
        assert_eq!(iter.next(), Some(1));
        assert_eq!(iter.next_back(), Some(4));
        assert_eq!(iter.as_slice(), &[2, 3]);
        assert_eq!(iter.collect::<DynArr<_>>(), [2, 3]);
    }

    #[test]
    fn drops_remaining_elements() {
        let rc = Rc::new(());
        let alloc = TrackingAllocator::default();
        let stats = alloc.stats().clone();

        let mut arr: DynArr<_, _> = DynArr::new_in(alloc);
        for _ in 0..5 {
            arr.push(rc.clone());
        }
        let mut iter = arr.into_iter();
        drop(iter.next());
        assert_eq!(Rc::strong_count(&rc), 5);

        drop(iter);
        assert_eq!(Rc::strong_count(&rc), 1);
        assert_eq!(stats.live_bytes(), 0);
    }

    #[test]
    fn clone_copies_the_remainder() {
        let mut iter = dynarr![String::from("a"), String::from("b")].into_iter();
        let _ = iter.next();
        let cloned = iter.clone();
        assert_eq!(cloned.as_slice(), iter.as_slice());
    }
}
