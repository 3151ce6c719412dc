use core::{
    fmt,
    hash::{Hash, Hasher},
    iter,
    mem::{self, ManuallyDrop},
    ops::{self, Bound, Index, IndexMut, Range, RangeBounds},
    ptr,
    slice::{self, SliceIndex},
};

use crate::{
    alloc::{Allocator, Mallocator},
    fmt::SpaceSeparated,
};

use super::{imp::array::RawArray, impl_slice_partial_eq_generic, DoubleOrMinReserveStrategy, OutOfRangeError, ReserveStrategy, TryReserveError};

mod into_iter;

pub use into_iter::IntoIter;

/// A contiguous growable array type, also known as a dynamic array, or DynArr.
///
/// Dynamic arrays have *O*(1) indexing, amortized *O*(1) push (to the end), and *O*(1) pop (from the back).
///
/// _Note: It was decided to not name this `Vec` as in the standard library, as this is easily confusable with a math vector_
///
/// # Examples
///
/// ```
/// use ustl_common::{collections::DynArr, dynarr};
///
/// let mut arr = DynArr::new();
/// arr.push(1);
/// arr.push(2);
///
/// assert_eq!(arr.len(), 2);
/// assert_eq!(arr[0], 1);
///
/// arr[0] = 7;
/// assert_eq!(arr[0], 7);
///
/// arr.extend([1, 2, 3]);
/// assert_eq!(arr, [7, 2, 1, 2, 3]);
///
/// let arr2 = dynarr![0; 3];
/// assert_eq!(arr2, [0, 0, 0]);
/// ```
///
/// # Indexing
///
/// Indexing with `[]` is always bounds checked and panics on an out of range index.
/// Use [`DynArr::at`] or [`slice::get`] to check whether an index is in the `DynArr`.
///
/// # Capacity and reallocation
///
/// The capacity of a dynamic array is the amount of space allocated for any future elements that will be added onto it.
/// This is not to be confused with the *length* of the dynamic array, which specifies the number of actual elements within it.
/// If a dynamic array's length would exceed its capacity, its capacity is increased according to the reserve strategy `R`, and its elements are moved to the new allocation.
///
/// A reallocation always allocates the new block before touching the live elements, so a failed reallocation leaves the `DynArr` exactly as it was.
///
/// `DynArr` never shrinks itself implicitly, even when completely empty.
/// If you wish to free up unused memory use [`DynArr::shrink_to_fit`] or [`DynArr::shrink_to`].
///
/// For zero-sized types no memory is ever allocated, and [`DynArr::capacity`] reports `usize::MAX`.
///
/// # Iterator invalidation
///
/// Iterators over a `DynArr` borrow it, any operation that may move the elements requires `&mut self`,
/// so an iterator can never observe a reallocated or shifted buffer.
pub struct DynArr<T, A: Allocator = Mallocator, R: ReserveStrategy = DoubleOrMinReserveStrategy> {
    arr: RawArray<T, A, R>,
    len: usize,
}

static_assertions::assert_eq_size!(DynArr<u32>, [usize; 3]);
static_assertions::assert_impl_all!(DynArr<u32>: Send, Sync);

impl<T> DynArr<T> {
    /// Constructs a new, empty `DynArr<T>`.
    ///
    /// The dynamic array will not allocate until elements are pushed onto it.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self::new_in(Mallocator)
    }

    /// Constructs a new, empty `DynArr<T>` with at least the specified capacity.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds `isize::MAX` _bytes_.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_capacity_in(capacity, Mallocator)
    }

    /// Tries to construct a new, empty `DynArr<T>` with at least the specified capacity.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, TryReserveError> {
        Self::try_with_capacity_in(capacity, Mallocator)
    }
}

impl<T, A: Allocator, R: ReserveStrategy> DynArr<T, A, R> {
    /// Constructs a new, empty `DynArr<T, A, R>` using the provided allocator.
    ///
    /// The dynamic array will not allocate until elements are pushed onto it.
    #[inline]
    #[must_use]
    pub const fn new_in(alloc: A) -> Self {
        Self { arr: RawArray::new_in(alloc), len: 0 }
    }

    /// Constructs a new `DynArr<T, A, R>` with at least the specified capacity with the provided allocator.
    ///
    /// If `capacity` is 0, or `T` is zero-sized, the dynamic array will not allocate.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds `isize::MAX` _bytes_.
    #[must_use]
    pub fn with_capacity_in(capacity: usize, alloc: A) -> Self {
        Self { arr: RawArray::with_capacity_in(capacity, alloc), len: 0 }
    }

    /// Tries to construct a new `DynArr<T, A, R>` with at least the specified capacity with the provided allocator.
    ///
    /// # Errors
    ///
    /// Returns an error if the capacity exceeds `isize::MAX` _bytes_, or if the allocator reports an allocation failure.
    pub fn try_with_capacity_in(capacity: usize, alloc: A) -> Result<Self, TryReserveError> {
        Ok(Self { arr: RawArray::try_with_capacity_in(capacity, alloc)?, len: 0 })
    }

    /// Creates a `DynArr` with the elements of `iter`, allocated with the provided allocator.
    pub fn from_iter_in<I: IntoIterator<Item = T>>(iter: I, alloc: A) -> Self {
        let mut arr = Self::new_in(alloc);
        <Self as Extend<T>>::extend(&mut arr, iter);
        arr
    }

    /// Returns the total number of elements the dynamic array can hold without reallocating.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.arr.capacity()
    }

    /// Returns the number of elements in the dynamic array, also referred to as the 'length'.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the dynamic array contains no elements.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns a reference to the underlying allocator.
    #[inline]
    pub fn allocator(&self) -> &A {
        self.arr.allocator()
    }

    /// Reserves capacity for at least `additional` more elements.
    ///
    /// The reserve strategy may reserve more space to speculatively avoid frequent reallocations.
    /// After calling `reserve`, the capacity will be greater than or equal to `self.len() + additional`.
    /// Does nothing if capacity is already sufficient.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds `isize::MAX` _bytes_.
    pub fn reserve(&mut self, additional: usize) {
        self.arr.reserve(self.len, additional);
    }

    /// Reserves capacity so the dynamic array can hold at least `capacity` elements in total.
    ///
    /// Does nothing if `capacity` does not exceed the current capacity.
    pub fn reserve_total(&mut self, capacity: usize) {
        self.reserve(capacity.saturating_sub(self.len));
    }

    /// Reserves the minimum capacity for at least `additional` more elements.
    ///
    /// Unlike [`reserve`], this will not deliberately over-allocate to speculatively avoid frequent allocations.
    ///
    /// [`reserve`]: DynArr::reserve
    pub fn reserve_exact(&mut self, additional: usize) {
        self.arr.reserve_exact(self.len, additional);
    }

    /// Tries to reserve capacity for at least `additional` more elements.
    ///
    /// # Errors
    ///
    /// If the capacity overflows, or the allocator reports a failure, then an error is returned and the dynamic array is left unchanged.
    pub fn try_reserve(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.arr.try_reserve(self.len, additional)
    }

    /// Tries to reserve capacity so the dynamic array can hold at least `capacity` elements in total.
    pub fn try_reserve_total(&mut self, capacity: usize) -> Result<(), TryReserveError> {
        self.try_reserve(capacity.saturating_sub(self.len))
    }

    /// Tries to reserve the minimum capacity for at least `additional` more elements.
    pub fn try_reserve_exact(&mut self, additional: usize) -> Result<(), TryReserveError> {
        self.arr.try_reserve_exact(self.len, additional)
    }

    /// Shrinks the capacity of the dynamic array down to its length, when the slack is large enough to be worth a reallocation.
    ///
    /// The reallocation only happens when the capacity exceeds `len * R::SHRINK_FACTOR`, so calling this twice never reallocates twice.
    pub fn shrink_to_fit(&mut self) {
        if R::should_shrink(self.len, self.capacity()) {
            self.arr.shrink_to_fit(self.len, self.len);
        }
    }

    /// Shrinks the capacity of the dynamic array with a lower bound.
    ///
    /// The capacity will remain at least as large as both the length and the supplied value.
    /// If the current capacity is not larger than both, this is a no-op.
    pub fn shrink_to(&mut self, min_capacity: usize) {
        let new_cap = self.len.max(min_capacity);
        if new_cap < self.capacity() {
            self.arr.shrink_to_fit(new_cap, self.len);
        }
    }

    /// Shortens the dynamic array, keeping the first `len` elements and dropping the rest.
    ///
    /// If `len` is greater or equal to the dynamic array's current length, this has no effect.
    /// This has no effect on the allocated capacity.
    pub fn truncate(&mut self, len: usize) {
        if len >= self.len {
            return;
        }
        // SAFETY: The length is shrunk before calling `drop_in_place`, so no value will be dropped twice if a drop panics.
        unsafe {
            let remaining_len = self.len - len;
            let s = ptr::slice_from_raw_parts_mut(self.as_mut_ptr().add(len), remaining_len);
            self.len = len;
            ptr::drop_in_place(s);
        }
    }

    /// Extracts a slice containing the entire dynamic array.
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        // SAFETY: `[0, len)` is always initialized, and the pointer is non-null and aligned.
        unsafe { slice::from_raw_parts(self.as_ptr(), self.len) }
    }

    /// Extracts a mutable slice containing the entire dynamic array.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: See `as_slice`
        unsafe { slice::from_raw_parts_mut(self.as_mut_ptr(), self.len) }
    }

    /// Returns a raw pointer to the buffer, or a dangling raw pointer valid for zero sized reads if the dynamic array didn't allocate.
    #[inline]
    pub fn as_ptr(&self) -> *const T {
        self.arr.ptr()
    }

    /// Returns an unsafe mutable pointer to the buffer, or a dangling raw pointer valid for zero sized reads if the dynamic array didn't allocate.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut T {
        self.arr.ptr()
    }

    /// Forces the length of the dynamic array to `new_len`.
    ///
    /// # Safety
    ///
    /// - `new_len` must be less than or equal to [`capacity()`].
    /// - The elements at `old_len..new_len` must be initialized.
    ///
    /// [`capacity()`]: DynArr::capacity
    #[inline]
    pub unsafe fn set_len(&mut self, new_len: usize) {
        debug_assert!(new_len <= self.capacity());
        self.len = new_len;
    }

    /// Returns a reference to the element at `index`, or an error carrying the index and length if it is out of range.
    ///
    /// ```
    /// use ustl_common::{collections::OutOfRangeError, dynarr};
    ///
    /// let arr = dynarr![10, 20, 30];
    /// assert_eq!(arr.at(1), Ok(&20));
    /// assert_eq!(arr.at(3), Err(OutOfRangeError { index: 3, len: 3 }));
    /// ```
    pub fn at(&self, index: usize) -> Result<&T, OutOfRangeError> {
        let len = self.len;
        self.as_slice().get(index).ok_or(OutOfRangeError { index, len })
    }

    /// Returns a mutable reference to the element at `index`, or an error carrying the index and length if it is out of range.
    pub fn at_mut(&mut self, index: usize) -> Result<&mut T, OutOfRangeError> {
        let len = self.len;
        self.as_mut_slice().get_mut(index).ok_or(OutOfRangeError { index, len })
    }

    /// Removes an element from the dynamic array and returns it.
    ///
    /// The removed element is replaced by the last element of the dynamic array.
    /// This does not preserve ordering, but is *O*(1).
    ///
    /// # Panics
    ///
    /// Panics when `index` is out of bounds.
    #[track_caller]
    pub fn swap_remove(&mut self, index: usize) -> T {
        #[cold]
        #[track_caller]
        fn assert_failed(index: usize, len: usize) -> ! {
            panic!("swap_remove index (is {index}) should be < len (is {len})");
        }

        let len = self.len;
        if index >= len {
            assert_failed(index, len);
        }
        unsafe {
            // We replace self[index] with the last element.
            // Note that if the bounds check above succeeds there must be a last element (which can be self[index] itself).
            let value = ptr::read(self.as_ptr().add(index));
            let base_ptr = self.as_mut_ptr();
            ptr::copy(base_ptr.add(len - 1), base_ptr.add(index), 1);
            self.set_len(len - 1);
            value
        }
    }

    /// Inserts an element at position `index` within the dynamic array, shifting all elements after it to the right.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`
    ///
    /// # Time complexity
    ///
    /// Takes *O*([`DynArr::len`]) time.
    #[track_caller]
    pub fn insert(&mut self, index: usize, element: T) {
        #[cold]
        #[track_caller]
        fn assert_failed(index: usize, len: usize) -> ! {
            panic!("insertion index (is {index}) should be <= len (is {len})");
        }

        let len = self.len;
        if index > len {
            assert_failed(index, len);
        }

        // Space for the new element
        if len == self.arr.capacity() {
            self.arr.grow_one(len);
        }

        unsafe {
            let p = self.as_mut_ptr().add(index);
            if index < len {
                // Shift everything over to make space.
                // (Duplicating the `index`th element into two consecutive places.)
                ptr::copy(p, p.add(1), len - index);
            }
            // Write it in, over writing the first copy of the `index`th element.
            ptr::write(p, element);
            self.set_len(len + 1);
        }
    }

    /// Inserts all elements of `iter` at position `index`, shifting all elements after it to the right.
    ///
    /// The inserted run keeps the iteration order.
    /// When the iterator reports an exact size, space for the whole run is reserved and the tail is moved once.
    /// Elements beyond the reported size are appended and rotated into place afterwards.
    /// If the iterator panics while yielding those, they are left at the end of the dynamic array.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`
    ///
    /// ```
    /// use ustl_common::dynarr;
    ///
    /// let mut arr = dynarr![1, 2, 3];
    /// arr.insert_iter(1, [9, 9]);
    /// assert_eq!(arr, [1, 9, 9, 2, 3]);
    ///
    /// arr.insert_iter(0, [4, 5, 6].into_iter().filter(|x| x % 2 == 0));
    /// assert_eq!(arr, [4, 6, 1, 9, 9, 2, 3]);
    /// ```
    #[track_caller]
    pub fn insert_iter<I: IntoIterator<Item = T>>(&mut self, mut index: usize, iter: I) {
        #[cold]
        #[track_caller]
        fn assert_failed(index: usize, len: usize) -> ! {
            panic!("insertion index (is {index}) should be <= len (is {len})");
        }

        if index > self.len {
            assert_failed(index, self.len);
        }

        let mut iter = iter.into_iter();
        let (lower, upper) = iter.size_hint();
        if upper == Some(lower) {
            index += self.insert_exact(index, &mut iter, lower);
        }

        let end = self.len;
        self.extend_desugared(iter);
        if self.len > end {
            self[index..].rotate_left(end - index);
        }
    }

    /// Writes up to `count` elements from `iter` in place at `index`, returns the number written.
    fn insert_exact<I: Iterator<Item = T>>(&mut self, index: usize, iter: &mut I, count: usize) -> usize {
        if count == 0 {
            return 0;
        }

        self.reserve(count);
        let tail_len = self.len - index;
        let base = self.as_mut_ptr();

        unsafe {
            ptr::copy(base.add(index), base.add(index + count), tail_len);
            // Only the prefix stays live while the run is written.
            self.set_len(index);
        }

        // Closes the gap left by an iterator yielding fewer items than announced, or one that panics.
        let mut gap = scopeguard::guard((self, 0usize), move |(arr, written)| unsafe {
            let p = base.add(index);
            if written < count {
                ptr::copy(p.add(count), p.add(written), tail_len);
            }
            arr.set_len(index + written + tail_len);
        });

        while gap.1 < count {
            let Some(value) = iter.next() else { break };
            unsafe { ptr::write(base.add(index + gap.1), value) };
            gap.1 += 1;
        }
        gap.1
    }

    /// Removes and returns the element at position `index` within the dynamic array, shifting all elements after it to the left.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of bounds.
    #[track_caller]
    pub fn remove(&mut self, index: usize) -> T {
        #[cold]
        #[track_caller]
        fn assert_failed(index: usize, len: usize) -> ! {
            panic!("removal index (is {index}) should be < len (is {len})");
        }

        let len = self.len;
        if index >= len {
            assert_failed(index, len);
        }
        unsafe {
            // the place we are taking from
            let ptr = self.as_mut_ptr().add(index);
            // copy it out, unsafely having a copy of the value on the stack and in the dynamic array at the same time
            let ret = ptr::read(ptr);

            // Shift everything down to fill in that spot
            ptr::copy(ptr.add(1), ptr, len - index - 1);
            self.set_len(len - 1);
            ret
        }
    }

    /// Removes the elements in `range`, shifting all elements after it to the left.
    ///
    /// # Panics
    ///
    /// Panics if the start of the range is greater than its end, or if the end is greater than the length.
    ///
    /// ```
    /// use ustl_common::dynarr;
    ///
    /// let mut arr = dynarr![1, 2, 3, 4, 5];
    /// arr.remove_range(1..3);
    /// assert_eq!(arr, [1, 4, 5]);
    /// ```
    #[track_caller]
    pub fn remove_range<RA: RangeBounds<usize>>(&mut self, range: RA) {
        let len = self.len;
        let Range { start, end } = checked_range(range, len);
        let count = end - start;
        if count == 0 {
            return;
        }

        unsafe {
            // A panicking drop leaks the tail instead of exposing dropped elements.
            self.set_len(start);
            let p = self.as_mut_ptr().add(start);
            ptr::drop_in_place(ptr::slice_from_raw_parts_mut(p, count));
            ptr::copy(p.add(count), p, len - end);
            self.set_len(len - count);
        }
    }

    /// Retains only the elements specified by the predicate.
    ///
    /// In other words, remove all elements `e` for which `f(e)` returns `false`.
    /// This method operates in place, visiting each element exactly once in the original order, and preserves the order of the retained elements.
    pub fn retain<F>(&mut self, mut f: F) where
        F: FnMut(&T) -> bool,
    {
        self.retain_mut(|elem| f(elem))
    }

    /// Retains only the elements specified by the predicate, passing a mutable reference to it.
    pub fn retain_mut<F>(&mut self, mut f: F) where
        F: FnMut(&mut T) -> bool,
    {
        let original_len = self.len;
        // Avoid double drops if the guard does not run, holes are made during the process.
        unsafe { self.set_len(0) };

        // DynArr: [Kept, Kept, Hole, Hole, Hole, Hole, Unchecked, Unchecked]
        //         |<-              processed      ->| ^- next to check
        //                     |<-   deleted     ->|
        //
        // The guard shifts the unchecked elements over the holes, also when the predicate or a drop panics.
        let mut state = scopeguard::guard((self, 0usize, 0usize), move |(arr, processed, deleted)| unsafe {
            if deleted > 0 {
                let base = arr.as_mut_ptr();
                ptr::copy(base.add(processed), base.add(processed - deleted), original_len - processed);
            }
            arr.set_len(original_len - deleted);
        });

        while state.1 < original_len {
            let (arr, processed, deleted) = &mut *state;
            let base = arr.as_mut_ptr();
            // SAFETY: `processed < original_len`, so the element is still live.
            let cur = unsafe { base.add(*processed) };
            if f(unsafe { &mut *cur }) {
                if *deleted > 0 {
                    unsafe { ptr::copy_nonoverlapping(cur, base.add(*processed - *deleted), 1) };
                }
                *processed += 1;
            } else {
                // Advance first, so a panicking drop doesn't drop the element again.
                *processed += 1;
                *deleted += 1;
                unsafe { ptr::drop_in_place(cur) };
            }
        }
    }

    /// Removes all but the first of consecutive elements in the dynamic array that resolve to the same key.
    pub fn dedup_by_key<F, K>(&mut self, mut key: F) where
        F: FnMut(&mut T) -> K,
        K: PartialEq,
    {
        self.dedup_by(|a, b| key(a) == key(b))
    }

    /// Removes all but the first of consecutive elements in the dynamic array satisfying a given equality relation.
    ///
    /// The `same_bucket` function is passed the current element and the last kept element, in that order.
    /// If it returns `true`, the current element is removed.
    pub fn dedup_by<F>(&mut self, mut same_bucket: F) where
        F: FnMut(&mut T, &mut T) -> bool,
    {
        let len = self.len;
        if len <= 1 {
            return;
        }

        unsafe { self.set_len(0) };

        // `write` is the length of the deduplicated prefix, `[write, read)` are holes.
        let mut state = scopeguard::guard((self, 1usize, 1usize), move |(arr, read, write)| unsafe {
            let base = arr.as_mut_ptr();
            ptr::copy(base.add(read), base.add(write), len - read);
            arr.set_len(write + len - read);
        });

        while state.1 < len {
            let (arr, read, write) = &mut *state;
            let base = arr.as_mut_ptr();
            unsafe {
                let cur = base.add(*read);
                let prev = base.add(*write - 1);
                if same_bucket(&mut *cur, &mut *prev) {
                    *read += 1;
                    ptr::drop_in_place(cur);
                } else {
                    ptr::copy(cur, base.add(*write), 1);
                    *read += 1;
                    *write += 1;
                }
            }
        }
    }

    /// Appends an element to the back of the dynamic array.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds `isize::MAX` _bytes_.
    ///
    /// # Time complexity
    ///
    /// Takes amortized *O*(1) time.
    #[inline]
    pub fn push(&mut self, value: T) {
        // Inform codegen that the length does not change across grow_one()
        let len = self.len;
        if len == self.arr.capacity() {
            self.arr.grow_one(len);
        }
        unsafe {
            let end = self.as_mut_ptr().add(len);
            ptr::write(end, value);
            self.len = len + 1;
        }
    }

    /// Appends an element to the back of the dynamic array, returning the element together with the error if the dynamic array could not grow.
    pub fn try_push(&mut self, value: T) -> Result<(), (T, TryReserveError)> {
        if let Err(err) = self.arr.try_reserve(self.len, 1) {
            return Err((value, err));
        }
        unsafe {
            let end = self.as_mut_ptr().add(self.len);
            ptr::write(end, value);
        }
        self.len += 1;
        Ok(())
    }

    /// Appends an element if there is sufficient spare capacity, otherwise the element is returned.
    ///
    /// Unlike [`push`], this method will not reallocate when there's insufficient capacity.
    ///
    /// [`push`]: DynArr::push
    pub fn push_within_capacity(&mut self, value: T) -> Result<(), T> {
        if self.len == self.arr.capacity() {
            return Err(value);
        }
        unsafe {
            let end = self.as_mut_ptr().add(self.len);
            ptr::write(end, value);
        }
        self.len += 1;
        Ok(())
    }

    /// Removes the last element from the dynamic array and returns it, or [`None`] if it is empty.
    pub fn pop(&mut self) -> Option<T> {
        if self.len == 0 {
            None
        } else {
            self.len -= 1;
            // SAFETY: the element at the old `len - 1` is live and no longer reachable.
            unsafe { Some(ptr::read(self.as_ptr().add(self.len))) }
        }
    }

    /// Moves all the elements of `other` into `self`, leaving `other` empty.
    ///
    /// # Panics
    ///
    /// Panics if the new capacity exceeds `isize::MAX` _bytes_.
    pub fn append(&mut self, other: &mut Self) {
        let count = other.len;
        self.reserve(count);
        unsafe {
            ptr::copy_nonoverlapping(other.as_ptr(), self.as_mut_ptr().add(self.len), count);
            other.set_len(0);
        }
        self.len += count;
    }

    /// Clears the dynamic array, removing all values.
    ///
    /// Note that this method has no effect on the allocated capacity of the dynamic array.
    #[inline]
    pub fn clear(&mut self) {
        let elems: *mut [T] = self.as_mut_slice();

        // SAFETY: Setting `self.len` before calling `drop_in_place` means that if an element's `Drop` impl panics,
        // the dynamic array's `Drop` impl will do nothing (leaking the rest of the elements) instead of dropping some twice.
        unsafe {
            self.len = 0;
            ptr::drop_in_place(elems);
        }
    }

    /// Resizes the dynamic array in-place so that `len` is equal to `new_len`.
    ///
    /// If `new_len` is greater than `len`, the dynamic array is extended by the difference, with each additional slot filled with the result of calling the closure `f`.
    /// If `new_len` is less than `len`, the dynamic array is simply truncated.
    pub fn resize_with<F>(&mut self, new_len: usize, f: F) where
        F: FnMut() -> T,
    {
        let len = self.len;
        if new_len > len {
            self.reserve(new_len - len);
            self.extend_desugared(iter::repeat_with(f).take(new_len - len));
        } else {
            self.truncate(new_len);
        }
    }

    /// Exchanges the contents of two dynamic arrays in *O*(1): buffer, length, capacity, and allocator.
    ///
    /// Named `swap_with` so it does not shadow [`slice::swap`], which swaps two elements.
    pub fn swap_with(&mut self, other: &mut Self) {
        mem::swap(self, other);
    }

    fn extend_desugared<I: Iterator<Item = T>>(&mut self, mut iter: I) {
        while let Some(element) = iter.next() {
            let len = self.len;
            if len == self.capacity() {
                let (lower, _) = iter.size_hint();
                self.reserve(lower.saturating_add(1));
            }
            unsafe {
                ptr::write(self.as_mut_ptr().add(len), element);
                // Since next() executes user code which can panic we have to bump the length after each step.
                self.set_len(len + 1);
            }
        }
    }
}

impl<T, A: Allocator + Clone, R: ReserveStrategy> DynArr<T, A, R> {
    /// Splits the collection into two at the given index.
    ///
    /// Returns a newly allocated dynamic array containing the elements in the range `[at, len)`.
    /// After the call, the original dynamic array will be left containing the elements `[0, at)` with its previous capacity unchanged.
    ///
    /// # Panics
    ///
    /// Panics if `at > len`.
    #[track_caller]
    #[must_use = "use `.truncate()` if you don't need the other half"]
    pub fn split_off(&mut self, at: usize) -> Self {
        #[cold]
        #[track_caller]
        fn assert_failed(at: usize, len: usize) -> ! {
            panic!("`at` split index (is {at}) should be <= len (is {len})");
        }

        if at > self.len {
            assert_failed(at, self.len);
        }

        let other_len = self.len - at;
        let mut other = Self::with_capacity_in(other_len, self.allocator().clone());

        unsafe {
            self.set_len(at);
            ptr::copy_nonoverlapping(self.as_ptr().add(at), other.as_mut_ptr(), other_len);
            other.set_len(other_len);
        }
        other
    }

    /// Moves the contents out of the dynamic array, leaving it empty, but with a clone of its allocator.
    pub fn take(&mut self) -> Self {
        let empty = Self::new_in(self.allocator().clone());
        mem::replace(self, empty)
    }
}

impl<T: Clone, A: Allocator, R: ReserveStrategy> DynArr<T, A, R> {
    /// Resizes the dynamic array in-place so that `len` is equal to `new_len`.
    ///
    /// If `new_len` is greater than `len`, the dynamic array is extended by the difference, with each additional slot filled with `value`.
    /// If `new_len` is less than `len`, the dynamic array is simply truncated.
    pub fn resize(&mut self, new_len: usize, value: T) {
        let len = self.len;
        if new_len > len {
            self.reserve(new_len - len);
            self.extend_desugared(iter::repeat_n(value, new_len - len));
        } else {
            self.truncate(new_len);
        }
    }

    /// Clones and appends all elements in a slice to the dynamic array.
    pub fn extend_from_slice(&mut self, other: &[T]) {
        self.reserve(other.len());
        self.extend_desugared(other.iter().cloned());
    }

    /// Inserts `count` clones of `value` at position `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`
    #[track_caller]
    pub fn insert_n(&mut self, index: usize, count: usize, value: T) {
        self.insert_iter(index, iter::repeat_n(value, count));
    }

    /// Inserts clones of all elements in `values` at position `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`
    #[track_caller]
    pub fn insert_from_slice(&mut self, index: usize, values: &[T]) {
        self.insert_iter(index, values.iter().cloned());
    }
}

impl<T: Default, A: Allocator, R: ReserveStrategy> DynArr<T, A, R> {
    /// Resizes the dynamic array in-place, filling additional slots with `T::default()`.
    pub fn resize_default(&mut self, new_len: usize) {
        self.resize_with(new_len, T::default);
    }
}

impl<T: PartialEq, A: Allocator, R: ReserveStrategy> DynArr<T, A, R> {
    /// Removes consecutive repeated elements in the dynamic array according to the [`PartialEq`] trait implementation.
    ///
    /// If the dynamic array is sorted, this removes all duplicates.
    #[inline]
    pub fn dedup(&mut self) {
        self.dedup_by(|a, b| a == b)
    }
}

/// Creates a `DynArr` with `n` clones of `elem`, using the provided allocator.
pub fn from_elem_in<T: Clone, A: Allocator, R: ReserveStrategy>(elem: T, n: usize, alloc: A) -> DynArr<T, A, R> {
    let mut arr = DynArr::with_capacity_in(n, alloc);
    arr.resize(n, elem);
    arr
}

/// Creates a `DynArr` with `n` clones of `elem`.
pub fn from_elem<T: Clone>(elem: T, n: usize) -> DynArr<T> {
    from_elem_in(elem, n, Mallocator)
}

#[track_caller]
fn checked_range<RA: RangeBounds<usize>>(range: RA, len: usize) -> Range<usize> {
    #[cold]
    #[track_caller]
    fn assert_failed(start: usize, end: usize, len: usize) -> ! {
        panic!("range {start}..{end} is out of bounds for a length of {len}");
    }

    let start = match range.start_bound() {
        Bound::Included(&start) => start,
        Bound::Excluded(&start) => start.checked_add(1).unwrap_or_else(|| assert_failed(start, len, len)),
        Bound::Unbounded => 0,
    };
    let end = match range.end_bound() {
        Bound::Included(&end) => end.checked_add(1).unwrap_or_else(|| assert_failed(start, end, len)),
        Bound::Excluded(&end) => end,
        Bound::Unbounded => len,
    };

    if start > end || end > len {
        assert_failed(start, end, len);
    }
    start..end
}

//--------------------------------------------------------------

impl<T, A: Allocator, R: ReserveStrategy> ops::Deref for DynArr<T, A, R> {
    type Target = [T];

    #[inline]
    fn deref(&self) -> &[T] {
        self.as_slice()
    }
}

impl<T, A: Allocator, R: ReserveStrategy> ops::DerefMut for DynArr<T, A, R> {
    #[inline]
    fn deref_mut(&mut self) -> &mut [T] {
        self.as_mut_slice()
    }
}

impl<T: Clone, A: Allocator + Clone, R: ReserveStrategy> Clone for DynArr<T, A, R> {
    fn clone(&self) -> Self {
        let mut arr = Self::with_capacity_in(self.len, self.allocator().clone());
        arr.extend_from_slice(self);
        arr
    }

    fn clone_from(&mut self, source: &Self) {
        self.clear();
        self.extend_from_slice(source);
    }
}

impl<T: Hash, A: Allocator, R: ReserveStrategy> Hash for DynArr<T, A, R> {
    #[inline]
    fn hash<H: Hasher>(&self, state: &mut H) {
        Hash::hash(&**self, state)
    }
}

impl<T, I: SliceIndex<[T]>, A: Allocator, R: ReserveStrategy> Index<I> for DynArr<T, A, R> {
    type Output = I::Output;

    #[inline]
    fn index(&self, index: I) -> &Self::Output {
        Index::index(&**self, index)
    }
}

impl<T, I: SliceIndex<[T]>, A: Allocator, R: ReserveStrategy> IndexMut<I> for DynArr<T, A, R> {
    #[inline]
    fn index_mut(&mut self, index: I) -> &mut Self::Output {
        IndexMut::index_mut(&mut **self, index)
    }
}

impl<T, A: Allocator + Default, R: ReserveStrategy> FromIterator<T> for DynArr<T, A, R> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from_iter_in(iter, A::default())
    }
}

impl<T, A: Allocator, R: ReserveStrategy> IntoIterator for DynArr<T, A, R> {
    type Item = T;
    type IntoIter = IntoIter<T, A, R>;

    /// Creates a consuming iterator, that is, one that moves each value out of the dynamic array (from start to end).
    /// The dynamic array cannot be used after calling this.
    fn into_iter(self) -> Self::IntoIter {
        let me = ManuallyDrop::new(self);
        // SAFETY: `me` is never dropped, so the buffer has exactly one owner afterwards.
        let buf = unsafe { ptr::read(&me.arr) };
        IntoIter::new(buf, me.len)
    }
}

impl<'a, T, A: Allocator, R: ReserveStrategy> IntoIterator for &'a DynArr<T, A, R> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T, A: Allocator, R: ReserveStrategy> IntoIterator for &'a mut DynArr<T, A, R> {
    type Item = &'a mut T;
    type IntoIter = slice::IterMut<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}

impl<T, A: Allocator, R: ReserveStrategy> Extend<T> for DynArr<T, A, R> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        self.extend_desugared(iter)
    }
}

impl<'a, T: Copy + 'a, A: Allocator, R: ReserveStrategy> Extend<&'a T> for DynArr<T, A, R> {
    fn extend<I: IntoIterator<Item = &'a T>>(&mut self, iter: I) {
        let iter = iter.into_iter();
        self.reserve(iter.size_hint().0);
        self.extend_desugared(iter.copied())
    }
}

impl_slice_partial_eq_generic!([A0: Allocator, A1: Allocator, R0: ReserveStrategy, R1: ReserveStrategy] DynArr<T, A0, R0>, DynArr<U, A1, R1>);
impl_slice_partial_eq_generic!([A: Allocator, R: ReserveStrategy] DynArr<T, A, R>, &[U]);
impl_slice_partial_eq_generic!([A: Allocator, R: ReserveStrategy] DynArr<T, A, R>, &mut [U]);
impl_slice_partial_eq_generic!([A: Allocator, R: ReserveStrategy] &[T], DynArr<U, A, R>);
impl_slice_partial_eq_generic!([A: Allocator, R: ReserveStrategy] &mut [T], DynArr<U, A, R>);
impl_slice_partial_eq_generic!([A: Allocator, R: ReserveStrategy] DynArr<T, A, R>, [U]);
impl_slice_partial_eq_generic!([A: Allocator, R: ReserveStrategy] [T], DynArr<U, A, R>);
impl_slice_partial_eq_generic!([A: Allocator, R: ReserveStrategy, const N: usize] DynArr<T, A, R>, [U; N]);
impl_slice_partial_eq_generic!([A: Allocator, R: ReserveStrategy, const N: usize] [T; N], DynArr<U, A, R>);

impl<T, A0, A1, R0, R1> PartialOrd<DynArr<T, A1, R1>> for DynArr<T, A0, R0> where
    T: PartialOrd,
    A0: Allocator,
    A1: Allocator,
    R0: ReserveStrategy,
    R1: ReserveStrategy,
{
    #[inline]
    fn partial_cmp(&self, other: &DynArr<T, A1, R1>) -> Option<core::cmp::Ordering> {
        PartialOrd::partial_cmp(&**self, &**other)
    }
}

impl<T: Eq, A: Allocator, R: ReserveStrategy> Eq for DynArr<T, A, R> {}

impl<T: Ord, A: Allocator, R: ReserveStrategy> Ord for DynArr<T, A, R> {
    #[inline]
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        Ord::cmp(&**self, &**other)
    }
}

impl<T, A: Allocator, R: ReserveStrategy> Drop for DynArr<T, A, R> {
    fn drop(&mut self) {
        // SAFETY: `[0, len)` is live, the buffer itself is released by `RawArray`
        unsafe { ptr::drop_in_place(ptr::slice_from_raw_parts_mut(self.as_mut_ptr(), self.len)) }
    }
}

impl<T, A: Allocator + Default, R: ReserveStrategy> Default for DynArr<T, A, R> {
    /// Creates an empty `DynArr<T, A, R>`.
    ///
    /// The dynamic array will not allocate until elements are pushed onto it.
    fn default() -> Self {
        Self::new_in(A::default())
    }
}

impl<T: fmt::Debug, A: Allocator, R: ReserveStrategy> fmt::Debug for DynArr<T, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

/// Renders the elements separated by a single space, e.g. `1 2 3`.
impl<T: fmt::Display, A: Allocator, R: ReserveStrategy> fmt::Display for DynArr<T, A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&SpaceSeparated(self.iter()), f)
    }
}

impl<T, A: Allocator, R: ReserveStrategy> AsRef<[T]> for DynArr<T, A, R> {
    fn as_ref(&self) -> &[T] {
        self
    }
}

impl<T, A: Allocator, R: ReserveStrategy> AsMut<[T]> for DynArr<T, A, R> {
    fn as_mut(&mut self) -> &mut [T] {
        self
    }
}

impl<T: Clone, A: Allocator + Default, R: ReserveStrategy> From<&[T]> for DynArr<T, A, R> {
    /// Allocate a `DynArr<T, A, R>` and fill it by cloning `s`'s items.
    fn from(s: &[T]) -> Self {
        let mut arr = Self::with_capacity_in(s.len(), A::default());
        arr.extend_from_slice(s);
        arr
    }
}

impl<T, A: Allocator + Default, R: ReserveStrategy, const N: usize> From<[T; N]> for DynArr<T, A, R> {
    /// Allocate a `DynArr<T, A, R>` and move `s`'s items into it.
    fn from(s: [T; N]) -> Self {
        let mut arr = Self::with_capacity_in(N, A::default());
        let s = ManuallyDrop::new(s);
        // SAFETY: the capacity is at least `N`, and ownership of the items moves into `arr`.
        unsafe {
            ptr::copy_nonoverlapping(s.as_ptr(), arr.as_mut_ptr(), N);
            arr.set_len(N);
        }
        arr
    }
}

impl<T, A: Allocator, R: ReserveStrategy, const N: usize> TryFrom<DynArr<T, A, R>> for [T; N] {
    type Error = DynArr<T, A, R>;

    /// Gets the entire contents of the `DynArr` as an array, if its size exactly matches that of the requested array.
    fn try_from(mut arr: DynArr<T, A, R>) -> Result<Self, Self::Error> {
        if arr.len() != N {
            return Err(arr);
        }

        // SAFETY: `.set_len(0)` is always sound
        unsafe { arr.set_len(0) };

        // SAFETY: The buffer is aligned for `T`, which is the alignment `[T; N]` needs.
        // The items will not double-drop as the `set_len` tells the `DynArr` not to also drop them.
        let array = unsafe { ptr::read(arr.as_ptr() as *const [T; N]) };
        Ok(array)
    }
}

/// Creates a [`DynArr`] containing the arguments.
///
/// `dynarr!` allows `DynArr`s to be defined with the same syntax as array expressions.
///
/// - Create a `DynArr` containing a given list of elements: `dynarr![1, 2, 3]`
/// - Create a `DynArr` from a given element and size: `dynarr![1; 3]`, `T` needs to implement `Clone`
#[macro_export]
macro_rules! dynarr {
    () => {
        $crate::collections::DynArr::new()
    };
    ($elem:expr; $n:expr) => {
        $crate::collections::from_elem($elem, $n)
    };
    ($($x:expr),+ $(,)?) => {
        <$crate::collections::DynArr<_>>::from([$($x),+])
    };
}
