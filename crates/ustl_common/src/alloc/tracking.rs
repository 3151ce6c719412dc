use std::{
    alloc::Layout,
    ptr::NonNull,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    },
};

use crate::alloc::{Allocator, Mallocator};

/// Counters shared by every clone of a [`TrackingAllocator`].
#[derive(Debug)]
pub struct AllocStats {
    allocs:     AtomicUsize,
    deallocs:   AtomicUsize,
    failures:   AtomicUsize,
    live_bytes: AtomicUsize,
    budget:     AtomicUsize,
}

impl AllocStats {
    const UNLIMITED: usize = usize::MAX;

    pub const fn new() -> Self {
        Self {
            allocs: AtomicUsize::new(0),
            deallocs: AtomicUsize::new(0),
            failures: AtomicUsize::new(0),
            live_bytes: AtomicUsize::new(0),
            budget: AtomicUsize::new(Self::UNLIMITED),
        }
    }

    /// Number of successful allocations
    pub fn allocs(&self) -> usize {
        self.allocs.load(Ordering::Relaxed)
    }

    /// Number of deallocations
    pub fn deallocs(&self) -> usize {
        self.deallocs.load(Ordering::Relaxed)
    }

    /// Number of allocations that were refused, either by the budget or by the inner allocator
    pub fn failures(&self) -> usize {
        self.failures.load(Ordering::Relaxed)
    }

    /// Number of allocations that have not been deallocated yet
    pub fn live_allocs(&self) -> usize {
        self.allocs() - self.deallocs()
    }

    /// Bytes currently allocated
    pub fn live_bytes(&self) -> usize {
        self.live_bytes.load(Ordering::Relaxed)
    }

    /// Limit the number of live bytes, allocations that would exceed the limit fail.
    pub fn set_budget(&self, bytes: usize) {
        self.budget.store(bytes, Ordering::Relaxed);
    }

    /// Remove the live byte limit
    pub fn clear_budget(&self) {
        self.set_budget(Self::UNLIMITED);
    }

    fn fits_budget(&self, size: usize) -> bool {
        let budget = self.budget.load(Ordering::Relaxed);
        budget == Self::UNLIMITED || self.live_bytes().saturating_add(size) <= budget
    }
}

impl Default for AllocStats {
    fn default() -> Self {
        Self::new()
    }
}

/// Allocator wrapping another allocator and recording every allocation it passes on.
///
/// Clones share the same [`AllocStats`], so a cloned container reports into the same counters as the original.
#[derive(Clone, Debug)]
pub struct TrackingAllocator<A: Allocator = Mallocator> {
    inner: A,
    stats: Arc<AllocStats>,
}

impl<A: Allocator> TrackingAllocator<A> {
    pub fn new(inner: A) -> Self {
        Self { inner, stats: Arc::new(AllocStats::new()) }
    }

    /// Create a tracking allocator that refuses to keep more than `bytes` live bytes.
    pub fn with_budget(inner: A, bytes: usize) -> Self {
        let alloc = Self::new(inner);
        alloc.stats.set_budget(bytes);
        alloc
    }

    pub fn stats(&self) -> &Arc<AllocStats> {
        &self.stats
    }
}

impl Default for TrackingAllocator {
    fn default() -> Self {
        Self::new(Mallocator)
    }
}

impl<A: Allocator> Allocator for TrackingAllocator<A> {
    unsafe fn alloc(&mut self, layout: Layout) -> Option<NonNull<u8>> {
        if !self.stats.fits_budget(layout.size()) {
            self.stats.failures.fetch_add(1, Ordering::Relaxed);
            return None;
        }

        match self.inner.alloc(layout) {
            Some(ptr) => {
                self.stats.allocs.fetch_add(1, Ordering::Relaxed);
                self.stats.live_bytes.fetch_add(layout.size(), Ordering::Relaxed);
                Some(ptr)
            },
            None => {
                self.stats.failures.fetch_add(1, Ordering::Relaxed);
                None
            },
        }
    }

    unsafe fn dealloc(&mut self, ptr: NonNull<u8>, layout: Layout) {
        self.inner.dealloc(ptr, layout);
        self.stats.deallocs.fetch_add(1, Ordering::Relaxed);
        self.stats.live_bytes.fetch_sub(layout.size(), Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_allocations() {
        let mut alloc = TrackingAllocator::default();
        let layout = Layout::array::<u32>(4).unwrap();

        unsafe {
            let a = alloc.alloc(layout).unwrap();
            let b = alloc.clone().alloc(layout).unwrap();
            assert_eq!(alloc.stats().allocs(), 2);
            assert_eq!(alloc.stats().live_bytes(), 32);

            alloc.dealloc(a, layout);
            alloc.dealloc(b, layout);
        }
        assert_eq!(alloc.stats().deallocs(), 2);
        assert_eq!(alloc.stats().live_allocs(), 0);
        assert_eq!(alloc.stats().live_bytes(), 0);
    }

    #[test]
    fn budget_refuses_allocations() {
        let mut alloc = TrackingAllocator::with_budget(Mallocator, 16);

        unsafe {
            assert!(alloc.alloc(Layout::array::<u8>(32).unwrap()).is_none());
            assert_eq!(alloc.stats().failures(), 1);

            let layout = Layout::array::<u8>(16).unwrap();
            let ptr = alloc.alloc(layout).unwrap();
            assert!(alloc.alloc(Layout::new::<u8>()).is_none());

            alloc.stats().clear_budget();
            let extra = alloc.alloc(Layout::new::<u8>()).unwrap();

            alloc.dealloc(extra, Layout::new::<u8>());
            alloc.dealloc(ptr, layout);
        }
        assert_eq!(alloc.stats().failures(), 2);
    }
}
