use std::{
    alloc::{GlobalAlloc, Layout},
    ptr::NonNull,
};

use crate::alloc::Allocator;

cfg_if::cfg_if! {
    if #[cfg(feature = "mimalloc")] {
        static BACKEND: mimalloc::MiMalloc = mimalloc::MiMalloc;
    } else {
        static BACKEND: std::alloc::System = std::alloc::System;
    }
}

/// Allocator calling directly into the system allocator
///
/// With the `mimalloc` feature (enabled by default) memory comes from mimalloc, otherwise from [`std::alloc::System`].
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct Mallocator;

impl Allocator for Mallocator {
    unsafe fn alloc(&mut self, layout: Layout) -> Option<NonNull<u8>> {
        NonNull::new(BACKEND.alloc(layout))
    }

    unsafe fn dealloc(&mut self, ptr: NonNull<u8>, layout: Layout) {
        BACKEND.dealloc(ptr.as_ptr(), layout);
    }
}

#[cfg(test)]
mod test {
    use std::alloc::Layout;

    use crate::alloc::*;
    use super::Mallocator;

    #[test]
    fn alloc_dealloc() {
        let mut alloc = Mallocator;
        let layout = Layout::new::<u64>();

        unsafe {
            let ptr = alloc.alloc(layout).unwrap();
            ptr.cast::<u64>().as_ptr().write(0xDEAD_BEEF);
            assert_eq!(ptr.cast::<u64>().as_ptr().read(), 0xDEAD_BEEF);
            alloc.dealloc(ptr, layout);
        }
    }

    #[test]
    fn respects_alignment() {
        let mut alloc = Mallocator;
        let layout = Layout::from_size_align(24, 64).unwrap();

        unsafe {
            let ptr = alloc.alloc(layout).unwrap();
            assert_eq!(ptr.as_ptr() as usize % 64, 0);
            alloc.dealloc(ptr, layout);
        }
    }
}
