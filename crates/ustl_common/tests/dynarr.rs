use std::{
    io::{self, Write},
    sync::Arc,
};

use parking_lot::Mutex;
use ustl_common::{
    alloc::{Mallocator, TrackingAllocator},
    collections::{DynArr, Pow2ReserveStrategy, TryReserveError},
    dynarr,
};
use ustl_logging::{LogLevel, Logger};

#[derive(Clone, Default)]
struct SharedBuf(Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuf {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn range_round_trip() {
    let arr: DynArr<_> = (0..100).collect();
    assert_eq!(arr.len(), 100);
    assert!(arr.iter().copied().eq(0..100));
    assert!(arr.into_iter().eq(0..100));
}

#[test]
fn push_keeps_earlier_values() {
    let mut arr = DynArr::new();
    for i in 0..50u32 {
        let len = arr.len();
        arr.push(i * 3);
        assert_eq!(arr.len(), len + 1);
        assert!(arr.iter().copied().eq((0..=i).map(|x| x * 3)));
    }
}

#[test]
fn reserve_never_shrinks_or_changes_values() {
    let mut arr = dynarr![4, 8, 15, 16, 23, 42];
    let mut cap = arr.capacity();
    for n in [0, 3, 1, 40, 10, 100] {
        arr.reserve_total(n);
        assert!(arr.capacity() >= cap);
        assert!(arr.capacity() >= n);
        cap = arr.capacity();
        assert_eq!(arr, [4, 8, 15, 16, 23, 42]);
    }
}

#[test]
fn insert_run_in_the_middle() {
    let mut arr = dynarr![1, 2, 3];
    arr.insert_iter(1, [9, 9]);
    assert_eq!(arr, [1, 9, 9, 2, 3]);
    assert_eq!(arr.to_string(), "1 9 9 2 3");
}

#[test]
fn pow2_strategy_rounds_capacity() {
    let mut arr: DynArr<u8, Mallocator, Pow2ReserveStrategy> = DynArr::new_in(Mallocator);
    arr.extend(0..5);
    assert_eq!(arr.capacity(), 8);
    arr.extend(5..9);
    assert_eq!(arr.capacity(), 16);
}

#[test]
fn every_allocation_is_released() {
    let alloc = TrackingAllocator::default();
    let stats = alloc.stats().clone();
    {
        let mut arr: DynArr<String, _> = DynArr::new_in(alloc);
        for i in 0..100 {
            arr.push(i.to_string());
        }
        arr.shrink_to(10);
        arr.remove_range(10..);
        arr.shrink_to_fit();
        let other = arr.split_off(5);
        assert_eq!(other.len(), 5);
    }
    assert_eq!(stats.live_allocs(), 0);
    assert_eq!(stats.live_bytes(), 0);
    assert_eq!(stats.allocs(), stats.deallocs());
}

#[test]
fn reallocations_are_logged() {
    let logger: &'static Logger = Box::leak(Box::new(Logger::new()));
    logger.set_log_to_console(false);
    logger.set_max_level(LogLevel::Verbose);
    let buf = SharedBuf::default();
    assert!(logger.add_writer(Box::new(buf.clone())).is_ok());
    ustl_logging::set_logger(logger);

    let mut arr = DynArr::<u32>::with_capacity(8);
    arr.extend(0..8);
    arr.push(8);

    let mut budgeted: DynArr<u64, _> = DynArr::new_in(TrackingAllocator::with_budget(Mallocator, 8));
    assert!(matches!(budgeted.try_reserve_exact(2), Err(TryReserveError::AllocError(_))));

    ustl_logging::clear_logger();

    let out = String::from_utf8(buf.0.lock().clone()).unwrap();
    assert!(out.contains("[Collections(DynArr)]: growing buffer of u32 from 8 to 16 elements"), "{out}");
    assert!(out.contains("[ERROR  ]"), "{out}");
    assert!(out.contains("failed to allocate 16 bytes for a buffer of u64"), "{out}");
}
