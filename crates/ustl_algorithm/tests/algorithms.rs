use std::{
    io::{self, Write},
    sync::Arc,
};

use parking_lot::Mutex;
use ustl_algorithm::*;
use ustl_common::{
    alloc::{Mallocator, TrackingAllocator},
    collections::{DynArr, TryReserveError},
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
fn sort_dynarr() {
    let mut arr = dynarr![3, 1, 4, 1, 5, 9, 2, 6];
    sort(&mut arr);
    assert_eq!(arr, [1, 1, 2, 3, 4, 5, 6, 9]);
    assert!(is_sorted(&arr));
    assert_eq!(arr.to_string(), "1 1 2 3 4 5 6 9");
}

#[test]
fn sort_matches_slice_sort() {
    let mut arr: DynArr<i64> = (0..500).map(|i: i64| (i * 7919) % 503 - 250).collect();
    let mut expected = arr.clone();
    expected.sort();
    stable_sort(&mut arr);
    assert_eq!(arr, expected);
    assert_eq!(is_sorted_until(&arr), arr.len());

    sort(&mut arr);
    assert_eq!(arr, expected);
}

#[test]
fn sort_then_search() {
    let mut arr = dynarr!["delta", "alpha", "charlie", "bravo"];
    sort(&mut arr);
    assert_eq!(find(&arr, &"charlie"), Some(2));
    assert_eq!(search(&arr, &["bravo", "charlie"]), Some(1));
    assert_eq!(adjacent_find_by(&arr, |a, b| a.len() == b.len()), Some(0));
}

#[test]
fn find_first_of_in_order() {
    assert_eq!(find_first_of(&[1, 2, 3, 4], &[5, 6, 3]), Some(2));
    assert_eq!(find_first_of(&[1, 2, 3, 4], &[5, 6]), None);
}

#[test]
fn permutation_checks() {
    assert!(is_permutation(&[1, 2, 2, 3], &[3, 1, 2, 2]));
    assert!(!is_permutation(&[1, 2, 3], &[1, 2, 3, 3]));

    let a = dynarr![String::from("x"), String::from("y")];
    let b = dynarr![String::from("y"), String::from("x")];
    assert!(is_permutation(&a, &b));
    assert!(is_permutation_by(&a, &b, |x, y| x == y));
}

#[test]
fn merge_is_sorted_permutation_of_inputs() {
    let mut a: DynArr<u32> = (0..40).map(|i| i * 3 % 17).collect();
    let mut b: DynArr<u32> = (0..25).map(|i| i * 5 % 11).collect();
    sort(&mut a);
    sort(&mut b);

    let mut out = dynarr![0; a.len() + b.len()];
    assert_eq!(merge(a.iter().copied(), b.iter().copied(), &mut out), 65);
    assert!(is_sorted(&out));

    let mut joined = a.clone();
    joined.extend_from_slice(&b);
    assert!(is_permutation(&out, &joined));

    let mut extended: DynArr<u32> = DynArr::new();
    merge_extend(a, b, &mut extended);
    assert_eq!(extended, out);
}

#[test]
fn stable_sort_keeps_insertion_order() {
    let mut people = dynarr![("ann", 31), ("bob", 25), ("cid", 31), ("dee", 25), ("eve", 40)];
    stable_sort_by(&mut people, |a, b| a.1.cmp(&b.1));
    let names: DynArr<_> = people.iter().map(|p| p.0).collect();
    assert_eq!(names, ["bob", "dee", "ann", "cid", "eve"]);
}

#[test]
fn empty_inputs() {
    let empty: DynArr<i32> = DynArr::new();
    assert!(all_of(&empty, |_| false));
    assert!(!any_of(&empty, |_| true));
    assert_eq!(count(&empty, &0), 0);
    assert_eq!(min_of(&empty), None);
    assert_eq!(minmax_element(&empty), None);
    assert_eq!(search(&empty, &empty), Some(0));
    assert_eq!(find_end(&empty, &empty), None);
    assert!(equal(&empty, &empty));

    let mut empty = empty;
    sort(&mut empty);
    assert!(try_sort(&mut empty).is_ok());
    assert!(empty.is_empty());
}

#[test]
fn minmax_over_dynarr() {
    let arr = dynarr![6, -2, 9, -2, 9, 0];
    assert_eq!(minmax_of(&arr), Some((&-2, &9)));
    assert_eq!(minmax_element(&arr), Some((1, 2)));
    assert_eq!(max_of(arr.iter().map(|x| x * x)), Some(81));
}

#[test]
fn failed_sort_buffer_leaves_slice_and_is_logged() {
    let logger: &'static Logger = Box::leak(Box::new(Logger::new()));
    logger.set_log_to_console(false);
    logger.set_max_level(LogLevel::Verbose);
    let buf = SharedBuf::default();
    assert!(logger.add_writer(Box::new(buf.clone())).is_ok());
    ustl_logging::set_logger(logger);

    let mut arr: DynArr<u64> = (0..32).rev().collect();
    let alloc = TrackingAllocator::with_budget(Mallocator, 64);
    let stats = alloc.stats().clone();
    let res = try_sort_by_in(&mut arr, |a, b| a.cmp(b), alloc);

    ustl_logging::clear_logger();

    assert!(matches!(res, Err(TryReserveError::AllocError(_))));
    assert!(arr.iter().copied().eq((0..32).rev()));
    assert_eq!(stats.failures(), 1);
    assert_eq!(stats.live_bytes(), 0);

    let out = String::from_utf8(buf.0.lock().clone()).unwrap();
    assert!(out.contains("[Algorithm]"), "{out}");
    assert!(out.contains("failed to allocate a sort buffer for 32 elements: memory allocation of 256 bytes"), "{out}");
}

#[test]
fn sort_with_budget_that_fits() {
    let mut arr: DynArr<u64> = (0..32).rev().collect();
    let alloc = TrackingAllocator::with_budget(Mallocator, 256);
    let stats = alloc.stats().clone();
    assert!(try_sort_by_in(&mut arr, |a, b| a.cmp(b), alloc).is_ok());
    assert!(arr.iter().copied().eq(0..32));
    assert_eq!(stats.allocs(), 1);
    assert_eq!(stats.live_bytes(), 0);
}
