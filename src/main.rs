use ustl::prelude::*;
use ustl::{
    algorithm::{count_if, minmax_of},
    common::fmt::SpaceSeparated,
    logging::set_logger,
};

pub const LOG_CAT : LogCategory = LogCategory::new("Main");

static LOGGER: Logger = Logger::new();

fn main() {
    LOGGER.set_max_level(LogLevel::Verbose);
    set_logger(&LOGGER);

    let mut arr = DynArr::new();
    for value in [3, 1, 4, 1, 5, 9, 2, 6] {
        arr.push(value);
    }
    log_info!(LOG_CAT, "input: {arr} (len {}, capacity {})", arr.len(), arr.capacity());

    sort(&mut arr);
    log_info!(LOG_CAT, "sorted: {arr}");

    match find_first_of(&arr, &[5, 6, 3]) {
        Some(idx) => log_info!(LOG_CAT, "first of [5 6 3] is {} at index {idx}", arr[idx]),
        None => log_warning!(LOG_CAT, "none of [5 6 3] found"),
    }

    arr.insert_iter(1, [9, 9]);
    log_info!(LOG_CAT, "after inserting 9 9 at 1: {arr}");

    let odd = count_if(&arr, |x| x % 2 == 1);
    if let Some((lo, hi)) = minmax_of(&arr) {
        log_info!(LOG_CAT, "{odd} odd values, smallest {lo}, largest {hi}");
    }

    let shuffled = dynarr![6, 2, 9, 5, 1, 4, 1, 3, 9, 9];
    log_info!(LOG_CAT, "{} is a permutation of {}: {}", SpaceSeparated(&shuffled), arr, is_permutation(&arr, &shuffled));

    match arr.at(arr.len()) {
        Ok(value) => log_info!(LOG_CAT, "unexpected value {value}"),
        Err(err) => log_error!(LOG_CAT, "{err}"),
    }

    ustl::logging::clear_logger();
}
