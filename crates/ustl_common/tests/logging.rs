//! Logging from code that runs while a message is being formatted or written.
//!
//! Kept in its own test binary, the global logger is shared by every test in a binary.

use std::{
    fmt,
    io::{self, Write},
    sync::Arc,
};

use parking_lot::Mutex;
use ustl_common::collections::DynArr;
use ustl_logging::{log_info, LogCategory, LogLevel, Logger};

const CAT: LogCategory = LogCategory::new("Squares");

/// Displays as the sum of the first `n` squares, collecting them in a `DynArr` first.
struct Squares(u32);

impl fmt::Display for Squares {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut squares = DynArr::new();
        for i in 0..self.0 {
            squares.push(i * i);
        }
        write!(f, "{} squares summing to {}", squares.len(), squares.iter().sum::<u32>())
    }
}

/// Writer storing its output in a `DynArr`, so writing may grow it.
#[derive(Clone, Default)]
struct DynArrWriter(Arc<Mutex<DynArr<u8>>>);

impl Write for DynArrWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn log_values_that_grow_a_dynarr() {
    let logger: &'static Logger = Box::leak(Box::new(Logger::new()));
    logger.set_log_to_console(false);
    logger.set_max_level(LogLevel::Verbose);
    let out = DynArrWriter::default();
    assert!(logger.add_writer(Box::new(out.clone())).is_ok());
    ustl_logging::set_logger(logger);

    log_info!(CAT, "{}", Squares(20));
    logger.set_always_flush(true);
    log_info!(CAT, "{}", Squares(9));

    ustl_logging::clear_logger();

    let out = String::from_utf8(out.0.lock().to_vec()).unwrap();
    assert!(out.contains("[Squares]: 20 squares summing to 2470"), "{out}");
    assert!(out.contains("[Squares]: 9 squares summing to 204"), "{out}");
    assert!(out.contains("[Collections(DynArr)]: growing buffer of u32"), "{out}");

    // Growth logged while formatting lands before the message being formatted
    let growth = out.find("growing buffer of u32");
    let message = out.find("20 squares");
    assert!(growth < message, "{out}");
}
