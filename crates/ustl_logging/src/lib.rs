//! Categorized, leveled logging shared by the ustl crates.
//!
//! A [`Logger`] is installed globally with [`set_logger`]. Until one is installed, the `log_*!` macros do nothing,
//! so library code can log unconditionally without forcing a logger onto its users.

use core::{
    fmt::{Arguments, Display},
    sync::atomic::{self, AtomicU8},
    time::Duration,
};
use std::{
    cell::{Cell, RefCell},
    fmt::Write as _,
    io::{self, Write},
    time::Instant,
};

use once_cell::sync::Lazy;
use parking_lot::{Mutex, RwLock};

static LOGGER: RwLock<Option<&'static Logger>> = parking_lot::const_rwlock(None);

static START_TIME: Lazy<Instant> = Lazy::new(Instant::now);

/// Install the global logger.
pub fn set_logger(logger: &'static Logger) {
    // Make sure the clock starts no later than the first logger
    Lazy::force(&START_TIME);
    *LOGGER.write() = Some(logger);
}

/// Remove the global logger, flushing it first.
pub fn clear_logger() {
    let logger = LOGGER.write().take();
    if let Some(logger) = logger {
        logger.flush();
    }
}

/// Get the global logger, if one was installed.
pub fn get_logger() -> Option<&'static Logger> {
    *LOGGER.read()
}

/// Time elapsed since the logging clock started.
pub fn elapsed() -> Duration {
    START_TIME.elapsed()
}

/// Logging level
#[repr(u8)]
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub enum LogLevel {
    /// Severe error: will probably result in a crash
    Severe,
    /// Error: may not result in a crash
    Error,
    /// Warning: While not as bad as an error, it may point to something like a performance regression
    Warning,
    /// General info
    Info,
    /// Verbose info
    Verbose,
    /// Debug info (includes verbose info)
    Debug,
}

cfg_if::cfg_if! {
    if #[cfg(debug_assertions)] {
        /// Level used when no explicit maximum was set.
        pub const DEFAULT_MAX_LEVEL: LogLevel = LogLevel::Debug;
    } else {
        /// Level used when no explicit maximum was set.
        pub const DEFAULT_MAX_LEVEL: LogLevel = LogLevel::Info;
    }
}

impl LogLevel {
    const fn from_u8(val: u8) -> Self {
        match val {
            0 => LogLevel::Severe,
            1 => LogLevel::Error,
            2 => LogLevel::Warning,
            3 => LogLevel::Info,
            4 => LogLevel::Verbose,
            _ => LogLevel::Debug,
        }
    }
}

impl Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Severe  => f.write_str("[SEVERE ]"),
            LogLevel::Error   => f.write_str("[ERROR  ]"),
            LogLevel::Warning => f.write_str("[WARNING]"),
            LogLevel::Info    => f.write_str("[INFO   ]"),
            LogLevel::Verbose => f.write_str("[VERBOSE]"),
            LogLevel::Debug   => f.write_str("[DEBUG  ]"),
        }
    }
}

/// Log category
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LogCategory {
    category     : &'static str,
    sub_category : Option<&'static str>
}

impl LogCategory {
    pub const fn new(name: &'static str) -> Self {
        Self { category: name, sub_category: None }
    }

    pub const fn new_with_sub(name: &'static str, sub_name: &'static str) -> Self {
        Self { category: name, sub_category: Some(sub_name) }
    }
}

impl Display for LogCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.sub_category {
            Some(sub) => write!(f, "{}({sub})", self.category),
            None => f.write_str(self.category),
        }
    }
}

/// Additional info about where the log occurred
pub struct LogLocation {
    file   : &'static str,
    line   : u32,
    module : &'static str,
    time   : Duration,
}

impl LogLocation {
    /// Creates a new log location
    pub const fn new(file: &'static str, line: u32, module: &'static str, time: Duration) -> Self {
        Self { file, line, module, time }
    }

    /// Get the file name where the log occurred
    pub const fn file(&self) -> &str {
        self.file
    }

    /// Get the line where the log occurred
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Get the module path where the log occurred
    pub const fn module(&self) -> &str {
        self.module
    }

    /// Get the time since the logging clock started
    pub const fn timestamp(&self) -> Duration {
        self.time
    }
}

struct LogLocationFormatter<'a> {
    loc   : &'a LogLocation,
    level : LogLevel
}

impl<'a> LogLocationFormatter<'a> {
    fn new(loc: &'a LogLocation, level: LogLevel) -> Self {
        Self { loc, level }
    }
}

impl Display for LogLocationFormatter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.level {
            LogLevel::Severe |
            LogLevel::Error |
            LogLevel::Debug => write!(f, " ({}:{}: {})", self.loc.file(), self.loc.line(), self.loc.module()),
            LogLevel::Warning |
            LogLevel::Info |
            LogLevel::Verbose => Ok(()),
        }
    }
}

#[macro_export]
macro_rules! log_location {
    () => {
        $crate::LogLocation::new(file!(), line!(), module_path!(), $crate::elapsed())
    };
}

type BoxedWriter = Box<dyn Write + Send>;

pub struct LoggerState {
    cache:          String,
    always_flush:   bool,
    log_to_console: bool,
}

impl LoggerState {
    const MAX_WRITERS: usize = 8;
    const CACHE_FLUSH_LIMIT: usize = 4 * 1024;

    pub const fn new() -> Self {
        Self {
            cache: String::new(),
            always_flush: false,
            log_to_console: true,
        }
    }

    /// Append a message, returns whether the cache should be flushed.
    fn write_message(&mut self, message: &str) -> bool {
        if self.cache.capacity() == 0 {
            self.cache.reserve(Self::CACHE_FLUSH_LIMIT);
        }
        self.cache.push_str(message);
        self.always_flush || self.cache.len() > Self::CACHE_FLUSH_LIMIT
    }

    fn take_cache(&mut self) -> String {
        core::mem::take(&mut self.cache)
    }
}

impl Default for LoggerState {
    fn default() -> Self {
        Self::new()
    }
}

/// Logger
///
/// Supports up to 8 writers, e.g. terminal, file, external tool, etc
///
/// Writers are called without the cache locked, so a writer (or a value being formatted) may log again.
/// Messages logged from inside a writer stay cached until the next flush.
pub struct Logger {
    state:         Mutex<LoggerState>,
    writers:       Mutex<[Option<BoxedWriter>; LoggerState::MAX_WRITERS]>,
    max_log_level: AtomicU8,
}

thread_local! {
    static FORMAT_CACHE: RefCell<String> = const { RefCell::new(String::new()) };
    /// Set while this thread is handing cached messages to the writers.
    static IN_WRITERS: Cell<bool> = const { Cell::new(false) };
}

struct InWritersGuard;

impl InWritersGuard {
    fn enter() -> Self {
        IN_WRITERS.set(true);
        Self
    }
}

impl Drop for InWritersGuard {
    fn drop(&mut self) {
        IN_WRITERS.set(false);
    }
}

impl Logger {
    pub const fn new() -> Self {
        // `Option<Box<dyn Write>>` is not `Copy`, so the array is spelled out
        let writers = [
            None,
            None,
            None,
            None,
            None,
            None,
            None,
            None,
        ];

        Self {
            state: parking_lot::const_mutex(LoggerState::new()),
            writers: parking_lot::const_mutex(writers),
            max_log_level: AtomicU8::new(DEFAULT_MAX_LEVEL as u8),
        }
    }

    /// Set the maximum log level (severe == lowest, debug == highest)
    pub fn set_max_level(&self, level: LogLevel) {
        self.max_log_level.store(level as u8, atomic::Ordering::Relaxed)
    }

    /// Get the maximum log level
    pub fn max_level(&self) -> LogLevel {
        LogLevel::from_u8(self.max_log_level.load(atomic::Ordering::Relaxed))
    }

    /// Check if a message with the given level would be written
    pub fn enabled(&self, level: LogLevel) -> bool {
        level as u8 <= self.max_log_level.load(atomic::Ordering::Relaxed)
    }

    /// Set whether the logger should flush after each write
    pub fn set_always_flush(&self, always_flush: bool) {
        self.state.lock().always_flush = always_flush;
    }

    /// Set whether the logger should log it's output to console
    pub fn set_log_to_console(&self, log_to_console: bool) {
        // Messages cached so far were logged under the old setting
        self.flush();
        self.state.lock().log_to_console = log_to_console;
    }

    /// Add a writer.
    ///
    /// Returns `Ok(index)` if space was available. This index can be used to remove the writer later on.
    ///
    /// Otherwise returns an `Err` with the provided writer
    pub fn add_writer(&self, writer: BoxedWriter) -> Result<usize, BoxedWriter> {
        let mut writers = self.writers.lock();

        let empty = writers.iter_mut().enumerate().find(|(_, slot)| slot.is_none());
        match empty {
            Some((id, slot)) => {
                *slot = Some(writer);
                Ok(id)
            },
            None => Err(writer),
        }
    }

    /// Remove a writer from the logger
    pub fn remove_writer(&self, index: usize) -> Option<BoxedWriter> {
        self.flush();
        self.writers.lock().get_mut(index).and_then(Option::take)
    }

    /// Log a plain message
    pub fn log(&self, category: LogCategory, level: LogLevel, loc: LogLocation, text: &str) {
        self.log_fmt(category, level, loc, format_args!("{text}"));
    }

    /// Log a formatted message
    pub fn log_fmt(&self, category: LogCategory, level: LogLevel, loc: LogLocation, format: Arguments) {
        if !self.enabled(level) {
            return;
        }

        // Format outside of the lock, so other threads only wait on the copy into the cache.
        // Formatting may log again on this thread, the nested message then gets its own buffer.
        FORMAT_CACHE.with(|cache| match cache.try_borrow_mut() {
            Ok(mut line) => {
                line.clear();
                Self::format_line(&mut line, category, level, &loc, format);
                self.write_line(&line);
            },
            Err(_) => {
                let mut line = String::new();
                Self::format_line(&mut line, category, level, &loc, format);
                self.write_line(&line);
            },
        });
    }

    fn format_line(line: &mut String, category: LogCategory, level: LogLevel, loc: &LogLocation, format: Arguments) {
        let loc_formatter = LogLocationFormatter::new(loc, level);
        let timestamp = loc.timestamp().as_secs_f64();
        let _ = writeln!(line, "[{timestamp:>12.6}] {level} [{category}]{loc_formatter}: {format}");
    }

    fn write_line(&self, line: &str) {
        let needs_flush = self.state.lock().write_message(line);
        if needs_flush {
            self.flush();
        }
    }

    /// Hand all cached messages to the console and the writers.
    ///
    /// Does nothing when called from inside a writer, the messages are written by the next flush instead.
    pub fn flush(&self) {
        if IN_WRITERS.get() {
            return;
        }

        let mut writers = self.writers.lock();
        let (text, log_to_console) = {
            let mut state = self.state.lock();
            (state.take_cache(), state.log_to_console)
        };
        if text.is_empty() {
            return;
        }

        let _in_writers = InWritersGuard::enter();
        if log_to_console {
            let mut stdout = io::stdout().lock();
            let _ = stdout.write_all(text.as_bytes());
            let _ = stdout.flush();
        }

        for writer in writers.iter_mut().flatten() {
            let _ = writer.write_all(text.as_bytes());
            let _ = writer.flush();
        }
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.flush();
    }
}

#[macro_export]
macro_rules! log {
    ($category:expr, $level:expr, $($arg:tt)+) => {
        if let Some(logger) = $crate::get_logger() {
            logger.log_fmt($category, $level, $crate::log_location!(), format_args!($($arg)+));
        }
    };
}

#[macro_export]
macro_rules! log_severe {
    ($category:expr, $($arg:tt)+) => {
        $crate::log!($category, $crate::LogLevel::Severe, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_error {
    ($category:expr, $($arg:tt)+) => {
        $crate::log!($category, $crate::LogLevel::Error, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_warning {
    ($category:expr, $($arg:tt)+) => {
        $crate::log!($category, $crate::LogLevel::Warning, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_info {
    ($category:expr, $($arg:tt)+) => {
        $crate::log!($category, $crate::LogLevel::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_verbose {
    ($category:expr, $($arg:tt)+) => {
        $crate::log!($category, $crate::LogLevel::Verbose, $($arg)+)
    };
}

#[macro_export]
macro_rules! log_debug {
    ($category:expr, $($arg:tt)+) => {
        $crate::log!($category, $crate::LogLevel::Debug, $($arg)+)
    };
}
