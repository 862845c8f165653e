//! Console output and the `log` backend.
//!
//! Everything goes to a single console sink, typically the debug UART or a
//! USB CDC port. Output is dropped until a sink is attached, and while the
//! sink is held elsewhere, so logging from a block handler never waits.

use alloc::boxed::Box;
use core::fmt::{self, Write};
use lazy_static::lazy_static;
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};
use spin::Mutex;

lazy_static! {
    pub static ref CONSOLE: Mutex<Option<Box<dyn Write + Send>>> = Mutex::new(None);
}

/// Replace the console sink.
pub fn attach(console: Box<dyn Write + Send>) {
    *CONSOLE.lock() = Some(console);
}

#[doc(hidden)]
pub fn _print(args: fmt::Arguments) {
    if let Some(mut guard) = CONSOLE.try_lock() {
        if let Some(console) = guard.as_mut() {
            let _ = console.write_fmt(args);
        }
    }
}

/// Prints to the console.
#[macro_export]
macro_rules! console_print {
    ($($arg:tt)*) => {
        $crate::logger::_print(format_args!($($arg)*))
    };
}

/// Prints to the console, appending a newline.
#[macro_export]
macro_rules! console_println {
    () => ($crate::console_print!("\n"));
    ($fmt:expr) => ($crate::console_print!(concat!($fmt, "\n")));
    ($fmt:expr, $($arg:tt)*) => ($crate::console_print!(concat!($fmt, "\n"), $($arg)*));
}

struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            _print(format_args!(
                "[{:<5}] {}: {}\n",
                record.level(),
                record.target(),
                record.args()
            ));
        }
    }

    fn flush(&self) {}
}

static LOGGER: ConsoleLogger = ConsoleLogger;

/// Attach `console` and route `log` records to it.
///
/// Fails if another logger is already installed; the console is attached
/// either way.
pub fn init(console: Box<dyn Write + Send>, level: LevelFilter) -> Result<(), SetLoggerError> {
    attach(console);
    log::set_logger(&LOGGER)?;
    log::set_max_level(level);
    Ok(())
}
