//! Logging to the browser console
//!
//! The growth code logs through the `log` macros; in the browser those end
//! up here. Native builds (tests, tools) never install the logger, so the
//! macros stay no-ops there.

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::JsValue;

/// Console function a record is written with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConsoleMethod {
    Error,
    Warn,
    Info,
    Log,
    Debug,
}

impl From<Level> for ConsoleMethod {
    fn from(level: Level) -> Self {
        match level {
            Level::Error => ConsoleMethod::Error,
            Level::Warn => ConsoleMethod::Warn,
            Level::Info => ConsoleMethod::Info,
            Level::Debug => ConsoleMethod::Log,
            Level::Trace => ConsoleMethod::Debug,
        }
    }
}

/// `log::Log` backend writing through `web_sys::console`
pub struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format_record(record));
        match ConsoleMethod::from(record.level()) {
            ConsoleMethod::Error => web_sys::console::error_1(&line),
            ConsoleMethod::Warn => web_sys::console::warn_1(&line),
            ConsoleMethod::Info => web_sys::console::info_1(&line),
            ConsoleMethod::Log => web_sys::console::log_1(&line),
            ConsoleMethod::Debug => web_sys::console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

fn format_record(record: &Record) -> String {
    format!("[{} {}] {}", record.level(), record.target(), record.args())
}

/// Install the console logger at `info`
pub fn init() {
    init_with_level(LevelFilter::Info);
}

/// Install the console logger. Later calls only change the level.
pub fn init_with_level(level: LevelFilter) {
    // Already installed on a second call
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}
