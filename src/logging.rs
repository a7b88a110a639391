//! Console Logger
//!
//! `log` backend for the browser: each record goes to the matching
//! `console.*` method, tagged with the emitting module, e.g. `[SESSION] ...`.

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::JsValue;
use web_sys::console;

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = JsValue::from_str(&format!("[{}] {}", tag(record.target()), record.args()));
        match record.level() {
            Level::Error => console::error_1(&line),
            Level::Warn => console::warn_1(&line),
            Level::Info => console::info_1(&line),
            Level::Debug | Level::Trace => console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

/// Last path segment of the target, upper-cased: `todo_sync::sync::session` -> `SESSION`
fn tag(target: &str) -> String {
    target.rsplit("::").next().unwrap_or(target).to_uppercase()
}

/// Install the logger. Safe to call more than once.
pub fn init(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

pub fn set_level(level: LevelFilter) {
    log::set_max_level(level);
}
