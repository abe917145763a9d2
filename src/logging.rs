//! Console logger
//!
//! Routes `log` records to the browser console. Only the wasm start hook and
//! the `PageHighlighter` constructor install it; native builds keep the
//! default no-op logger.

use log::{Level, LevelFilter, Log, Metadata, Record};

static LOGGER: ConsoleLogger = ConsoleLogger;

pub struct ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = wasm_bindgen::JsValue::from_str(&format_record(record));
        match record.level() {
            Level::Error => web_sys::console::error_1(&line),
            Level::Warn => web_sys::console::warn_1(&line),
            Level::Info => web_sys::console::info_1(&line),
            Level::Debug | Level::Trace => web_sys::console::debug_1(&line),
        }
    }

    fn flush(&self) {}
}

fn format_record(record: &Record) -> String {
    format!("[findcore] {}", record.args())
}

/// Install the console logger once and set the level filter.
///
/// Later calls only adjust the level.
pub fn init(level: LevelFilter) {
    // set_logger fails when a logger is already installed; the level still applies.
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(level);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_record_prefix() {
        let line = format_record(
            &Record::builder()
                .args(format_args!("{} markers", 3))
                .level(Level::Debug)
                .build(),
        );
        assert_eq!(line, "[findcore] 3 markers");
    }
}
