// SPDX-License-Identifier: MIT OR Apache-2.0
use super::Sink;
use crate::log_record::LogRecord;

/**
A reference sink that writes one line per record to stderr.

On wasm32 it writes to the browser console instead, picking the console
method that matches the record's level.
 */
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct StdErrorSink {}

impl StdErrorSink {
    pub const fn new() -> Self {
        Self {}
    }
}

impl Sink for StdErrorSink {
    fn finish_log_record(&self, record: LogRecord) {
        let line = super::render_line(&record);
        #[cfg(not(target_arch = "wasm32"))]
        {
            use std::io::Write;
            let mut lock = std::io::stderr().lock();
            // a closed stderr is not something the caller can act on
            let _ = lock.write_all(line.as_bytes());
            let _ = lock.write_all(b"\n");
        }
        #[cfg(target_arch = "wasm32")]
        {
            use crate::Level;
            match record.level() {
                Level::Trace => web_sys::console::trace_1(&line.into()),
                Level::Debug => web_sys::console::debug_1(&line.into()),
                Level::Info => web_sys::console::info_1(&line.into()),
                Level::Warn => web_sys::console::warn_1(&line.into()),
                Level::Error => web_sys::console::error_1(&line.into()),
            }
        }
    }

    fn prepare_to_die(&self) {
        #[cfg(not(target_arch = "wasm32"))]
        {
            use std::io::Write;
            let _ = std::io::stderr().flush();
        }
    }
}
