#![deny(missing_docs)]
//! `draft_*` logging macros shared by every replydraft crate.
//!
//! The macros forward to the `log` facade, so libraries stay agnostic of the
//! backend; the binary decides where records go.

use log::LevelFilter;

/// Trace-level record.
#[macro_export]
macro_rules! draft_trace {
    ($($arg:tt)*) => {{
        log::trace!($($arg)*);
    }};
}

/// Debug-level record, e.g. per-request details.
#[macro_export]
macro_rules! draft_debug {
    ($($arg:tt)*) => {{
        log::debug!($($arg)*);
    }};
}

/// Info-level record for lifecycle events such as batch start and finish.
#[macro_export]
macro_rules! draft_info {
    ($($arg:tt)*) => {{
        log::info!($($arg)*);
    }};
}

/// Warn-level record for failed generations.
#[macro_export]
macro_rules! draft_warn {
    ($($arg:tt)*) => {{
        log::warn!($($arg)*);
    }};
}

/// Error-level record.
#[macro_export]
macro_rules! draft_error {
    ($($arg:tt)*) => {{
        log::error!($($arg)*);
    }};
}

/// Level used when nothing more verbose is asked for: debug in debug builds,
/// info otherwise.
pub fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    }
}

/// Routes records through `simplelog::TestLogger`, whose output the test
/// harness captures per test. Later calls are ignored.
pub fn initialize_for_tests() {
    let _ = simplelog::TestLogger::init(default_level(), simplelog::Config::default());
}
