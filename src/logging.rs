//! Minimal stderr backend for the `log` facade.
//!
//! The library itself only emits through `log`; binaries call [`init`] once so
//! warnings about malformed configs or missing layouts reach the terminal.

use log::{LevelFilter, Log, Metadata, Record};
use std::env;
use std::io::Write;

/// Environment variable holding the level filter (`error`, `warn`, `info`, ...).
pub const LOG_ENV: &str = "STYLEGUIDE_LOG";

struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(
            stderr,
            "[{} {}] {}",
            record.level(),
            record.target(),
            record.args()
        );
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

/// Install the stderr logger at the level named by `STYLEGUIDE_LOG`.
///
/// Calling this more than once, or after another logger is installed, is a
/// no-op.
pub fn init() {
    init_with_level(level_from_env());
}

pub fn init_with_level(level: LevelFilter) {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

pub fn level_from_env() -> LevelFilter {
    parse_level(env::var(LOG_ENV).ok().as_deref())
}

/// Parse a level name, defaulting to `warn` when absent or unrecognized.
pub fn parse_level(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|raw| raw.trim().parse::<LevelFilter>().ok())
        .unwrap_or(LevelFilter::Warn)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_names_parse_case_insensitively() {
        assert_eq!(parse_level(Some("debug")), LevelFilter::Debug);
        assert_eq!(parse_level(Some(" INFO ")), LevelFilter::Info);
        assert_eq!(parse_level(Some("off")), LevelFilter::Off);
    }

    #[test]
    fn unknown_or_missing_levels_default_to_warn() {
        assert_eq!(parse_level(None), LevelFilter::Warn);
        assert_eq!(parse_level(Some("chatty")), LevelFilter::Warn);
    }
}
