use std::env;

use log::{self, LevelFilter, Metadata, Record};

/// Writes to stderr so log lines never interleave with the game's console
/// output on stdout.
struct StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("{} [{}] {}", record.level(), record.target(), record.args());
        }
    }

    fn flush(&self) {}
}

static LOGGER: StderrLogger = StderrLogger;

/// Parse a level name such as `debug` or `off`, falling back to `info`.
pub fn level_from(value: Option<&str>) -> LevelFilter {
    value
        .and_then(|lvl| lvl.trim().parse().ok())
        .unwrap_or(LevelFilter::Info)
}

/// Install the logger with the level from the `BATTLESHIP_LOG` environment
/// variable. Calling it again is harmless.
pub fn init_logging() {
    let level = level_from(env::var("BATTLESHIP_LOG").ok().as_deref());
    let _ = log::set_logger(&LOGGER).map(|()| log::set_max_level(level));
}
