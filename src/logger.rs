use std::io::{IsTerminal, Write};
use std::time::Instant;

use anstyle::{AnsiColor, Reset, Style};
use log::{Level, Log, Metadata, Record};
use parking_lot::Mutex;

struct TermdeckLogger {
    file: Option<Mutex<std::fs::File>>,
    filter: log::LevelFilter,
    color: bool,
    start: Instant,
}

impl Log for TermdeckLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.filter
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }

        let level = if self.color {
            let style = level_style(record.level());
            format!("{style}{}{Reset}", record.level())
        } else {
            record.level().to_string()
        };
        let _ = writeln!(std::io::stderr(), "[{level}] {}", record.args());

        // Also write to file if configured
        if let Some(ref file) = self.file {
            let elapsed = self.start.elapsed().as_secs_f64();
            let _ = writeln!(
                file.lock(),
                "[{elapsed:.3}s] [{}] {} - {}",
                record.level(),
                record.target(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        if let Some(ref file) = self.file {
            let _ = file.lock().flush();
        }
    }
}

/// Style of a log level tag on stderr
#[must_use]
pub fn level_style(level: Level) -> Style {
    let color = match level {
        Level::Error => AnsiColor::Red,
        Level::Warn => AnsiColor::Yellow,
        Level::Info => AnsiColor::Blue,
        Level::Debug | Level::Trace => AnsiColor::BrightBlack,
    };
    Style::new().fg_color(Some(anstyle::Color::Ansi(color)))
}

/// Initialize the global logger. Must be called once before any logging.
///
/// The level comes from `RUST_LOG` (e.g. `debug`) and defaults to `warn`.
///
/// # Panics
///
/// Panics if called more than once.
pub fn init(log_file: Option<std::fs::File>) {
    let filter = std::env::var("RUST_LOG")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(log::LevelFilter::Warn);

    let logger = TermdeckLogger {
        file: log_file.map(Mutex::new),
        filter,
        color: std::io::stderr().is_terminal(),
        start: Instant::now(),
    };

    log::set_boxed_logger(Box::new(logger)).expect("logger already initialized");
    log::set_max_level(filter);
}
