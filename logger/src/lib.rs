// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! A small `log` backend which writes timestamped lines to stdout.
//!
//! ```no_run
//! use logger::{info, Level, Logger};
//!
//! Logger::new()
//!     .label("demo")
//!     .level(Level::Debug)
//!     .init()
//!     .expect("Failed to initialize logger");
//! info!("Just some general info");
//! ```

pub use log::{debug, error, info, trace, warn, Level, SetLoggerError};

use chrono::{DateTime, Local};
use log::{Log, Metadata, Record};

/// Log at error level and terminate the process with a non-zero status.
#[macro_export]
macro_rules! fatal {
    ($($arg:tt)+) => {{
        $crate::error!($($arg)+);
        ::std::process::exit(1)
    }};
}

pub struct Logger {
    label: Option<&'static str>,
    level: Level,
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Logger {
    pub fn new() -> Self {
        Self {
            label: None,
            level: Level::Info,
        }
    }

    /// Name shown in place of the module path for messages at info and
    /// above. Debug and trace messages always show the module path.
    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    pub fn level(mut self, level: Level) -> Self {
        self.level = level;
        self
    }

    /// Install as the global logger. Fails if one was already set.
    pub fn init(self) -> Result<(), SetLoggerError> {
        let filter = self.level.to_level_filter();
        log::set_boxed_logger(Box::new(self))?;
        log::set_max_level(filter);
        Ok(())
    }

    fn target<'a>(&self, record: &'a Record) -> &'a str {
        match self.label {
            Some(label) if record.level() < Level::Debug => label,
            _ => record.target(),
        }
    }

    fn format(&self, now: DateTime<Local>, record: &Record) -> String {
        format!(
            "{} {:<5} [{}] {}",
            now.format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            self.target(record),
            record.args()
        )
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            println!("{}", self.format(Local::now(), record));
        }
    }

    fn flush(&self) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn metadata(level: Level) -> Metadata<'static> {
        Metadata::builder().level(level).target("bench").build()
    }

    #[test]
    fn filters_by_level() {
        let logger = Logger::new().level(Level::Info);
        assert!(logger.enabled(&metadata(Level::Error)));
        assert!(logger.enabled(&metadata(Level::Info)));
        assert!(!logger.enabled(&metadata(Level::Debug)));

        let logger = Logger::new().level(Level::Trace);
        assert!(logger.enabled(&metadata(Level::Trace)));
    }

    #[test]
    #[allow(deprecated)]
    fn label_replaces_target_above_debug() {
        let logger = Logger::new().label("disk_plot");
        let now = Local.ymd(2021, 3, 4).and_hms_milli(5, 6, 7, 8);

        let line = logger.format(
            now,
            &Record::builder()
                .args(format_args!("hello"))
                .level(Level::Info)
                .target("bench_plot::loader")
                .build(),
        );
        assert_eq!(line, "2021-03-04 05:06:07.008 INFO  [disk_plot] hello");

        let line = logger.format(
            now,
            &Record::builder()
                .args(format_args!("details"))
                .level(Level::Debug)
                .target("bench_plot::loader")
                .build(),
        );
        assert_eq!(
            line,
            "2021-03-04 05:06:07.008 DEBUG [bench_plot::loader] details"
        );
    }
}
