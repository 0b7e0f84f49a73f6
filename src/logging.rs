use chrono::Local;
use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::{self, LineWriter, Write};
use std::sync::Mutex;

use crate::config::LogConfig;

const LOG_FILE: &str = "record-diff.log";

fn map_level_to_str(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARN",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

/// Writes to stderr, and to [`LOG_FILE`] when one is attached.
struct ConsoleLogger {
    level: LevelFilter,
    file: Option<Mutex<LineWriter<File>>>,
}

impl ConsoleLogger {
    fn new(level: LevelFilter, write_file: bool) -> io::Result<Self> {
        let file = if write_file {
            let file = OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(LOG_FILE)?;
            Some(Mutex::new(LineWriter::new(file)))
        } else {
            None
        };
        Ok(Self { level, file })
    }
}

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let now = Local::now();
        eprintln!(
            "[{:<5} {}] {}",
            map_level_to_str(record.level()),
            now.format("%H:%M:%S%.3f"),
            record.args()
        );
        if let Some(file) = &self.file {
            if let Ok(mut writer) = file.lock() {
                let _ = writeln!(
                    writer,
                    "[{:<5} {} {}] {}",
                    map_level_to_str(record.level()),
                    now.format("%H:%M:%S%.6f"),
                    record.module_path().unwrap_or("???"),
                    record.args()
                );
            }
        }
    }

    fn flush(&self) {
        if let Some(file) = &self.file {
            if let Ok(mut writer) = file.lock() {
                let _ = writer.flush();
            }
        }
    }
}

fn level_of(verbose: u8) -> (LevelFilter, bool) {
    match verbose {
        0 => (LevelFilter::Warn, false),
        1 => (LevelFilter::Info, false),
        2 => (LevelFilter::Debug, false),
        3 => (LevelFilter::Debug, true),
        4..=u8::MAX => (LevelFilter::Trace, true),
    }
}

pub fn init_log(config: &LogConfig) {
    let LogConfig::Verbose(verbose) = config else {
        return;
    };
    let (level, write_file) = level_of(*verbose);
    let logger = match ConsoleLogger::new(level, write_file) {
        Ok(logger) => logger,
        Err(e) => {
            eprintln!("cannot open {}: {}", LOG_FILE, e);
            match ConsoleLogger::new(level, false) {
                Ok(logger) => logger,
                Err(_) => return,
            }
        }
    };
    if log::set_boxed_logger(Box::new(logger)).is_ok() {
        log::set_max_level(level);
    }
}
