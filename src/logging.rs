//! File sink for the `log` facade. The terminal belongs to the game screen,
//! so diagnostics go to a file instead of stderr.

use std::{
    fs::{File, OpenOptions},
    io::Write,
    path::Path,
    sync::Mutex,
};

use chrono::Local;
use log::{LevelFilter, Log, Metadata, Record};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LogInitError {
    #[error("could not open log file '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("a logger is already installed")]
    AlreadySet(#[from] log::SetLoggerError),
}

struct FileLogger {
    level: LevelFilter,
    file: Mutex<File>,
}

pub fn format_line(record: &Record) -> String {
    format!(
        "{} {:<5} {}: {}",
        Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
        record.level(),
        record.target(),
        record.args()
    )
}

impl Log for FileLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        if let Ok(mut file) = self.file.lock() {
            let _ = writeln!(file, "{}", format_line(record));
        }
    }

    fn flush(&self) {
        if let Ok(mut file) = self.file.lock() {
            let _ = file.flush();
        }
    }
}

/// Appends log records at or above `level` to `path`.
pub fn init_file_logger<P: AsRef<Path>>(path: P, level: LevelFilter) -> Result<(), LogInitError> {
    let path = path.as_ref();
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|source| LogInitError::Open {
            path: path.display().to_string(),
            source,
        })?;
    log::set_boxed_logger(Box::new(FileLogger {
        level,
        file: Mutex::new(file),
    }))?;
    log::set_max_level(level);
    Ok(())
}
